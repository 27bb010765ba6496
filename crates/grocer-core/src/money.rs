//! # Money Module
//!
//! Provides the `Money` type for prices, cart totals and order totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  A cart of 3 × ₹33.33 summed in floats drifts by fractions of a paisa, │
//! │  and the drift shows up when the UI compares cart and order totals.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                     │
//! │    The backend sends every amount in minor units (paise / cents).      │
//! │    Discounts round once per line, never per display.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Serialized as a bare integer, which is how the backend sends prices and
/// totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use grocer_core::money::Money;
    ///
    /// let price = Money::from_minor(4999);
    /// assert_eq!(price.minor(), 4999);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor parts.
    ///
    /// For negative amounts only the major part carries the sign.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns the discount amount for a whole-number percentage.
    ///
    /// Rounds half up in integer math: `(amount * pct + 50) / 100`.
    /// Percentages above 100 are clamped.
    ///
    /// ```rust
    /// use grocer_core::money::Money;
    ///
    /// // 10% of 49.99 = 4.999 → 5.00
    /// assert_eq!(Money::from_minor(4999).discount_amount(10).minor(), 500);
    /// ```
    pub fn discount_amount(&self, percent: u8) -> Money {
        let pct = percent.min(100) as i128;
        let amount = (self.0 as i128 * pct + 50) / 100;
        Money(amount as i64)
    }

    /// Returns the price after a whole-number percentage discount.
    ///
    /// ## User Workflow
    /// ```text
    /// Product card: MRP 49.99, discount 10%
    ///      │
    ///      ▼
    /// apply_discount(10) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Selling price: 44.99  (savings 5.00)
    /// ```
    pub fn apply_discount(&self, percent: u8) -> Money {
        *self - self.discount_amount(percent)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering; the web UI formats with the user's locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}
