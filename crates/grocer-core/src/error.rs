//! # Error Types
//!
//! Domain-specific error types for grocer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  grocer-core errors (this file)                                        │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  grocer-client errors (separate crate)                                 │
//! │  └── ClientError      - Network, server and session failures           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → user notification   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations raised by reducers and helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is not part of the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(String),

    /// Adding the product would leave less stock than requested.
    ///
    /// ## When This Occurs
    /// ```text
    /// Add to Cart (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Milk 1L", available: 3, requested: 5 }
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Cart has reached the maximum number of distinct products.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Quantity exceeds the per-product maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Delivery address is missing or was deactivated.
    #[error("Address {0} is not available for delivery")]
    AddressUnavailable(String),

    /// Optimistic transition id is unknown (already committed or rolled back).
    #[error("Unknown transition: {0}")]
    UnknownTransition(String),

    /// Unrecognized order status label.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// Unrecognized sort key.
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    /// Unrecognized date-range bucket.
    #[error("Unknown date range: {0}")]
    UnknownDateRange(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for forms submitted to the backend.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., email, phone, zipcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must match do not.
    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
