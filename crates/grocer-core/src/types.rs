//! # Domain Types
//!
//! Wire-level domain types shared by the storefront and the REST backend.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│  SubCategory    │   │     Product     │       │
//! │  │  id, name,      │   │  category refs  │◄──│  category refs  │       │
//! │  │  image          │   └─────────────────┘   │  price, discount│       │
//! │  └─────────────────┘                         │  stock, unit    │       │
//! │                                              └────────┬────────┘       │
//! │                                                       │ snapshot       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │      User       │   │    Address      │──►│      Order      │       │
//! │  │  role, theme    │   │  soft-deleted   │   │  statuses,      │       │
//! │  └─────────────────┘   │  (active flag)  │   │  totals         │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Orders freeze the product and delivery address at checkout time. Later
//! product edits or address deactivation never change an order's display.
//!
//! ## Missing Fields
//! The backend omits fields freely (older orders have no customer snapshot,
//! cash orders have no payment status). Everything except the identifier is
//! `#[serde(default)]` so decoding never fails on a sparse document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// References
// =============================================================================

/// A reference to another entity.
///
/// The backend sends bare ids on write paths and populated documents on list
/// paths, so both shapes decode into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum EntityRef {
    /// Bare identifier.
    Id(String),
    /// Populated document carrying at least id and name.
    Named(NamedRef),
}

/// A populated reference: id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NamedRef {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl EntityRef {
    /// Returns the referenced id regardless of shape.
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Named(named) => &named.id,
        }
    }

    /// Returns the display name when the reference is populated.
    pub fn name(&self) -> Option<&str> {
        match self {
            EntityRef::Id(_) => None,
            EntityRef::Named(named) => Some(&named.name),
        }
    }
}

impl From<&str> for EntityRef {
    fn from(id: &str) -> Self {
        EntityRef::Id(id.to_string())
    }
}

// =============================================================================
// User
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Returns the opposite theme.
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Maps a system dark-mode signal to a theme.
    pub fn from_dark(dark: bool) -> Theme {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// A signed-in storefront user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "mobile")]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Remote theme preference; `None` when the user never chose one.
    #[serde(default)]
    pub theme: Option<Theme>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Address
// =============================================================================

fn default_active() -> bool {
    true
}

/// A delivery address in the user's address book.
///
/// Addresses are never deleted; disabling one clears `active`, which the
/// backend stores as `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Address {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "address_line")]
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, alias = "pincode")]
    pub zipcode: String,
    #[serde(default, alias = "mobile")]
    pub phone: String,
    #[serde(rename = "status", default = "default_active")]
    pub active: bool,
}

impl Address {
    /// Single-line rendering used in order cards.
    pub fn one_line(&self) -> String {
        let mut parts: Vec<&str> = vec![self.line1.as_str()];
        if let Some(line2) = self.line2.as_deref().filter(|l| !l.trim().is_empty()) {
            parts.push(line2);
        }
        parts.extend([
            self.city.as_str(),
            self.state.as_str(),
            self.country.as_str(),
            self.zipcode.as_str(),
        ]);
        parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A top-level product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// A sub-category belonging to one or more categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubCategory {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: Vec<EntityRef>,
}

impl SubCategory {
    /// Returns true if this sub-category is listed under `category_id`.
    pub fn belongs_to(&self, category_id: &str) -> bool {
        self.category.iter().any(|c| c.id() == category_id)
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Vec<String>,
    #[serde(default)]
    pub category: Vec<EntityRef>,
    #[serde(default, alias = "subCategory")]
    pub sub_category: Vec<EntityRef>,
    /// Display unit ("1 kg", "500 ml").
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub stock: i64,
    /// Price before discount, in minor units.
    #[serde(default)]
    pub price: Money,
    /// Whole-number discount percentage (0-100).
    #[serde(default)]
    pub discount: u8,
    #[serde(default)]
    pub description: String,
    /// Free-form key/value details shown on the product page.
    #[serde(default)]
    pub more_details: BTreeMap<String, String>,
    #[serde(default = "default_active")]
    pub publish: bool,
}

impl Product {
    /// Price after the product's discount.
    pub fn selling_price(&self) -> Money {
        self.price.apply_discount(self.discount)
    }

    /// Returns true if `quantity` units can be ordered.
    pub fn in_stock(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A line in the server-side cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "productId")]
    pub product: Product,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

impl CartItem {
    /// Line total before discount.
    pub fn original_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }

    /// Line total after discount.
    pub fn total(&self) -> Money {
        self.product.selling_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// Product data frozen into an order at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductSnapshot {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Vec<String>,
}

/// Customer data attached to admin order listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerSnapshot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: String,
    /// Human-facing order number ("ORD-6512ab...").
    #[serde(default, alias = "orderId")]
    pub order_id: Option<String>,
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub customer: Option<CustomerSnapshot>,
    #[serde(default)]
    pub product_details: Option<ProductSnapshot>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default, alias = "subTotalAmt")]
    pub sub_total: Option<Money>,
    #[serde(default, alias = "totalAmt")]
    pub total: Option<Money>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<Address>,
    #[serde(default, alias = "createdAt")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates an order with only an id set; used by tests and drafts.
    pub fn bare(id: impl Into<String>) -> Self {
        Order {
            id: id.into(),
            order_id: None,
            user_id: None,
            customer: None,
            product_details: None,
            quantity: None,
            sub_total: None,
            total: None,
            payment_status: None,
            order_status: None,
            delivery_address: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Product name from the snapshot, if any.
    pub fn product_name(&self) -> Option<&str> {
        self.product_details.as_ref()?.name.as_deref()
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer.as_ref()?.name.as_deref()
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer.as_ref()?.email.as_deref()
    }

    /// Total used for price sorting and revenue; missing totals count as zero.
    pub fn total_or_zero(&self) -> Money {
        self.total.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, discount: u8) -> Product {
        Product {
            id: "p1".into(),
            name: "Amul Milk 1L".into(),
            image: vec![],
            category: vec![],
            sub_category: vec![],
            unit: "1 L".into(),
            stock: 10,
            price: Money::from_minor(price),
            discount,
            description: String::new(),
            more_details: BTreeMap::new(),
            publish: true,
        }
    }

    #[test]
    fn test_selling_price_applies_discount() {
        assert_eq!(product(6000, 10).selling_price().minor(), 5400);
        assert_eq!(product(6000, 0).selling_price().minor(), 6000);
    }

    #[test]
    fn test_entity_ref_decodes_both_shapes() {
        let refs: Vec<EntityRef> =
            serde_json::from_str(r#"["c1", {"_id": "c2", "name": "Dairy"}]"#).unwrap();
        assert_eq!(refs[0].id(), "c1");
        assert_eq!(refs[0].name(), None);
        assert_eq!(refs[1].id(), "c2");
        assert_eq!(refs[1].name(), Some("Dairy"));
    }

    #[test]
    fn test_sparse_order_decodes() {
        let order: Order = serde_json::from_str(r#"{"_id": "o1"}"#).unwrap();
        assert_eq!(order.id, "o1");
        assert!(order.order_status.is_none());
        assert_eq!(order.total_or_zero(), Money::zero());
    }

    #[test]
    fn test_order_decodes_backend_field_names() {
        let json = r#"{
            "_id": "o1",
            "orderId": "ORD-1",
            "totalAmt": 12000,
            "subTotalAmt": 11000,
            "payment_status": "CASH ON DELIVERY",
            "product_details": {"name": "Bread", "image": ["b.png"]},
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id.as_deref(), Some("ORD-1"));
        assert_eq!(order.total, Some(Money::from_minor(12000)));
        assert_eq!(order.product_name(), Some("Bread"));
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_address_status_maps_to_active() {
        let json = r#"{"_id": "a1", "address_line": "12 MG Road", "city": "Pune",
                       "pincode": "411001", "mobile": "9876543210", "status": false}"#;
        let address: Address = serde_json::from_str(json).unwrap();
        assert!(!address.active);
        assert_eq!(address.zipcode, "411001");
        assert_eq!(address.one_line(), "12 MG Road, Pune, 411001");

        let json = r#"{"_id": "a2"}"#;
        let address: Address = serde_json::from_str(json).unwrap();
        assert!(address.active);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::from_dark(true), Theme::Dark);
    }

    #[test]
    fn test_user_role_defaults_to_user() {
        let user: User = serde_json::from_str(r#"{"_id": "u1", "email": "a@b.in"}"#).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());
        assert!(user.theme.is_none());
    }
}
