//! # grocer-core: Pure Storefront Logic for Grocer
//!
//! This crate holds every piece of the storefront's client-side logic that
//! does not touch the network: the data model, the order list engine, the
//! per-domain reducers and optimistic transitions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Grocer Storefront                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web front end (views)                        │   │
//! │  │   Catalog ──► Cart ──► Checkout ──► Orders ──► Admin panel      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                grocer-client (HTTP, theme sync)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ grocer-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  orders   │  │   store   │  │optimistic │  │   │
//! │  │   │  Order    │  │  filter   │  │  slices + │  │ begin /   │  │   │
//! │  │   │  Product  │  │  sort     │  │  reducers │  │ rollback  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK READS • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, Product, Address, User, ...)
//! - [`money`] - Money type with integer arithmetic and percentage discounts
//! - [`orders`] - Order status derivation, filtering, sorting, summaries
//! - [`store`] - Typed application state with one reducer per slice
//! - [`optimistic`] - Optimistic state transitions with rollback
//! - [`validation`] - Input validation for forms sent to the backend
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use grocer_core::orders::{OrderQuery, SortKey, StatusFilter};
//!
//! let query = OrderQuery::default()
//!     .with_status(StatusFilter::All)
//!     .with_sort(SortKey::DateDesc);
//! let visible = query.apply(&[], chrono::Utc::now());
//! assert!(visible.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod optimistic;
pub mod orders;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use optimistic::{Optimistic, TransitionId};
pub use orders::{derive_status, DateRange, OrderQuery, OrderStatus, OrderSummary, SortKey, StatusFilter};
pub use store::AppState;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in the cart.
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Status label shown when an order carries neither an order nor a payment status.
pub const DEFAULT_STATUS_LABEL: &str = "Pending";
