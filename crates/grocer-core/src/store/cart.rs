//! # Cart Slice
//!
//! Mirror of the server-side cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront call           Server           Action                      │
//! │  ───────────────           ──────           ──────                      │
//! │  add_to_cart()      ──►    cart/create ──►  Added(item)                 │
//! │  update_quantity()  ──►    update-qty  ──►  QuantityChanged{id, qty}    │
//! │  remove_from_cart() ──►    delete      ──►  Removed{id}                 │
//! │  load_cart()        ──►    cart/get    ──►  Loaded(items)               │
//! │  place order        ──►    order/...   ──►  Cleared                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - One line per product (adding an existing product merges quantities)
//! - Quantity is always > 0 (setting 0 removes the line)

use serde::{Deserialize, Serialize};

use super::Reducer;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, Product};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Loaded(Vec<CartItem>),
    Added(CartItem),
    QuantityChanged { item_id: String, quantity: i64 },
    Removed { item_id: String },
    Cleared,
}

impl Reducer for CartState {
    type Action = CartAction;

    fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::Loaded(items) => {
                self.items = items.into_iter().filter(|i| i.quantity > 0).collect();
            }
            CartAction::Added(item) => {
                if let Some(line) = self.items.iter_mut().find(|i| i.id == item.id) {
                    *line = item;
                } else if let Some(line) = self
                    .items
                    .iter_mut()
                    .find(|i| i.product.id == item.product.id)
                {
                    line.quantity += item.quantity;
                } else if item.quantity > 0 {
                    self.items.push(item);
                }
            }
            CartAction::QuantityChanged { item_id, quantity } => {
                if quantity <= 0 {
                    self.items.retain(|i| i.id != item_id);
                } else if let Some(line) = self.items.iter_mut().find(|i| i.id == item_id) {
                    line.quantity = quantity;
                }
            }
            CartAction::Removed { item_id } => {
                self.items.retain(|i| i.id != item_id);
            }
            CartAction::Cleared => self.items.clear(),
        }
        self
    }
}

impl CartState {
    /// Finds the line holding `product_id`.
    pub fn line_for(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Quantity of `product_id` currently in the cart.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.line_for(product_id).map(|i| i.quantity).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checks whether `quantity` more units of `product` may be added.
    ///
    /// Runs before the add request so the user sees stock and size limits
    /// without a round trip.
    pub fn check_add(&self, product: &Product, quantity: i64) -> CoreResult<()> {
        crate::validation::validate_quantity(quantity)?;

        let existing = self.quantity_of(&product.id);
        if existing == 0 && self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        let requested = existing + quantity;
        if requested > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if !product.in_stock(requested) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested,
            });
        }

        Ok(())
    }

    /// Computes the cart summary shown in the cart drawer and at checkout.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

/// Cart summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Distinct products.
    pub item_count: usize,
    pub total_quantity: i64,
    /// Sum of prices before discounts.
    pub original_total: Money,
    /// Sum of discounted prices; what the customer pays.
    pub total: Money,
    pub savings: Money,
}

impl From<&CartState> for CartTotals {
    fn from(cart: &CartState) -> Self {
        let original_total: Money = cart.items.iter().map(CartItem::original_total).sum();
        let total: Money = cart.items.iter().map(CartItem::total).sum();
        CartTotals {
            item_count: cart.items.len(),
            total_quantity: cart.items.iter().map(|i| i.quantity).sum(),
            original_total,
            total,
            savings: original_total - total,
        }
    }
}
