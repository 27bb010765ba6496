//! # Order Slice
//!
//! Order history for customers, and the full order table for admins.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::Reducer;
use crate::orders::{derive_status, OrderQuery, OrderStatus, OrderSummary};
use crate::types::Order;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderState {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    Loaded(Vec<Order>),
    /// New orders from checkout; shown first.
    Placed(Vec<Order>),
    /// Raw status label as the backend stores it.
    StatusChanged { order_id: String, status: String },
}

impl Reducer for OrderState {
    type Action = OrderAction;

    fn reduce(mut self, action: OrderAction) -> Self {
        match action {
            OrderAction::Loaded(orders) => self.orders = orders,
            OrderAction::Placed(mut placed) => {
                self.orders.retain(|o| !placed.iter().any(|p| p.id == o.id));
                placed.append(&mut self.orders);
                self.orders = placed;
            }
            OrderAction::StatusChanged { order_id, status } => {
                if let Some(order) = self.orders.iter_mut().find(|o| o.matches_id(&order_id)) {
                    order.order_status = Some(status);
                }
            }
        }
        self
    }
}

impl Order {
    /// Matches either the document id or the human order number.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id || self.order_id.as_deref() == Some(id)
    }
}

impl OrderState {
    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.matches_id(id))
    }

    /// Derived status of one order, if present.
    pub fn status_of(&self, id: &str) -> Option<OrderStatus> {
        self.get(id).map(derive_status)
    }

    /// Filtered and sorted view for the order list.
    pub fn query<Tz: TimeZone>(&self, query: &OrderQuery, now: DateTime<Tz>) -> Vec<Order> {
        query.apply(&self.orders, now)
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_orders(&self.orders)
    }
}
