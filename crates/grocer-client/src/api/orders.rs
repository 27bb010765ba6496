//! Checkout and order routes.

use grocer_core::{CartItem, CoreError, Money, Order, OrderStatus};
use serde::Serialize;
use tracing::info;

use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

/// Cash-on-delivery checkout body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashOrderRequest {
    pub list_items: Vec<CartItem>,
    #[serde(rename = "addressId")]
    pub address_id: String,
    #[serde(rename = "subTotalAmt")]
    pub sub_total: Money,
    #[serde(rename = "totalAmt")]
    pub total: Money,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate<'a> {
    order_id: &'a str,
    status: &'a str,
}

impl ApiClient {
    /// Places one order per cart line, paid in cash on delivery.
    pub async fn place_cash_order(&self, request: &CashOrderRequest) -> ClientResult<Vec<Order>> {
        if request.list_items.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let orders: Vec<Order> = self.send(endpoints::CASH_ON_DELIVERY, request).await?;
        info!(
            count = orders.len(),
            total = %request.total,
            "Cash order placed"
        );
        Ok(orders)
    }

    /// Orders of the signed-in customer.
    pub async fn my_orders(&self) -> ClientResult<Vec<Order>> {
        self.fetch(endpoints::ORDER_LIST).await
    }

    /// Every order in the store (admin only).
    pub async fn all_orders(&self) -> ClientResult<Vec<Order>> {
        self.fetch(endpoints::ALL_ORDERS).await
    }

    /// Sets an order's status label (admin only).
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<String> {
        let message = self
            .send_ack(
                endpoints::UPDATE_ORDER_STATUS,
                Some(&StatusUpdate {
                    order_id,
                    status: status.label(),
                }),
            )
            .await?;
        info!(order_id = %order_id, status = %status, "Order status updated");
        Ok(message)
    }
}
