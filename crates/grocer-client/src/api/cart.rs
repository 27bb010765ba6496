//! Cart routes.

use grocer_core::validation::validate_quantity;
use grocer_core::CartItem;
use serde::Serialize;

use super::IdBody;
use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToCart<'a> {
    product_id: &'a str,
    qty: i64,
}

#[derive(Debug, Serialize)]
struct UpdateQty<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
    qty: i64,
}

impl ApiClient {
    pub async fn cart_items(&self) -> ClientResult<Vec<CartItem>> {
        self.fetch(endpoints::GET_CART).await
    }

    pub async fn add_to_cart(&self, product_id: &str, qty: i64) -> ClientResult<String> {
        validate_quantity(qty)?;
        self.send_ack(endpoints::ADD_TO_CART, Some(&AddToCart { product_id, qty }))
            .await
    }

    pub async fn update_cart_quantity(&self, item_id: &str, qty: i64) -> ClientResult<String> {
        validate_quantity(qty)?;
        self.send_ack(endpoints::UPDATE_CART_QTY, Some(&UpdateQty { id: item_id, qty }))
            .await
    }

    pub async fn remove_cart_item(&self, item_id: &str) -> ClientResult<String> {
        self.send_ack(endpoints::DELETE_CART_ITEM, Some(&IdBody { id: item_id }))
            .await
    }
}
