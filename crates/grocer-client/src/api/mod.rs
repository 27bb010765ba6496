//! # Typed API
//!
//! One async method on [`ApiClient`](crate::http::ApiClient) per backend
//! route, grouped by domain. Request bodies use the backend's field names;
//! responses decode straight into grocer-core's types.

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

use serde::Serialize;

pub use addresses::NewAddress;
pub use catalog::{CategoryInput, ProductInput, ProductQuery, SubCategoryInput};
pub use orders::CashOrderRequest;

/// `{"_id": ...}` body used by delete routes.
#[derive(Debug, Serialize)]
pub(crate) struct IdBody<'a> {
    #[serde(rename = "_id")]
    pub id: &'a str,
}

/// An update body: the record's fields plus its `_id`.
#[derive(Debug, Serialize)]
pub(crate) struct WithId<'a, T> {
    #[serde(rename = "_id")]
    pub id: &'a str,
    #[serde(flatten)]
    pub body: &'a T,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_id_flattens_body() {
        let input = CategoryInput {
            name: "Dairy".into(),
            image: "https://cdn.example/dairy.png".into(),
        };
        let body = serde_json::to_value(WithId { id: "c1", body: &input }).unwrap();
        assert_eq!(
            body,
            json!({"_id": "c1", "name": "Dairy", "image": "https://cdn.example/dairy.png"})
        );
    }
}
