//! Category, sub-category and product routes.

use std::collections::BTreeMap;

use grocer_core::validation::{validate_discount, validate_name, validate_search_query};
use grocer_core::{Category, Money, Product, SubCategory, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{IdBody, WithId};
use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategoryInput {
    pub name: String,
    pub image: String,
    /// Parent category ids.
    pub category: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub image: Vec<String>,
    pub category: Vec<String>,
    pub sub_category: Vec<String>,
    pub unit: String,
    pub stock: i64,
    pub price: Money,
    pub discount: u8,
    pub description: String,
    pub more_details: BTreeMap<String, String>,
    pub publish: bool,
}

impl ProductInput {
    pub fn validate(&self) -> ClientResult<()> {
        validate_name("name", &self.name)?;
        if self.category.is_empty() {
            return Err(ValidationError::Required {
                field: "category".into(),
            }
            .into());
        }
        if self.stock < 0 {
            return Err(ValidationError::MustBePositive {
                field: "stock".into(),
            }
            .into());
        }
        if !self.price.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "price".into(),
            }
            .into());
        }
        validate_discount(i64::from(self.discount))?;
        Ok(())
    }
}

/// Paged product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        ProductQuery {
            page: 1,
            limit: 12,
            search: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoryIdBody<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductIdBody<'a> {
    product_id: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    search: &'a str,
}

impl ApiClient {
    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.fetch(endpoints::GET_CATEGORIES).await
    }

    pub async fn add_category(&self, input: &CategoryInput) -> ClientResult<String> {
        validate_name("name", &input.name)?;
        self.send_ack(endpoints::ADD_CATEGORY, Some(input)).await
    }

    pub async fn update_category(&self, id: &str, input: &CategoryInput) -> ClientResult<String> {
        validate_name("name", &input.name)?;
        self.send_ack(endpoints::UPDATE_CATEGORY, Some(&WithId { id, body: input }))
            .await
    }

    pub async fn delete_category(&self, id: &str) -> ClientResult<String> {
        let message = self
            .send_ack(endpoints::DELETE_CATEGORY, Some(&IdBody { id }))
            .await?;
        info!(category_id = %id, "Category deleted");
        Ok(message)
    }

    // =========================================================================
    // Sub-categories
    // =========================================================================

    pub async fn sub_categories(&self) -> ClientResult<Vec<SubCategory>> {
        self.fetch(endpoints::GET_SUB_CATEGORIES).await
    }

    pub async fn add_sub_category(&self, input: &SubCategoryInput) -> ClientResult<String> {
        validate_name("name", &input.name)?;
        if input.category.is_empty() {
            return Err(ValidationError::Required {
                field: "category".into(),
            }
            .into());
        }
        self.send_ack(endpoints::ADD_SUB_CATEGORY, Some(input)).await
    }

    pub async fn update_sub_category(&self, id: &str, input: &SubCategoryInput) -> ClientResult<String> {
        validate_name("name", &input.name)?;
        self.send_ack(endpoints::UPDATE_SUB_CATEGORY, Some(&WithId { id, body: input }))
            .await
    }

    pub async fn delete_sub_category(&self, id: &str) -> ClientResult<String> {
        let message = self
            .send_ack(endpoints::DELETE_SUB_CATEGORY, Some(&IdBody { id }))
            .await?;
        info!(sub_category_id = %id, "Sub-category deleted");
        Ok(message)
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>> {
        self.send(endpoints::GET_PRODUCTS, query).await
    }

    pub async fn products_by_category(&self, category_id: &str) -> ClientResult<Vec<Product>> {
        self.send(endpoints::PRODUCTS_BY_CATEGORY, &CategoryIdBody { id: category_id })
            .await
    }

    pub async fn product_details(&self, product_id: &str) -> ClientResult<Product> {
        self.send(endpoints::PRODUCT_DETAILS, &ProductIdBody { product_id })
            .await
    }

    pub async fn search_products(&self, query: &str) -> ClientResult<Vec<Product>> {
        let query = validate_search_query(query)?;
        self.send(endpoints::SEARCH_PRODUCTS, &SearchBody { search: &query })
            .await
    }

    pub async fn create_product(&self, input: &ProductInput) -> ClientResult<String> {
        input.validate()?;
        self.send_ack(endpoints::CREATE_PRODUCT, Some(input)).await
    }

    pub async fn update_product(&self, id: &str, input: &ProductInput) -> ClientResult<String> {
        input.validate()?;
        self.send_ack(endpoints::UPDATE_PRODUCT, Some(&WithId { id, body: input }))
            .await
    }

    pub async fn delete_product(&self, id: &str) -> ClientResult<String> {
        self.send_ack(endpoints::DELETE_PRODUCT, Some(&IdBody { id }))
            .await
    }
}
