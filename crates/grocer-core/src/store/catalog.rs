//! # Catalog Slice
//!
//! Categories, sub-categories and the products loaded so far.
//!
//! Category and sub-category removals are only dispatched after the server
//! confirmed the delete; the storefront then reloads the list.

use serde::{Deserialize, Serialize};

use super::Reducer;
use crate::types::{Category, Product, SubCategory};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogState {
    pub categories: Vec<Category>,
    pub sub_categories: Vec<SubCategory>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    CategoriesLoaded(Vec<Category>),
    CategoryUpserted(Category),
    CategoryRemoved { id: String },
    SubCategoriesLoaded(Vec<SubCategory>),
    SubCategoryUpserted(SubCategory),
    SubCategoryRemoved { id: String },
    ProductsLoaded(Vec<Product>),
    ProductUpserted(Product),
    ProductRemoved { id: String },
}

fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    match items.iter_mut().find(|existing| same(existing, &item)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

impl Reducer for CatalogState {
    type Action = CatalogAction;

    fn reduce(mut self, action: CatalogAction) -> Self {
        match action {
            CatalogAction::CategoriesLoaded(categories) => self.categories = categories,
            CatalogAction::CategoryUpserted(category) => {
                upsert(&mut self.categories, category, |a, b| a.id == b.id)
            }
            CatalogAction::CategoryRemoved { id } => self.categories.retain(|c| c.id != id),
            CatalogAction::SubCategoriesLoaded(subs) => self.sub_categories = subs,
            CatalogAction::SubCategoryUpserted(sub) => {
                upsert(&mut self.sub_categories, sub, |a, b| a.id == b.id)
            }
            CatalogAction::SubCategoryRemoved { id } => self.sub_categories.retain(|s| s.id != id),
            CatalogAction::ProductsLoaded(products) => self.products = products,
            CatalogAction::ProductUpserted(product) => {
                upsert(&mut self.products, product, |a, b| a.id == b.id)
            }
            CatalogAction::ProductRemoved { id } => self.products.retain(|p| p.id != id),
        }
        self
    }
}

impl CatalogState {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Sub-categories shown under a category.
    pub fn sub_categories_of<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a SubCategory> {
        self.sub_categories
            .iter()
            .filter(move |s| s.belongs_to(category_id))
    }

    /// Published products listed under a category.
    pub fn products_in<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| p.publish && p.category.iter().any(|c| c.id() == category_id))
    }
}
