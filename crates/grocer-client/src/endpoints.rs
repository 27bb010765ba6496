//! # Endpoint Table
//!
//! Every REST route the storefront calls, grouped by domain. Identifiers
//! travel in the JSON body, so paths carry no parameters.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One backend route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: &'static str,
    /// Whether a 401 from this route triggers the refresh-and-retry.
    /// Off for the credential routes, where 401 means "wrong password".
    pub refresh_on_401: bool,
}

impl Endpoint {
    const fn new(method: HttpMethod, path: &'static str) -> Self {
        Endpoint {
            method,
            path,
            refresh_on_401: true,
        }
    }

    const fn public(method: HttpMethod, path: &'static str) -> Self {
        Endpoint {
            method,
            path,
            refresh_on_401: false,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.method, self.path)
    }
}

use HttpMethod::{Delete, Get, Post, Put};

// =============================================================================
// Auth & User
// =============================================================================

pub const REGISTER: Endpoint = Endpoint::public(Post, "/api/user/register");
pub const LOGIN: Endpoint = Endpoint::public(Post, "/api/user/login");
pub const LOGOUT: Endpoint = Endpoint::new(Get, "/api/user/logout");
pub const REFRESH_TOKEN: Endpoint = Endpoint::public(Post, "/api/user/refresh-token");
pub const FORGOT_PASSWORD: Endpoint = Endpoint::public(Put, "/api/user/forgot-password");
pub const VERIFY_OTP: Endpoint = Endpoint::public(Put, "/api/user/verify-forgot-password-otp");
pub const RESET_PASSWORD: Endpoint = Endpoint::public(Put, "/api/user/reset-password");
pub const USER_DETAILS: Endpoint = Endpoint::new(Get, "/api/user/user-details");
pub const UPDATE_USER: Endpoint = Endpoint::new(Put, "/api/user/update-user");
pub const UPDATE_THEME: Endpoint = Endpoint::new(Put, "/api/user/update-theme");

// =============================================================================
// Catalog
// =============================================================================

pub const ADD_CATEGORY: Endpoint = Endpoint::new(Post, "/api/category/add-category");
pub const GET_CATEGORIES: Endpoint = Endpoint::new(Get, "/api/category/get");
pub const UPDATE_CATEGORY: Endpoint = Endpoint::new(Put, "/api/category/update");
pub const DELETE_CATEGORY: Endpoint = Endpoint::new(Delete, "/api/category/delete");

pub const ADD_SUB_CATEGORY: Endpoint = Endpoint::new(Post, "/api/subcategory/create");
pub const GET_SUB_CATEGORIES: Endpoint = Endpoint::new(Post, "/api/subcategory/get");
pub const UPDATE_SUB_CATEGORY: Endpoint = Endpoint::new(Put, "/api/subcategory/update");
pub const DELETE_SUB_CATEGORY: Endpoint = Endpoint::new(Delete, "/api/subcategory/delete");

pub const CREATE_PRODUCT: Endpoint = Endpoint::new(Post, "/api/product/create");
pub const GET_PRODUCTS: Endpoint = Endpoint::new(Post, "/api/product/get");
pub const PRODUCTS_BY_CATEGORY: Endpoint = Endpoint::new(Post, "/api/product/get-product-by-category");
pub const PRODUCT_DETAILS: Endpoint = Endpoint::new(Post, "/api/product/get-product-details");
pub const UPDATE_PRODUCT: Endpoint = Endpoint::new(Put, "/api/product/update-product-details");
pub const DELETE_PRODUCT: Endpoint = Endpoint::new(Delete, "/api/product/delete-product");
pub const SEARCH_PRODUCTS: Endpoint = Endpoint::new(Post, "/api/product/search-product");

// =============================================================================
// Cart
// =============================================================================

pub const ADD_TO_CART: Endpoint = Endpoint::new(Post, "/api/cart/create");
pub const GET_CART: Endpoint = Endpoint::new(Get, "/api/cart/get");
pub const UPDATE_CART_QTY: Endpoint = Endpoint::new(Put, "/api/cart/update-qty");
pub const DELETE_CART_ITEM: Endpoint = Endpoint::new(Delete, "/api/cart/delete-cart-item");

// =============================================================================
// Addresses
// =============================================================================

pub const CREATE_ADDRESS: Endpoint = Endpoint::new(Post, "/api/address/create");
pub const GET_ADDRESSES: Endpoint = Endpoint::new(Get, "/api/address/get");
pub const UPDATE_ADDRESS: Endpoint = Endpoint::new(Put, "/api/address/update");
pub const DISABLE_ADDRESS: Endpoint = Endpoint::new(Delete, "/api/address/disable");

// =============================================================================
// Orders
// =============================================================================

pub const CASH_ON_DELIVERY: Endpoint = Endpoint::new(Post, "/api/order/cash-on-delivery");
pub const ORDER_LIST: Endpoint = Endpoint::new(Get, "/api/order/order-list");
pub const ALL_ORDERS: Endpoint = Endpoint::new(Get, "/api/order/all-orders");
pub const UPDATE_ORDER_STATUS: Endpoint = Endpoint::new(Put, "/api/order/update-status");
