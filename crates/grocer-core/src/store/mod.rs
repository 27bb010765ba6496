//! # Store Module
//!
//! Typed application state for the storefront, one slice per domain.
//!
//! ## Why Slices + Reducers?
//! Every view used to mutate one shared global object right after its API
//! call returned. Here each domain owns a slice, every change is an action,
//! and a pure `reduce` function computes the next slice. The
//! [`optimistic`](crate::optimistic) module builds rollback on top of this.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │                        ┌──────────────┐                                │
//! │      AppAction ───────►│   AppState   │──── reduce(state, action)      │
//! │                        └──────┬───────┘                                │
//! │          ┌──────────┬─────────┼──────────┬──────────────┐              │
//! │          ▼          ▼         ▼          ▼              ▼              │
//! │   ┌──────────┐ ┌────────┐ ┌────────┐ ┌──────────┐ ┌──────────┐        │
//! │   │UserState │ │CartSt. │ │Catalog │ │Addresses │ │OrderState│        │
//! │   │ session, │ │ lines, │ │ cats,  │ │ soft     │ │ history, │        │
//! │   │ theme    │ │ totals │ │ prods  │ │ delete   │ │ status   │        │
//! │   └──────────┘ └────────┘ └────────┘ └──────────┘ └──────────┘        │
//! │                                                                         │
//! │  SIGN-OUT: UserAction::SignedOut also clears cart, addresses, orders.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod addresses;
mod cart;
mod catalog;
mod orders;
mod user;

pub use addresses::{AddressAction, AddressState};
pub use cart::{CartAction, CartState, CartTotals};
pub use catalog::{CatalogAction, CatalogState};
pub use orders::{OrderAction, OrderState};
pub use user::{UserAction, UserState};

use serde::{Deserialize, Serialize};

/// A state slice with a pure reducer.
///
/// `reduce` consumes the current state and returns the next one. It must
/// not fail: actions describe facts the server already accepted, or
/// optimistic guesses that may later be rolled back.
pub trait Reducer: Clone {
    type Action: Clone;

    fn reduce(self, action: Self::Action) -> Self;
}

/// The whole client-side state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub user: UserState,
    pub cart: CartState,
    pub catalog: CatalogState,
    pub addresses: AddressState,
    pub orders: OrderState,
}

/// An action routed to one slice.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    User(UserAction),
    Cart(CartAction),
    Catalog(CatalogAction),
    Addresses(AddressAction),
    Orders(OrderAction),
}

impl Reducer for AppState {
    type Action = AppAction;

    fn reduce(self, action: AppAction) -> Self {
        let AppState {
            user,
            cart,
            catalog,
            addresses,
            orders,
        } = self;

        match action {
            AppAction::User(UserAction::SignedOut) => AppState {
                user: user.reduce(UserAction::SignedOut),
                cart: CartState::default(),
                catalog,
                addresses: AddressState::default(),
                orders: OrderState::default(),
            },
            AppAction::User(a) => AppState {
                user: user.reduce(a),
                cart,
                catalog,
                addresses,
                orders,
            },
            AppAction::Cart(a) => AppState {
                user,
                cart: cart.reduce(a),
                catalog,
                addresses,
                orders,
            },
            AppAction::Catalog(a) => AppState {
                user,
                cart,
                catalog: catalog.reduce(a),
                addresses,
                orders,
            },
            AppAction::Addresses(a) => AppState {
                user,
                cart,
                catalog,
                addresses: addresses.reduce(a),
                orders,
            },
            AppAction::Orders(a) => AppState {
                user,
                cart,
                catalog,
                addresses,
                orders: orders.reduce(a),
            },
        }
    }
}

impl From<UserAction> for AppAction {
    fn from(a: UserAction) -> Self {
        AppAction::User(a)
    }
}

impl From<CartAction> for AppAction {
    fn from(a: CartAction) -> Self {
        AppAction::Cart(a)
    }
}

impl From<CatalogAction> for AppAction {
    fn from(a: CatalogAction) -> Self {
        AppAction::Catalog(a)
    }
}

impl From<AddressAction> for AppAction {
    fn from(a: AddressAction) -> Self {
        AppAction::Addresses(a)
    }
}

impl From<OrderAction> for AppAction {
    fn from(a: OrderAction) -> Self {
        AppAction::Orders(a)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeMap;

    use crate::money::Money;
    use crate::types::{Address, CartItem, Product, Role, User};

    pub fn product(id: &str, price: i64, discount: u8, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            image: vec![],
            category: vec![],
            sub_category: vec![],
            unit: "1 pc".to_string(),
            stock,
            price: Money::from_minor(price),
            discount,
            description: String::new(),
            more_details: BTreeMap::new(),
            publish: true,
        }
    }

    pub fn cart_item(id: &str, product: Product, quantity: i64) -> CartItem {
        CartItem {
            id: id.to_string(),
            product,
            quantity,
            user_id: Some("u1".to_string()),
        }
    }

    pub fn address(id: &str) -> Address {
        Address {
            id: id.to_string(),
            line1: "12 MG Road".to_string(),
            line2: None,
            city: "Pune".to_string(),
            state: "MH".to_string(),
            country: "India".to_string(),
            zipcode: "411001".to_string(),
            phone: "9876543210".to_string(),
            active: true,
        }
    }

    pub fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.in".to_string(),
            phone: None,
            avatar: None,
            role: Role::User,
            theme: None,
        }
    }
}
