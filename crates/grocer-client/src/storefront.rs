//! # Storefront
//!
//! Binds the [`ApiClient`] to grocer-core's [`AppState`]: every operation
//! calls the backend first and dispatches into the state only once the
//! server has answered.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Storefront                                     │
//! │                                                                         │
//! │   operation ──► local checks ──► ApiClient ──► dispatch(action)         │
//! │                 (stock, cart,       │              │                    │
//! │                  address)           │              ▼                    │
//! │                                     │     Arc<RwLock<Optimistic<..>>>   │
//! │                                     │              │                    │
//! │   update_order_status:              │              ▼                    │
//! │     begin(StatusChanged) ───────────┤         snapshot() = view()       │
//! │     ok  ──► commit                  │                                   │
//! │     err ──► rollback (old status visible again)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The state lock is never held across a network call.

use std::sync::Arc;

use chrono::Local;
use grocer_core::store::{
    AddressAction, AppAction, CartAction, CatalogAction, OrderAction, Reducer, UserAction,
};
use grocer_core::{
    AppState, Category, CoreError, Optimistic, Order, OrderQuery, OrderStatus, OrderSummary,
    Product, SubCategory, Theme, User,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{CashOrderRequest, NewAddress, ProductQuery};
use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::theme::ThemeHandle;

/// Client-side storefront session.
///
/// Cloning shares the client, the state and the theme task.
#[derive(Debug, Clone)]
pub struct Storefront {
    client: ApiClient,
    state: Arc<RwLock<Optimistic<AppState>>>,
    theme: Option<ThemeHandle>,
}

impl Storefront {
    pub fn new(client: ApiClient) -> Self {
        Storefront {
            client,
            state: Arc::new(RwLock::new(Optimistic::default())),
            theme: None,
        }
    }

    /// Attaches a running theme sync task.
    pub fn with_theme(mut self, theme: ThemeHandle) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn theme(&self) -> Option<&ThemeHandle> {
        self.theme.as_ref()
    }

    /// State to render, including optimistic changes still in flight.
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.view()
    }

    async fn dispatch(&self, action: impl Into<AppAction>) {
        self.state.write().await.dispatch(action.into());
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        self.client.login(email, password).await?;
        self.load_session().await
    }

    /// Loads the signed-in user and hands the profile theme to theme sync.
    pub async fn load_session(&self) -> ClientResult<User> {
        let user = self.client.user_details().await?;
        self.dispatch(UserAction::Loaded(user.clone())).await;

        if let Some(theme) = &self.theme {
            theme.sign_in(user.theme).await?;
        }

        info!(user_id = %user.id, admin = user.is_admin(), "Session loaded");
        Ok(user)
    }

    /// Signs out locally even when the server call fails.
    ///
    /// Optimistic changes still in flight belong to the old session and are
    /// dropped with it.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.client.logout().await;
        {
            let mut state = self.state.write().await;
            let signed_out = state.committed().clone().reduce(UserAction::SignedOut.into());
            state.reset(signed_out);
        }

        if let Some(theme) = &self.theme {
            if let Err(e) = theme.sign_out().await {
                warn!(error = %e, "Theme sync did not acknowledge sign-out");
            }
        }
        result
    }

    /// Flips the theme. The profile copy follows through theme sync.
    pub async fn toggle_theme(&self) -> ClientResult<Theme> {
        let handle = self
            .theme
            .as_ref()
            .ok_or_else(|| ClientError::Internal("theme sync is not running".into()))?;
        let theme = handle.toggle().await?;
        self.dispatch(UserAction::ThemeChanged(theme)).await;
        Ok(theme)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn load_categories(&self) -> ClientResult<Vec<Category>> {
        let categories = self.client.categories().await?;
        self.dispatch(CatalogAction::CategoriesLoaded(categories.clone()))
            .await;
        Ok(categories)
    }

    pub async fn load_sub_categories(&self) -> ClientResult<Vec<SubCategory>> {
        let subs = self.client.sub_categories().await?;
        self.dispatch(CatalogAction::SubCategoriesLoaded(subs.clone()))
            .await;
        Ok(subs)
    }

    pub async fn load_products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>> {
        let products = self.client.products(query).await?;
        self.dispatch(CatalogAction::ProductsLoaded(products.clone()))
            .await;
        Ok(products)
    }

    /// Deletes on the server, drops the local row, then reloads the list.
    pub async fn delete_category(&self, id: &str) -> ClientResult<String> {
        let message = self.client.delete_category(id).await?;
        self.dispatch(CatalogAction::CategoryRemoved { id: id.to_string() })
            .await;
        if let Err(e) = self.load_categories().await {
            warn!(error = %e, "Category list refresh failed after delete");
        }
        Ok(message)
    }

    pub async fn delete_sub_category(&self, id: &str) -> ClientResult<String> {
        let message = self.client.delete_sub_category(id).await?;
        self.dispatch(CatalogAction::SubCategoryRemoved { id: id.to_string() })
            .await;
        if let Err(e) = self.load_sub_categories().await {
            warn!(error = %e, "Sub-category list refresh failed after delete");
        }
        Ok(message)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub async fn load_cart(&self) -> ClientResult<()> {
        let items = self.client.cart_items().await?;
        debug!(lines = items.len(), "Cart loaded");
        self.dispatch(CartAction::Loaded(items)).await;
        Ok(())
    }

    /// Checks stock and cart limits locally, adds on the server, then reloads
    /// the cart so line ids match the backend.
    pub async fn add_to_cart(&self, product: &Product, quantity: i64) -> ClientResult<()> {
        self.snapshot().await.cart.check_add(product, quantity)?;
        self.client.add_to_cart(&product.id, quantity).await?;
        info!(product_id = %product.id, quantity, "Added to cart");
        self.load_cart().await
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub async fn update_cart_quantity(&self, item_id: &str, quantity: i64) -> ClientResult<()> {
        let line = self
            .snapshot()
            .await
            .cart
            .items
            .into_iter()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CoreError::NotInCart(item_id.to_string()))?;

        if quantity <= 0 {
            return self.remove_from_cart(item_id).await;
        }
        if !line.product.in_stock(quantity) {
            return Err(CoreError::InsufficientStock {
                product: line.product.name,
                available: line.product.stock,
                requested: quantity,
            }
            .into());
        }

        self.client.update_cart_quantity(item_id, quantity).await?;
        self.dispatch(CartAction::QuantityChanged {
            item_id: item_id.to_string(),
            quantity,
        })
        .await;
        Ok(())
    }

    pub async fn remove_from_cart(&self, item_id: &str) -> ClientResult<()> {
        self.client.remove_cart_item(item_id).await?;
        self.dispatch(CartAction::Removed {
            item_id: item_id.to_string(),
        })
        .await;
        Ok(())
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    pub async fn load_addresses(&self) -> ClientResult<()> {
        let addresses = self.client.addresses().await?;
        self.dispatch(AddressAction::Loaded(addresses)).await;
        Ok(())
    }

    /// Saves an address; reloads the book when the backend does not echo it.
    pub async fn add_address(&self, address: &NewAddress) -> ClientResult<()> {
        match self.client.create_address(address).await? {
            Some(saved) => self.dispatch(AddressAction::Added(saved)).await,
            None => self.load_addresses().await?,
        }
        Ok(())
    }

    /// Soft delete: the address stays in the book as inactive.
    pub async fn disable_address(&self, id: &str) -> ClientResult<()> {
        self.client.disable_address(id).await?;
        self.dispatch(AddressAction::Deactivated { id: id.to_string() })
            .await;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn load_orders(&self) -> ClientResult<()> {
        let orders = self.client.my_orders().await?;
        self.dispatch(OrderAction::Loaded(orders)).await;
        Ok(())
    }

    /// Loads every order in the store (admin dashboard).
    pub async fn load_all_orders(&self) -> ClientResult<()> {
        let orders = self.client.all_orders().await?;
        self.dispatch(OrderAction::Loaded(orders)).await;
        Ok(())
    }

    /// Checks out the whole cart, paid in cash on delivery.
    pub async fn place_cash_order(&self, address_id: &str) -> ClientResult<Vec<Order>> {
        let state = self.snapshot().await;

        if state.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        if !state.addresses.get(address_id).is_some_and(|a| a.active) {
            return Err(CoreError::AddressUnavailable(address_id.to_string()).into());
        }

        let totals = state.cart.totals();
        let request = CashOrderRequest {
            list_items: state.cart.items,
            address_id: address_id.to_string(),
            sub_total: totals.original_total,
            total: totals.total,
        };

        let orders = self.client.place_cash_order(&request).await?;
        {
            let mut state = self.state.write().await;
            state.dispatch(OrderAction::Placed(orders.clone()).into());
            state.dispatch(CartAction::Cleared.into());
        }
        Ok(orders)
    }

    /// Shows the new status at once and restores the old one if the server
    /// refuses.
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()> {
        let transition = self.state.write().await.begin(
            OrderAction::StatusChanged {
                order_id: order_id.to_string(),
                status: status.label().to_string(),
            }
            .into(),
        );
        debug!(order_id = %order_id, %transition, status = %status, "Order status change started");

        // A logout in between drops the transition; the answer then has
        // nothing left to settle.
        match self.client.update_order_status(order_id, status).await {
            Ok(_) => {
                if let Err(e) = self.state.write().await.commit(transition) {
                    debug!(order_id = %order_id, error = %e, "Order status change outlived its session");
                }
                Ok(())
            }
            Err(e) => {
                if let Err(stale) = self.state.write().await.rollback(transition) {
                    debug!(order_id = %order_id, error = %stale, "Order status change outlived its session");
                }
                warn!(order_id = %order_id, error = %e, "Order status change rolled back");
                Err(e)
            }
        }
    }

    /// Orders matching `query`, evaluated against the local clock. "Today"
    /// and "this year" follow the local time zone.
    pub async fn filtered_orders(&self, query: &OrderQuery) -> Vec<Order> {
        self.snapshot().await.orders.query(query, Local::now())
    }

    pub async fn order_summary(&self) -> OrderSummary {
        self.snapshot().await.orders.summary()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use axum::routing::{delete, get, post, put};
    use axum::{http::StatusCode, Json, Router};
    use grocer_core::orders::StatusFilter;
    use serde_json::{json, Value};
    use tokio::sync::{watch, Notify};

    use super::*;
    use crate::config::ThemeSettings;
    use crate::testing::{client_for, ok, Backend};
    use crate::theme::{MemoryThemeStore, ThemeSync};

    fn product_json(id: &str, stock: i64) -> Value {
        json!({"_id": id, "name": format!("Product {id}"), "price": 5000, "discount": 10, "stock": stock})
    }

    fn product(id: &str, stock: i64) -> Product {
        serde_json::from_value(product_json(id, stock)).unwrap()
    }

    fn cart_line(id: &str, product_id: &str, quantity: i64) -> Value {
        json!({"_id": id, "productId": product_json(product_id, 10), "quantity": quantity})
    }

    fn address_json(id: &str) -> Value {
        json!({
            "_id": id, "address_line": "12 MG Road", "city": "Pune", "state": "MH",
            "country": "India", "pincode": "411001", "mobile": "9876543210", "status": true
        })
    }

    async fn seed(store: &Storefront, action: impl Into<AppAction>) {
        store.state.write().await.dispatch(action.into());
    }

    #[tokio::test]
    async fn test_login_loads_session_and_profile_theme() {
        let app = Router::new()
            .route(
                "/api/user/login",
                post(|| async { ok(json!({"accessToken": "a1", "refreshToken": "r1"})) }),
            )
            .route(
                "/api/user/user-details",
                get(|| async { ok(json!({"_id": "u1", "name": "Asha", "role": "ADMIN", "theme": "dark"})) }),
            )
            .route("/api/user/logout", get(|| async { ok(Value::Null) }));
        let client = client_for(app, None).await;

        let (_system, system_rx) = watch::channel(false);
        let theme = ThemeSync::start(
            &ThemeSettings::default(),
            Arc::new(MemoryThemeStore::with_theme(Theme::Light)),
            Arc::new(client.clone()),
            system_rx,
        );
        let store = Storefront::new(client).with_theme(theme);

        let user = store.login("asha@example.in", "secret").await.unwrap();
        assert_eq!(user.name, "Asha");
        assert!(store.snapshot().await.user.is_admin());
        assert_eq!(store.theme().map(|t| t.current()), Some(Theme::Dark));

        store.logout().await.unwrap();
        assert!(!store.snapshot().await.user.is_signed_in());
        assert!(!store.client().tokens().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_add_to_cart_checks_stock_before_request() {
        let backend = Backend::default();
        let hits = backend.hits.clone();
        let app = Router::new().route(
            "/api/cart/create",
            post(move || async move {
                hits.fetch_add(1, Ordering::SeqCst);
                ok(Value::Null)
            }),
        );
        let store = Storefront::new(client_for(app, Some(("a1", "r1"))).await);

        let err = store.add_to_cart(&product("p1", 1), 2).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Core(CoreError::InsufficientStock { available: 1, requested: 2, .. })
        ));
        assert_eq!(backend.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_add_to_cart_reloads_server_cart() {
        let backend = Backend::default();
        let recorder = backend.clone();
        let app = Router::new()
            .route(
                "/api/cart/create",
                post(move |Json(body): Json<Value>| async move {
                    recorder.record_body(body);
                    ok(Value::Null)
                }),
            )
            .route("/api/cart/get", get(|| async { ok(json!([cart_line("c1", "p1", 2)])) }));
        let store = Storefront::new(client_for(app, Some(("a1", "r1"))).await);

        store.add_to_cart(&product("p1", 10), 2).await.unwrap();

        assert_eq!(backend.bodies(), vec![json!({"productId": "p1", "qty": 2})]);
        let totals = store.snapshot().await.cart.totals();
        assert_eq!(totals.total_quantity, 2);
        assert_eq!(totals.total, grocer_core::Money::from_minor(9000));
    }

    #[tokio::test]
    async fn test_cart_quantity_edits() {
        let app = Router::new()
            .route("/api/cart/get", get(|| async { ok(json!([cart_line("c1", "p1", 2), cart_line("c2", "p2", 1)])) }))
            .route("/api/cart/update-qty", put(|| async { ok(Value::Null) }))
            .route("/api/cart/delete-cart-item", delete(|| async { ok(Value::Null) }));
        let store = Storefront::new(client_for(app, Some(("a1", "r1"))).await);
        store.load_cart().await.unwrap();

        store.update_cart_quantity("c1", 5).await.unwrap();
        assert_eq!(store.snapshot().await.cart.quantity_of("p1"), 5);

        store.update_cart_quantity("c2", 0).await.unwrap();
        assert_eq!(store.snapshot().await.cart.items.len(), 1);

        let err = store.update_cart_quantity("missing", 1).await.unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::NotInCart(_))));
    }

    #[tokio::test]
    async fn test_place_cash_order_clears_cart() {
        let backend = Backend::default();
        let recorder = backend.clone();
        let app = Router::new().route(
            "/api/order/cash-on-delivery",
            post(move |Json(body): Json<Value>| async move {
                recorder.record_body(body);
                ok(json!([{"_id": "o9", "orderId": "ORD-9", "totalAmt": 9000, "payment_status": "CASH ON DELIVERY"}]))
            }),
        );
        let store = Storefront::new(client_for(app, Some(("a1", "r1"))).await);
        seed(&store, CartAction::Loaded(vec![serde_json::from_value(cart_line("c1", "p1", 2)).unwrap()])).await;
        seed(&store, AddressAction::Loaded(vec![serde_json::from_value(address_json("a1")).unwrap()])).await;
        seed(&store, OrderAction::Loaded(vec![Order::bare("o1")])).await;

        let placed = store.place_cash_order("a1").await.unwrap();
        assert_eq!(placed.len(), 1);

        let body = &backend.bodies()[0];
        assert_eq!(body["addressId"], "a1");
        assert_eq!(body["subTotalAmt"], 10000);
        assert_eq!(body["totalAmt"], 9000);

        let state = store.snapshot().await;
        assert!(state.cart.is_empty());
        let ids: Vec<_> = state.orders.orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o9", "o1"]);
    }

    #[tokio::test]
    async fn test_checkout_refuses_disabled_address() {
        let app = Router::new().route("/api/address/disable", delete(|| async { ok(Value::Null) }));
        let store = Storefront::new(client_for(app, Some(("a1", "r1"))).await);
        seed(&store, CartAction::Loaded(vec![serde_json::from_value(cart_line("c1", "p1", 1)).unwrap()])).await;
        seed(&store, AddressAction::Loaded(vec![serde_json::from_value(address_json("a1")).unwrap()])).await;

        store.disable_address("a1").await.unwrap();
        assert_eq!(store.snapshot().await.addresses.addresses.len(), 1);

        let err = store.place_cash_order("a1").await.unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::AddressUnavailable(_))));
    }

    #[tokio::test]
    async fn test_failed_status_update_restores_previous_status() {
        let gate = Arc::new(Notify::new());
        let release = gate.clone();
        let app = Router::new().route(
            "/api/order/update-status",
            put(move || {
                let gate = gate.clone();
                async move {
                    gate.notified().await;
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"success": false, "error": true, "message": "db down"})),
                    )
                }
            }),
        );
        let store = Storefront::new(client_for(app, Some(("a1", "r1"))).await);
        let mut order = Order::bare("o1");
        order.order_status = Some("Processing".into());
        seed(&store, OrderAction::Loaded(vec![order])).await;

        let background = store.clone();
        let task = tokio::spawn(async move {
            background
                .update_order_status("o1", OrderStatus::Delivered)
                .await
        });

        let mut shown = None;
        for _ in 0..100 {
            shown = store.snapshot().await.orders.status_of("o1");
            if shown == Some(OrderStatus::Delivered) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(shown, Some(OrderStatus::Delivered));

        release.notify_one();
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 500, .. }));
        assert_eq!(
            store.snapshot().await.orders.status_of("o1"),
            Some(OrderStatus::Processing)
        );
    }

    #[tokio::test]
    async fn test_successful_status_update_is_committed() {
        let app = Router::new().route("/api/order/update-status", put(|| async { ok(Value::Null) }));
        let store = Storefront::new(client_for(app, Some(("a1", "r1"))).await);
        seed(&store, OrderAction::Loaded(vec![Order::bare("o1")])).await;

        store
            .update_order_status("o1", OrderStatus::Shipped)
            .await
            .unwrap();

        let state = store.state.read().await;
        assert!(!state.has_pending());
        assert_eq!(state.committed().orders.status_of("o1"), Some(OrderStatus::Shipped));
    }

    #[tokio::test]
    async fn test_logout_drops_in_flight_status_change() {
        let gate = Arc::new(Notify::new());
        let release = gate.clone();
        let app = Router::new()
            .route(
                "/api/order/update-status",
                put(move || {
                    let gate = gate.clone();
                    async move {
                        gate.notified().await;
                        ok(Value::Null)
                    }
                }),
            )
            .route("/api/user/logout", get(|| async { ok(Value::Null) }));
        let store = Storefront::new(client_for(app, Some(("a1", "r1"))).await);
        let user: User = serde_json::from_value(json!({"_id": "u1", "name": "Asha"})).unwrap();
        seed(&store, UserAction::Loaded(user)).await;
        seed(&store, OrderAction::Loaded(vec![Order::bare("o1")])).await;

        let background = store.clone();
        let task = tokio::spawn(async move {
            background
                .update_order_status("o1", OrderStatus::Cancelled)
                .await
        });
        for _ in 0..100 {
            if store.state.read().await.has_pending() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.state.read().await.has_pending());

        store.logout().await.unwrap();
        {
            let state = store.state.read().await;
            assert!(!state.has_pending());
            assert!(!state.committed().user.is_signed_in());
        }

        release.notify_one();
        task.await.unwrap().unwrap();
        let state = store.state.read().await;
        assert!(!state.has_pending());
        assert_ne!(state.view().orders.status_of("o1"), Some(OrderStatus::Cancelled));
    }

    #[tokio::test]
    async fn test_delete_category_refreshes_list() {
        let app = Router::new()
            .route("/api/category/delete", delete(|| async { ok(Value::Null) }))
            .route("/api/category/get", get(|| async { ok(json!([{"_id": "c2", "name": "Bakery"}])) }));
        let store = Storefront::new(client_for(app, Some(("a1", "r1"))).await);
        seed(
            &store,
            CatalogAction::CategoriesLoaded(vec![
                serde_json::from_value(json!({"_id": "c1", "name": "Dairy"})).unwrap(),
                serde_json::from_value(json!({"_id": "c2", "name": "Bakery"})).unwrap(),
            ]),
        )
        .await;

        store.delete_category("c1").await.unwrap();

        let state = store.snapshot().await;
        assert!(state.catalog.category("c1").is_none());
        assert_eq!(state.catalog.categories.len(), 1);
    }

    #[tokio::test]
    async fn test_filtered_orders() {
        let store = Storefront::new(client_for(Router::new(), None).await);
        let mut cancelled = Order::bare("o1");
        cancelled.order_status = Some("Cancelled".into());
        let mut shipped = Order::bare("o2");
        shipped.order_status = Some("Shipped".into());
        seed(&store, OrderAction::Loaded(vec![cancelled, shipped])).await;

        let query = OrderQuery::default().with_status(StatusFilter::Only(OrderStatus::Cancelled));
        let visible = store.filtered_orders(&query).await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "o1");
        assert_eq!(store.order_summary().await.total_orders, 2);
    }
}
