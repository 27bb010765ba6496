//! # grocer-client: REST Client and Storefront Orchestration for Grocer
//!
//! This crate owns every side effect of the storefront client: talking to
//! the REST backend, keeping the session tokens, syncing the theme and
//! feeding server answers into grocer-core's state.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Client                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  Storefront (orchestration)                      │  │
//! │  │                                                                  │  │
//! │  │  call API, then dispatch into Optimistic<AppState>               │  │
//! │  │  order status changes are optimistic with rollback               │  │
//! │  └───────────────┬──────────────────────────────┬───────────────────┘  │
//! │                  │                              │                       │
//! │                  ▼                              ▼                       │
//! │  ┌────────────────────────────┐  ┌──────────────────────────────────┐  │
//! │  │ ApiClient + typed api      │  │ ThemeSync actor                  │  │
//! │  │                            │  │                                  │  │
//! │  │ Endpoint table per domain  │  │ local file first                 │  │
//! │  │ Bearer auth, refresh on    │  │ follows OS when no preference    │  │
//! │  │ 401, retry once            │  │ debounced best-effort push       │  │
//! │  │ {success,message,data}     │  │                                  │  │
//! │  └──────────────┬─────────────┘  └──────────────────────────────────┘  │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  ┌────────────────────────────┐  ┌──────────────────────────────────┐  │
//! │  │ TokenStore                 │  │ StorefrontConfig                 │  │
//! │  │ Arc<RwLock<TokenInfo>>     │  │ defaults → TOML → GROCER_* env   │  │
//! │  └────────────────────────────┘  └──────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Client configuration (API, theme, order list defaults)
//! - [`error`] - Client error types
//! - [`auth`] - Access and refresh token storage
//! - [`endpoints`] - Backend route table
//! - [`envelope`] - The `{success, error, message, data}` response wrapper
//! - [`http`] - `ApiClient` with bearer auth and refresh-on-401
//! - [`api`] - One typed method per backend route
//! - [`theme`] - Theme preference sync
//! - [`storefront`] - API calls wired to the application state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use grocer_client::{ApiClient, Storefront, StorefrontConfig};
//! use grocer_core::OrderQuery;
//!
//! let config = StorefrontConfig::load_or_default(None);
//! let store = Storefront::new(ApiClient::new(&config.api)?);
//!
//! store.login("asha@example.in", "secret").await?;
//! store.load_orders().await?;
//! let visible = store.filtered_orders(&OrderQuery::default()).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

// Transport
pub mod auth;
pub mod endpoints;
pub mod envelope;
pub mod http;

// Typed routes and orchestration
pub mod api;
pub mod storefront;
pub mod theme;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::{TokenInfo, TokenStore};
pub use config::{ApiSettings, OrderSettings, StorefrontConfig, ThemeSettings};
pub use envelope::ApiResponse;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use storefront::Storefront;
pub use theme::{
    FileThemeStore, LocalThemeStore, MemoryThemeStore, ThemeHandle, ThemeRemote, ThemeSync,
};
