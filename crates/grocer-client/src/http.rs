//! # API Client
//!
//! Thin wrapper over `reqwest` that every storefront call goes through.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ApiClient::execute                              │
//! │                                                                         │
//! │  send(Bearer access) ──► 2xx/4xx/5xx ──────────────────► decode         │
//! │          │                                                              │
//! │          ▼ 401 (and route allows refresh)                               │
//! │  refresh-token (Bearer refresh)                                         │
//! │          │                     │                                        │
//! │          ▼ new access          ▼ failed                                 │
//! │  send(Bearer new) ONCE     clear tokens ──► SessionExpired              │
//! │          │                                                              │
//! │          ├─ 401 ──────────► clear tokens ──► SessionExpired             │
//! │          └─ other ────────► decode                                      │
//! │                                                                         │
//! │  decode: non-2xx        ──► Server { status, envelope message }         │
//! │          success=false  ──► Rejected { message }                        │
//! │          otherwise      ──► ApiResponse<T>                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Requests that hit a 401 at the same time each run their own refresh.
//! The last refreshed token written to the [`TokenStore`] wins.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::TokenStore;
use crate::config::ApiSettings;
use crate::endpoints::{self, Endpoint};
use crate::envelope::ApiResponse;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshData {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// REST client with bearer auth and refresh-on-401.
///
/// Cloning is cheap: clones share the connection pool and the tokens.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        Self::with_tokens(settings, TokenStore::new())
    }

    pub fn with_tokens(settings: &ApiSettings, tokens: TokenStore) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .build()?;

        Ok(ApiClient {
            http,
            base_url: settings.base_url()?,
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    /// Sends `body` (if any) and returns the whole envelope.
    pub async fn request<B, T>(&self, endpoint: Endpoint, body: Option<&B>) -> ClientResult<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body.map(serde_json::to_value).transpose()?;
        self.execute(endpoint, body.as_ref()).await
    }

    /// Body-less call whose `data` is required.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> ClientResult<T> {
        self.request::<Value, T>(endpoint, None).await?.into_data()
    }

    /// Call with a JSON body whose `data` is required.
    pub async fn send<B, T>(&self, endpoint: Endpoint, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(endpoint, Some(body)).await?.into_data()
    }

    /// Call whose `data` is ignored. Returns the server's message.
    pub async fn send_ack<B>(&self, endpoint: Endpoint, body: Option<&B>) -> ClientResult<String>
    where
        B: Serialize + ?Sized,
    {
        let envelope: ApiResponse<Value> = self.request(endpoint, body).await?;
        Ok(envelope.message)
    }

    // =========================================================================
    // Core request loop
    // =========================================================================

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: Option<&Value>,
    ) -> ClientResult<ApiResponse<T>> {
        let token = self.tokens.access_token().await;
        let response = self.send_once(endpoint, body, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || !endpoint.refresh_on_401 {
            return Self::decode(endpoint, response).await;
        }

        let Some(refresh_token) = self.tokens.refresh_token().await else {
            self.tokens.clear().await;
            return Err(if token.is_some() {
                ClientError::SessionExpired
            } else {
                ClientError::NotAuthenticated
            });
        };

        debug!(endpoint = %endpoint, "Access token rejected, refreshing");
        let access_token = match self.refresh(&refresh_token).await {
            Ok(access_token) => access_token,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "Token refresh failed");
                self.tokens.clear().await;
                return Err(ClientError::SessionExpired);
            }
        };

        let retry = self.send_once(endpoint, body, Some(&access_token)).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!(endpoint = %endpoint, "Still unauthorized after refresh");
            self.tokens.clear().await;
            return Err(ClientError::SessionExpired);
        }

        Self::decode(endpoint, retry).await
    }

    /// Exchanges the refresh token for a new access token and stores it.
    async fn refresh(&self, refresh_token: &str) -> ClientResult<String> {
        let response = self
            .send_once(endpoints::REFRESH_TOKEN, None, Some(refresh_token))
            .await?;
        let data: RefreshData = Self::decode(endpoints::REFRESH_TOKEN, response)
            .await?
            .into_data()?;

        self.tokens
            .replace_access(data.access_token.clone(), data.refresh_token)
            .await;
        info!("Access token refreshed");
        Ok(data.access_token)
    }

    async fn send_once(
        &self,
        endpoint: Endpoint,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> ClientResult<reqwest::Response> {
        let url = self.base_url.join(endpoint.path)?;
        let mut request = self.http.request(endpoint.method.into(), url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(endpoint = %endpoint, "Sending request");
        Ok(request.send().await?)
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: Endpoint,
        response: reqwest::Response,
    ) -> ClientResult<ApiResponse<T>> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<Value>>(&bytes)
                .map(|envelope| envelope.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or_default().to_string());
            warn!(endpoint = %endpoint, status = status.as_u16(), message = %message, "Request failed");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;
        if !envelope.is_ok() {
            debug!(endpoint = %endpoint, message = %envelope.message, "Request rejected by server");
        }
        envelope.into_result()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use grocer_core::User;
    use serde_json::json;

    use super::*;
    use crate::testing::{bearer, client_for, closed_port_client, ok, Backend};

    async fn user_details(State(backend): State<Backend>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
        backend.hits.fetch_add(1, Ordering::SeqCst);
        backend.record_token(&headers);
        if bearer(&headers).as_deref() == Some("fresh") {
            (StatusCode::OK, ok(json!({"_id": "u1", "name": "Asha", "email": "asha@example.in"})))
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"success": false, "error": true, "message": "Unauthorized"})),
            )
        }
    }

    async fn refresh_to(
        access: &'static str,
        backend: Backend,
        headers: HeaderMap,
    ) -> (StatusCode, Json<Value>) {
        backend.refreshes.fetch_add(1, Ordering::SeqCst);
        if bearer(&headers).as_deref() == Some("refresh-1") {
            (StatusCode::OK, ok(json!({"accessToken": access})))
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"success": false, "error": true, "message": "Invalid refresh token"})),
            )
        }
    }

    fn router(backend: &Backend, refreshed_access: &'static str) -> Router {
        Router::new()
            .route("/api/user/user-details", get(user_details))
            .route(
                "/api/user/refresh-token",
                post(move |State(b): State<Backend>, headers: HeaderMap| refresh_to(refreshed_access, b, headers)),
            )
            .with_state(backend.clone())
    }

    #[tokio::test]
    async fn test_401_refreshes_and_retries_once() {
        let backend = Backend::default();
        let client = client_for(router(&backend, "fresh"), Some(("stale", "refresh-1"))).await;

        let user: User = client.fetch(endpoints::USER_DETAILS).await.unwrap();

        assert_eq!(user.name, "Asha");
        assert_eq!(backend.hits.load(Ordering::SeqCst), 2);
        assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(backend.tokens_seen(), vec!["stale", "fresh"]);
        assert_eq!(client.tokens().access_token().await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_concurrent_401s_each_refresh() {
        let backend = Backend::default();
        // Both stale requests are held until the other one arrives.
        let gate = Arc::new(tokio::sync::Barrier::new(2));
        let app = Router::new()
            .route(
                "/api/user/user-details",
                get(move |State(b): State<Backend>, headers: HeaderMap| {
                    let gate = gate.clone();
                    async move {
                        if bearer(&headers).as_deref() == Some("stale") {
                            gate.wait().await;
                        }
                        user_details(State(b), headers).await
                    }
                }),
            )
            .route(
                "/api/user/refresh-token",
                post(|State(b): State<Backend>, headers: HeaderMap| refresh_to("fresh", b, headers)),
            )
            .with_state(backend.clone());
        let client = client_for(app, Some(("stale", "refresh-1"))).await;

        let (first, second) = tokio::join!(
            client.fetch::<User>(endpoints::USER_DETAILS),
            client.fetch::<User>(endpoints::USER_DETAILS),
        );

        assert_eq!(first.unwrap().name, "Asha");
        assert_eq!(second.unwrap().name, "Asha");
        assert_eq!(backend.refreshes.load(Ordering::SeqCst), 2);
        assert_eq!(backend.hits.load(Ordering::SeqCst), 4);
        assert_eq!(client.tokens().access_token().await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_second_401_expires_session() {
        let backend = Backend::default();
        let client = client_for(router(&backend, "still-bad"), Some(("stale", "refresh-1"))).await;

        let err = client.fetch::<User>(endpoints::USER_DETAILS).await.unwrap_err();

        assert!(matches!(err, ClientError::SessionExpired));
        assert_eq!(backend.hits.load(Ordering::SeqCst), 2);
        assert_eq!(backend.refreshes.load(Ordering::SeqCst), 1);
        assert!(!client.tokens().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_tokens() {
        let backend = Backend::default();
        let client = client_for(router(&backend, "fresh"), Some(("stale", "revoked"))).await;

        let err = client.fetch::<User>(endpoints::USER_DETAILS).await.unwrap_err();

        assert!(matches!(err, ClientError::SessionExpired));
        assert!(err.requires_login());
        assert_eq!(backend.hits.load(Ordering::SeqCst), 1);
        assert!(!client.tokens().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_401_without_tokens_is_not_authenticated() {
        let backend = Backend::default();
        let client = client_for(router(&backend, "fresh"), None).await;

        let err = client.fetch::<User>(endpoints::USER_DETAILS).await.unwrap_err();

        assert!(matches!(err, ClientError::NotAuthenticated));
        assert_eq!(backend.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_login_401_is_a_server_error_without_refresh() {
        let backend = Backend::default();
        let app = router(&backend, "fresh").route(
            "/api/user/login",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"success": false, "error": true, "message": "Check your password"})),
                )
            }),
        );
        let client = client_for(app, Some(("stale", "refresh-1"))).await;

        let err = client
            .send_ack(endpoints::LOGIN, Some(&json!({"email": "a@b.in", "password": "x"})))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Check your password");
        assert!(matches!(err, ClientError::Server { status: 401, .. }));
        assert_eq!(backend.refreshes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_envelope_rejection_and_server_message() {
        let app = Router::new()
            .route(
                "/api/category/get",
                get(|| async { Json(json!({"success": false, "error": true, "message": "No categories"})) }),
            )
            .route(
                "/api/address/create",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"success": false, "error": true, "message": "Provide pincode"})),
                    )
                }),
            );
        let client = client_for(app, Some(("token", "refresh-1"))).await;

        let rejected = client.fetch::<Vec<Value>>(endpoints::GET_CATEGORIES).await.unwrap_err();
        assert!(matches!(rejected, ClientError::Rejected { ref message } if message == "No categories"));
        assert!(rejected.has_response());

        let bad = client
            .send_ack(endpoints::CREATE_ADDRESS, Some(&json!({})))
            .await
            .unwrap_err();
        assert!(matches!(bad, ClientError::Server { status: 400, ref message } if message == "Provide pincode"));
    }

    #[tokio::test]
    async fn test_network_error_has_no_response() {
        let client = closed_port_client().await;

        let err = client.fetch::<Value>(endpoints::GET_CATEGORIES).await.unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
        assert!(!err.has_response());
        assert!(err.is_retryable());
    }
}
