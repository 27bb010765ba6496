//! In-process stand-in for the REST backend used by the client tests.

use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

use axum::http::HeaderMap;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::auth::{TokenInfo, TokenStore};
use crate::config::ApiSettings;
use crate::http::ApiClient;

/// Counters shared between test handlers and assertions.
#[derive(Debug, Clone, Default)]
pub struct Backend {
    pub hits: Arc<AtomicUsize>,
    pub refreshes: Arc<AtomicUsize>,
    pub tokens: Arc<Mutex<Vec<String>>>,
    pub bodies: Arc<Mutex<Vec<Value>>>,
}

impl Backend {
    pub fn record_token(&self, headers: &HeaderMap) {
        if let Some(token) = bearer(headers) {
            self.tokens.lock().unwrap().push(token);
        }
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn record_body(&self, body: Value) {
        self.bodies.lock().unwrap().push(body);
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Success envelope around `data`.
pub fn ok(data: Value) -> Json<Value> {
    Json(json!({"success": true, "error": false, "message": "ok", "data": data}))
}

/// Serves `router` on an ephemeral port and returns a client pointed at it.
pub async fn client_for(router: Router, tokens: Option<(&str, &str)>) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let settings = ApiSettings {
        base_url: format!("http://{}", addr),
        ..ApiSettings::default()
    };
    let store = match tokens {
        Some((access, refresh)) => {
            TokenStore::with_tokens(TokenInfo::new(access, Some(refresh.to_string())))
        }
        None => TokenStore::new(),
    };
    ApiClient::with_tokens(&settings, store).unwrap()
}

/// Client pointed at a port nothing listens on.
pub async fn closed_port_client() -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let settings = ApiSettings {
        base_url: format!("http://{}", addr),
        ..ApiSettings::default()
    };
    ApiClient::new(&settings).unwrap()
}
