//! # Token Store
//!
//! Holds the access and refresh tokens issued at login.
//!
//! ## Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  login ──► set(access, refresh)                                         │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  every request carries  Authorization: Bearer <access>                  │
//! │                │                                                        │
//! │                ▼  401                                                   │
//! │  refresh endpoint with  Authorization: Bearer <refresh>                 │
//! │        │                         │                                      │
//! │        ▼ ok                      ▼ failed / 401 again                   │
//! │  replace_access(new)         clear()  ──► SessionExpired                │
//! │                                                                         │
//! │  logout ──► clear()                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is cheap to clone; clones share the same tokens.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// Tokens issued by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    /// Absent when the backend only issued an access token.
    pub refresh_token: Option<String>,
}

impl TokenInfo {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        TokenInfo {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<TokenInfo>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with tokens from an earlier session.
    pub fn with_tokens(tokens: TokenInfo) -> Self {
        TokenStore {
            inner: Arc::new(RwLock::new(Some(tokens))),
        }
    }

    pub async fn set(&self, tokens: TokenInfo) {
        *self.inner.write().await = Some(tokens);
        debug!("Stored new session tokens");
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|t| t.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }

    /// Swaps in a refreshed access token. The refresh token is replaced only
    /// when the server rotated it.
    pub async fn replace_access(&self, access_token: String, refresh_token: Option<String>) {
        let mut guard = self.inner.write().await;
        match guard.as_mut() {
            Some(tokens) => {
                tokens.access_token = access_token;
                if refresh_token.is_some() {
                    tokens.refresh_token = refresh_token;
                }
            }
            None => *guard = Some(TokenInfo::new(access_token, refresh_token)),
        }
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
        debug!("Cleared session tokens");
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    pub async fn current(&self) -> Option<TokenInfo> {
        self.inner.read().await.clone()
    }
}
