//! # Client Error Types
//!
//! Error types for everything that talks to the REST backend or the disk.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │  (no response)  │  │  (server answered)      │ │
//! │  │  InvalidConfig  │  │  Network        │  │  Server{status,message} │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Rejected{message}      │ │
//! │  │  ConfigLoad/Save│  │                 │  │  Decode                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │      Auth       │  │     Domain      │  │      Internal           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │ NotAuthenticated│  │  Core(..)       │  │  ThemeStore             │ │
//! │  │ SessionExpired  │  │  (validation,   │  │  ChannelClosed          │ │
//! │  │                 │  │   stock, cart)  │  │  Internal               │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure ends up as a transient notification in the UI. Nothing here
//! is fatal: the user can always retry the action by hand.

use grocer_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request never got a response (DNS, refused connection, reset).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// Non-2xx response. `message` comes from the envelope when present.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose envelope says `success: false` or `error: true`.
    #[error("{message}")]
    Rejected { message: String },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    // =========================================================================
    // Auth Errors
    // =========================================================================
    /// A protected endpoint was called without any token.
    #[error("Not signed in")]
    NotAuthenticated,

    /// 401 persisted after a refresh, or the refresh itself failed.
    #[error("Session expired")]
    SessionExpired,

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Theme storage error: {0}")]
    ThemeStore(String),

    #[error("Channel error: {0}")]
    ChannelClosed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Server {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            ClientError::InvalidConfig(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<grocer_core::ValidationError> for ClientError {
    fn from(err: grocer_core::ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// True when the server answered, as opposed to a transport failure.
    pub fn has_response(&self) -> bool {
        matches!(
            self,
            ClientError::Server { .. }
                | ClientError::Rejected { .. }
                | ClientError::Decode(_)
                | ClientError::SessionExpired
        )
    }

    /// True when trying the same action again later may succeed.
    ///
    /// The client never retries on its own (apart from the single refresh
    /// on 401); this only decides whether the UI offers a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) | ClientError::Timeout => true,
            ClientError::Server { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// True when the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated | ClientError::SessionExpired)
    }

    /// Text for the transient notification shown to the user.
    ///
    /// Server messages are shown as-is; transport failures get a generic
    /// line since their details mean nothing to a shopper.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server { message, .. } | ClientError::Rejected { message }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            ClientError::Server { .. } | ClientError::Rejected { .. } | ClientError::Decode(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            ClientError::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ClientError::Timeout => "The server took too long to respond.".to_string(),
            ClientError::NotAuthenticated => "Please log in to continue.".to_string(),
            ClientError::SessionExpired => "Your session has expired. Please log in again.".to_string(),
            ClientError::Core(err) => err.to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}
