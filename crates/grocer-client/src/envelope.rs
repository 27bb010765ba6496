//! # Response Envelope
//!
//! Every backend response is wrapped as
//! `{ "success": bool, "error": bool?, "message": string, "data": ... }`.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// True when the backend reports success and no error flag.
    pub fn is_ok(&self) -> bool {
        self.success && !self.error
    }

    /// Turns a `success: false` envelope into `ClientError::Rejected`.
    pub fn into_result(self) -> ClientResult<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(ClientError::Rejected {
                message: self.message,
            })
        }
    }

    /// The `data` payload, which must be present.
    pub fn into_data(self) -> ClientResult<T> {
        let message = self.message;
        self.data.ok_or_else(|| {
            ClientError::Decode(format!("response has no data (message: {:?})", message))
        })
    }
}
