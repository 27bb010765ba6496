//! Account routes: login, registration, password reset, profile.

use grocer_core::validation::{validate_email, validate_name, validate_new_password, validate_otp, validate_phone};
use grocer_core::{Theme, User, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::auth::TokenInfo;
use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct OtpBody<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    email: &'a str,
    new_password: &'a str,
    confirm_password: &'a str,
}

#[derive(Debug, Serialize)]
struct ThemeBody {
    theme: Theme,
}

/// Profile fields the user may edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "mobile", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ApiClient {
    /// Signs in and stores the issued tokens.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<()> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".into(),
            }
            .into());
        }

        let data: LoginData = self
            .send(endpoints::LOGIN, &LoginRequest { email, password })
            .await?;
        self.tokens()
            .set(TokenInfo::new(data.access_token, data.refresh_token))
            .await;

        info!(email = %email, "Signed in");
        Ok(())
    }

    /// Ends the session. Local tokens are dropped even if the server call fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.send_ack::<Value>(endpoints::LOGOUT, None).await;
        self.tokens().clear().await;
        if let Err(e) = &result {
            warn!(error = %e, "Server-side logout failed");
        }
        result.map(|_| ())
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> ClientResult<String> {
        validate_name("name", name)?;
        validate_email(email)?;
        validate_new_password(password, confirm_password)?;

        self.send_ack(
            endpoints::REGISTER,
            Some(&RegisterRequest {
                name: name.trim(),
                email,
                password,
            }),
        )
        .await
    }

    /// Asks the backend to mail a one-time code.
    pub async fn forgot_password(&self, email: &str) -> ClientResult<String> {
        validate_email(email)?;
        self.send_ack(endpoints::FORGOT_PASSWORD, Some(&EmailBody { email }))
            .await
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> ClientResult<String> {
        validate_email(email)?;
        validate_otp(otp)?;
        self.send_ack(endpoints::VERIFY_OTP, Some(&OtpBody { email, otp }))
            .await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ClientResult<String> {
        validate_email(email)?;
        validate_new_password(new_password, confirm_password)?;
        self.send_ack(
            endpoints::RESET_PASSWORD,
            Some(&ResetPasswordRequest {
                email,
                new_password,
                confirm_password,
            }),
        )
        .await
    }

    pub async fn user_details(&self) -> ClientResult<User> {
        self.fetch(endpoints::USER_DETAILS).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<String> {
        if let Some(name) = &update.name {
            validate_name("name", name)?;
        }
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        if let Some(phone) = &update.phone {
            validate_phone(phone)?;
        }
        self.send_ack(endpoints::UPDATE_USER, Some(update)).await
    }

    /// Stores the theme preference on the user's profile.
    pub async fn update_theme(&self, theme: Theme) -> ClientResult<()> {
        self.send_ack(endpoints::UPDATE_THEME, Some(&ThemeBody { theme }))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::error::ClientError;
    use crate::testing::{bearer, client_for, ok};

    #[tokio::test]
    async fn test_login_stores_tokens() {
        let app = Router::new()
            .route(
                "/api/user/login",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["email"], "asha@example.in");
                    ok(json!({"accessToken": "a1", "refreshToken": "r1"}))
                }),
            )
            .route(
                "/api/user/user-details",
                get(|headers: HeaderMap| async move {
                    assert_eq!(bearer(&headers).as_deref(), Some("a1"));
                    ok(json!({"_id": "u1", "name": "Asha", "email": "asha@example.in", "role": "ADMIN"}))
                }),
            );
        let client = client_for(app, None).await;

        client.login("asha@example.in", "secret-pass").await.unwrap();
        assert_eq!(client.tokens().refresh_token().await.as_deref(), Some("r1"));

        let user = client.user_details().await.unwrap();
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_login_validates_before_sending() {
        let client = client_for(Router::new(), None).await;
        let err = client.login("not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, ClientError::Core(_)));
        assert!(!err.has_response());
    }

    #[tokio::test]
    async fn test_logout_clears_tokens_even_when_server_fails() {
        let app = Router::new().route(
            "/api/user/logout",
            get(|| async {
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"success": false, "error": true, "message": "boom"})),
                )
            }),
        );
        let client = client_for(app, Some(("a1", "r1"))).await;

        assert!(client.logout().await.is_err());
        assert!(!client.tokens().is_authenticated().await);
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            phone: Some("9876543210".into()),
            ..ProfileUpdate::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"mobile": "9876543210"}));
    }
}
