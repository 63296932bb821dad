//! REST auth gateway adapter.
//!
//! Talks to the backend's JSON API over reqwest. Tokens travel as HttpOnly
//! cookies, so the client carries a cookie store and the core never sees
//! token material. Every failure is flattened into the normalized
//! [`GatewayError`] envelope regardless of which shape the backend used.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::domain::foundation::UserId;
use crate::domain::user::{UserRecord, UserUpdate};
use crate::ports::{AuthGateway, GatewayError, LoginPayload, RegisterRequest};

/// Auth gateway over the backend's REST API.
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: reqwest::Client,
    base_url: String,
}

/// Error body shapes the backend sends; all optional because the backend
/// is not consistent about which fields it fills.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: Option<String>,
    errors: Option<Vec<String>>,
    user_id: Option<String>,
}

/// Body of a successful login; token fields are ignored on purpose (they
/// arrive as cookies).
#[derive(Debug, Deserialize)]
struct LoginBody {
    user: UserRecord,
}

impl RestGateway {
    /// Creates a gateway against a base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::new(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Settles a reqwest result into the normalized envelope: transport
    /// errors become message-only failures, non-success responses decode
    /// the backend's error body.
    async fn expect_ok(
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, GatewayError> {
        match result {
            Err(err) => Err(GatewayError::new(format!("Request failed: {err}"))),
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.json::<ErrorBody>().await.unwrap_or_default();
                Err(envelope_from(status, body))
            }
        }
    }
}

/// Builds the normalized error envelope from a status code and whatever
/// error body the backend produced.
fn envelope_from(status: u16, body: ErrorBody) -> GatewayError {
    let mut error = GatewayError::new(
        body.message
            .unwrap_or_else(|| "An unexpected error occurred".to_string()),
    )
    .with_status(status);
    if let Some(errors) = body.errors {
        error = error.with_errors(errors);
    }
    if let Some(user_id) = body.user_id.and_then(|id| UserId::new(id).ok()) {
        error = error.with_user_id(user_id);
    }
    error
}

#[async_trait]
impl AuthGateway for RestGateway {
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
        remember_me: bool,
    ) -> Result<LoginPayload, GatewayError> {
        let response = Self::expect_ok(
            self.client
                .post(self.url("/auth/login"))
                .json(&json!({
                    "email": email,
                    "password": password.expose_secret(),
                    "rememberMe": remember_me,
                }))
                .send()
                .await,
        )
        .await?;
        let body = response
            .json::<LoginBody>()
            .await
            .map_err(|e| GatewayError::new(format!("Malformed login response: {e}")))?;
        Ok(LoginPayload { user: body.user })
    }

    async fn verify(&self) -> Result<(), GatewayError> {
        Self::expect_ok(self.client.get(self.url("/auth/verify")).send().await).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<(), GatewayError> {
        Self::expect_ok(self.client.post(self.url("/auth/refresh")).send().await).await?;
        Ok(())
    }

    async fn logout(&self) {
        // Best effort: the local teardown already happened.
        if let Err(err) = self.client.post(self.url("/auth/logout")).send().await {
            debug!(error = %err, "logout notification did not reach the server");
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), GatewayError> {
        Self::expect_ok(
            self.client
                .post(self.url("/auth/register"))
                .json(&json!({
                    "firstname": request.firstname,
                    "lastname": request.lastname,
                    "grade": request.grade,
                    "city": request.city,
                    "email": request.email,
                    "password": request.password.expose_secret(),
                    "password2": request.password_confirmation.expose_secret(),
                    "agree": request.agreed_to_terms,
                }))
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    async fn change_password(
        &self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(), GatewayError> {
        Self::expect_ok(
            self.client
                .patch(self.url("/user/password"))
                .json(&json!({
                    "password": password.expose_secret(),
                    "password2": confirmation.expose_secret(),
                }))
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    async fn update_informations(&self, update: &UserUpdate) -> Result<(), GatewayError> {
        Self::expect_ok(
            self.client
                .patch(self.url("/user/informations"))
                .json(update)
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    async fn delete_account(&self, user_id: &UserId) -> Result<(), GatewayError> {
        Self::expect_ok(
            self.client
                .delete(self.url(&format!("/user/{user_id}")))
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    async fn set_information_mails(&self, enabled: bool) -> Result<(), GatewayError> {
        Self::expect_ok(
            self.client
                .patch(self.url(&format!("/user/settings/information-mails/{enabled}")))
                .send()
                .await,
        )
        .await?;
        Ok(())
    }
}
