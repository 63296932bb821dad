//! Auth gateway port - the remote authentication API.
//!
//! The core owns no transport detail; an adapter implements this trait over
//! whatever wire protocol the backend speaks. Failures come back as one
//! normalized [`GatewayError`] envelope regardless of how the backend
//! spelled them.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::user::{UserRecord, UserUpdate};

/// Normalized failure envelope returned by the gateway.
///
/// The backend is inconsistent about where it puts messages; adapters are
/// required to flatten everything into this one shape so the engine never
/// guesses at error structure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GatewayError {
    /// Primary human-readable message.
    pub message: String,
    /// Structured validation reasons, when the backend returns several.
    pub errors: Option<Vec<String>>,
    /// Transport status code, when one was received.
    pub status: Option<u16>,
    /// The account the failure concerns, when the backend can pinpoint it.
    pub user_id: Option<UserId>,
}

impl GatewayError {
    /// Creates an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
            status: None,
            user_id: None,
        }
    }

    /// Attaches a transport status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches structured validation reasons.
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Scopes the error to a known account.
    pub fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// True when the failure is the unauthenticated/expired-token signal
    /// that makes a verify failure recoverable by refresh.
    pub fn is_expired_token(&self) -> bool {
        self.status == Some(401)
    }

    /// Flattens the envelope into a reason list: the structured list when
    /// present, otherwise the single message.
    pub fn reasons(&self) -> Vec<String> {
        match &self.errors {
            Some(errors) if !errors.is_empty() => errors.clone(),
            _ => vec![self.message.clone()],
        }
    }
}

/// Payload of a successful login.
#[derive(Debug, Clone)]
pub struct LoginPayload {
    pub user: UserRecord,
}

/// Registration form fields.
///
/// Passwords stay wrapped in [`SecretString`]; adapters expose them only
/// while building the outgoing request.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub grade: String,
    pub city: String,
    pub email: String,
    pub password: SecretString,
    pub password_confirmation: SecretString,
    pub agreed_to_terms: bool,
}

/// Remote login/verify/refresh/logout operations.
///
/// # Contract
///
/// - Every fallible call settles with `Ok` or a normalized `GatewayError`;
///   transport timeouts surface as errors with a message and no status.
/// - `logout` is fire-and-forget: the server is notified on a best-effort
///   basis and the local teardown never waits for it.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Authenticates with credentials and returns the user payload.
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
        remember_me: bool,
    ) -> Result<LoginPayload, GatewayError>;

    /// Checks whether the current access token is still valid.
    async fn verify(&self) -> Result<(), GatewayError>;

    /// Attempts to rotate the access token using the refresh token.
    async fn refresh(&self) -> Result<(), GatewayError>;

    /// Notifies the server of a logout. Best effort, never fails locally.
    async fn logout(&self);

    /// Creates a new account.
    async fn register(&self, request: &RegisterRequest) -> Result<(), GatewayError>;

    /// Rotates the current user's password.
    async fn change_password(
        &self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(), GatewayError>;

    /// Updates a user's profile information.
    async fn update_informations(&self, update: &UserUpdate) -> Result<(), GatewayError>;

    /// Deletes an account.
    async fn delete_account(&self, user_id: &UserId) -> Result<(), GatewayError>;

    /// Toggles the informational-mails preference.
    async fn set_information_mails(&self, enabled: bool) -> Result<(), GatewayError>;
}
