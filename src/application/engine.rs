//! AuthTransitionEngine - orchestrates session lifecycle operations.
//!
//! Each operation runs the same shape: record the request on the store,
//! call the gateway, settle the store with the success or failure, then
//! fire side effects (persistence sync, notification, navigation) strictly
//! after the store mutation - observers never see stale state.
//!
//! Two failures cascade into follow-up operations:
//! - a verify failure carrying the expired-token signal triggers exactly one
//!   refresh
//! - a refresh failure is irrecoverable and forces a full logout
//!
//! A password change also cascades into a logout on success, since rotation
//! invalidates the current tokens.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::foundation::{Route, UserId};
use crate::domain::session::{
    Failure, FailureClass, OperationKind, Session, SessionStore, Transition,
};
use crate::domain::user::{UserParameter, UserUpdate};
use crate::ports::{
    AuthGateway, ConfirmationPrompt, ConfirmationRequest, Navigator, Notice, NotificationSink,
    RegisterRequest, UserStore,
};

/// How long the two-part registration notices stay on screen.
const REGISTER_NOTICE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors returned by the engine itself (as opposed to operation failures,
/// which settle into the session status).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A same-kind operation is still awaiting the gateway. The UI used to
    /// be the only guard against double submission; the engine now rejects
    /// it explicitly.
    #[error("A {0} operation is already in flight")]
    OperationInFlight(OperationKind),
}

/// How an operation settled.
///
/// Failures returned here are already recorded in the session status and
/// surfaced once through the notification sink; callers branch on the
/// outcome but must not surface it again.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success,
    Failure(Failure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// The routes the engine navigates to on its own.
#[derive(Debug, Clone)]
pub struct EngineRoutes {
    /// Landing route after login, unless the user configured another one.
    pub landing: Route,
    /// Where logout and successful registration send the user.
    pub login: Route,
    /// Offered after a login failure scoped to a known account.
    pub password_reset: Route,
}

impl Default for EngineRoutes {
    fn default() -> Self {
        Self {
            landing: Route::dashboard(),
            login: Route::login(),
            password_reset: Route::password_reset(),
        }
    }
}

/// Drives login / verify / refresh / logout and the account operations
/// against the session store, with collaborators injected explicitly.
pub struct AuthTransitionEngine {
    store: Arc<SessionStore>,
    gateway: Arc<dyn AuthGateway>,
    user_store: Arc<dyn UserStore>,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    prompt: Arc<dyn ConfirmationPrompt>,
    routes: EngineRoutes,
    in_flight: Mutex<HashSet<OperationKind>>,
}

/// Marks an operation kind as in flight for the duration of a call.
struct InFlightGuard<'a> {
    registry: &'a Mutex<HashSet<OperationKind>>,
    kind: OperationKind,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.lock().unwrap().remove(&self.kind);
    }
}

impl AuthTransitionEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<SessionStore>,
        gateway: Arc<dyn AuthGateway>,
        user_store: Arc<dyn UserStore>,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
        prompt: Arc<dyn ConfirmationPrompt>,
        routes: EngineRoutes,
    ) -> Self {
        Self {
            store,
            gateway,
            user_store,
            notifier,
            navigator,
            prompt,
            routes,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Returns an immutable view of the current session.
    pub fn session(&self) -> Session {
        self.store.snapshot()
    }

    /// Rejects re-invocation of an operation kind that is still pending.
    fn begin(&self, kind: OperationKind) -> Result<InFlightGuard<'_>, EngineError> {
        let mut registry = self.in_flight.lock().unwrap();
        if !registry.insert(kind) {
            return Err(EngineError::OperationInFlight(kind));
        }
        Ok(InFlightGuard {
            registry: &self.in_flight,
            kind,
        })
    }

    /// Authenticates with credentials.
    ///
    /// On success the user record is mirrored to the durable store and the
    /// user lands on their preferred route (or the configured default). On
    /// failure the session stays unauthenticated; when the gateway can
    /// pinpoint the account, the user is offered a password reset.
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
        remember_me: bool,
    ) -> Result<Outcome, EngineError> {
        let _guard = self.begin(OperationKind::Login)?;
        debug!(email, "logging in");
        self.store.apply(Transition::Requested(OperationKind::Login));

        match self.gateway.login(email, password, remember_me).await {
            Ok(payload) => {
                if let Err(err) = self.user_store.save(&payload.user).await {
                    warn!(error = %err, "failed to mirror user record");
                }
                self.store
                    .apply(Transition::LoginSucceeded(Box::new(payload.user)));
                info!("login succeeded");

                self.notifier
                    .notify(Notice::success("You are now signed in."))
                    .await;
                let landing = self
                    .user_store
                    .preferred_route()
                    .await
                    .unwrap_or_else(|| self.routes.landing.clone());
                self.navigator.go_to(landing).await;
                Ok(Outcome::Success)
            }
            Err(err) => {
                let mut failure = Failure::new(FailureClass::Credential, err.message.clone());
                if let Some(subject) = err.user_id.clone() {
                    failure = failure.for_subject(subject);
                }
                self.store.apply(Transition::Failed {
                    kind: OperationKind::Login,
                    failure: failure.clone(),
                });
                warn!(reason = %err.message, "login failed");

                self.notifier.notify(Notice::danger(&err.message)).await;
                if err.user_id.is_some() {
                    let request = ConfirmationRequest::question(
                        "Forgot your password?",
                        "No panic: give us your email address and we will send \
                         you a link to reset your password.",
                        "Reset",
                    );
                    if self.prompt.confirm(request).await {
                        self.navigator
                            .go_to(self.routes.password_reset.clone())
                            .await;
                    }
                }
                Ok(Outcome::Failure(failure))
            }
        }
    }

    /// Tears the session down.
    ///
    /// The local effect is immediate and never fails: the store and the
    /// durable mirror are cleared before the server hears about it. The
    /// gateway call is best-effort notification only. Idempotent.
    pub async fn logout(&self, reason: Option<String>) {
        info!(reason = reason.as_deref(), "logging out");
        self.store.apply(Transition::LoggedOut {
            reason: reason.clone(),
        });
        if let Err(err) = self.user_store.clear().await {
            warn!(error = %err, "failed to clear mirrored user record");
        }
        self.gateway.logout().await;

        if let Some(reason) = reason {
            self.notifier
                .notify(Notice::danger(format!("{reason}.")))
                .await;
        }
        self.navigator.go_to(self.routes.login.clone()).await;
    }

    /// Checks whether the access token is still valid.
    ///
    /// An expired-token failure triggers exactly one refresh as a recovery
    /// step; any other failure is terminal for this call. The prior user is
    /// preserved either way until a refresh failure tears it down.
    pub async fn verify(&self) -> Result<Outcome, EngineError> {
        let _guard = self.begin(OperationKind::Verify)?;
        debug!("verifying access token");
        self.store
            .apply(Transition::Requested(OperationKind::Verify));

        match self.gateway.verify().await {
            Ok(()) => {
                self.store.apply(Transition::Finished(OperationKind::Verify));
                Ok(Outcome::Success)
            }
            Err(err) => {
                let class = if err.is_expired_token() {
                    FailureClass::AuthorizationExpired
                } else {
                    FailureClass::OperationDenied
                };
                let failure = Failure::silent(class);
                self.store.apply(Transition::Failed {
                    kind: OperationKind::Verify,
                    failure: failure.clone(),
                });

                if err.is_expired_token() {
                    debug!("access token expired, attempting refresh");
                    match self.refresh().await {
                        Ok(_) => {}
                        // A refresh already running covers the recovery.
                        Err(EngineError::OperationInFlight(_)) => {
                            debug!("refresh already in flight, not cascading")
                        }
                    }
                } else {
                    warn!(reason = %err.message, "verify failed");
                    self.notifier.notify(Notice::danger(&err.message)).await;
                }
                Ok(Outcome::Failure(failure))
            }
        }
    }

    /// Attempts to rotate the access token.
    ///
    /// A refresh failure is irrecoverable: the session is torn down through
    /// [`logout`](Self::logout), which surfaces the reason and navigates to
    /// the login route.
    pub async fn refresh(&self) -> Result<Outcome, EngineError> {
        let _guard = self.begin(OperationKind::Refresh)?;
        debug!("refreshing access token");
        self.store
            .apply(Transition::Requested(OperationKind::Refresh));

        match self.gateway.refresh().await {
            Ok(()) => {
                self.store
                    .apply(Transition::Finished(OperationKind::Refresh));
                Ok(Outcome::Success)
            }
            Err(err) => {
                let failure = Failure::new(FailureClass::RefreshDenied, err.message.clone());
                self.store.apply(Transition::Failed {
                    kind: OperationKind::Refresh,
                    failure: failure.clone(),
                });
                warn!(reason = %err.message, "refresh denied, forcing logout");
                self.logout(Some(err.message)).await;
                Ok(Outcome::Failure(failure))
            }
        }
    }

    /// Creates a new account.
    ///
    /// Failures are normalized into a reason list: the gateway's structured
    /// list when present, otherwise its single message.
    pub async fn register(&self, request: RegisterRequest) -> Result<Outcome, EngineError> {
        let _guard = self.begin(OperationKind::Register)?;
        debug!(email = %request.email, "registering account");
        self.store
            .apply(Transition::Requested(OperationKind::Register));

        match self.gateway.register(&request).await {
            Ok(()) => {
                self.store
                    .apply(Transition::Finished(OperationKind::Register));
                info!("registration succeeded");

                self.notifier
                    .notify(
                        Notice::success("Your account has been created!")
                            .with_timeout(REGISTER_NOTICE_TIMEOUT),
                    )
                    .await;
                self.notifier
                    .notify(
                        Notice::info(
                            "Please check your mailbox to confirm your address \
                             before signing in.",
                        )
                        .with_timeout(REGISTER_NOTICE_TIMEOUT),
                    )
                    .await;
                self.navigator.go_to(self.routes.login.clone()).await;
                Ok(Outcome::Success)
            }
            Err(err) => {
                let failure = Failure::with_reasons(FailureClass::Validation, err.reasons());
                self.store.apply(Transition::Failed {
                    kind: OperationKind::Register,
                    failure: failure.clone(),
                });
                warn!(reason = %err.message, "registration failed");
                self.notifier.notify(Notice::danger(&err.message)).await;
                Ok(Outcome::Failure(failure))
            }
        }
    }

    /// Rotates the current user's password.
    ///
    /// Success invalidates the current tokens, so the user acknowledges a
    /// blocking dialog and is then logged out.
    pub async fn change_password(
        &self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<Outcome, EngineError> {
        let _guard = self.begin(OperationKind::ChangePassword)?;
        self.store
            .apply(Transition::Requested(OperationKind::ChangePassword));

        match self.gateway.change_password(password, confirmation).await {
            Ok(()) => {
                self.store
                    .apply(Transition::Finished(OperationKind::ChangePassword));
                info!("password changed, forcing logout");

                self.prompt
                    .confirm(ConfirmationRequest::acknowledgement(
                        "Your password has been changed. You have been signed out.",
                    ))
                    .await;
                self.logout(None).await;
                Ok(Outcome::Success)
            }
            Err(err) => {
                let failure = Failure::new(FailureClass::OperationDenied, err.message.clone());
                self.store.apply(Transition::Failed {
                    kind: OperationKind::ChangePassword,
                    failure: failure.clone(),
                });
                self.notifier
                    .notify(Notice::danger(format!("Error: {}", err.message)))
                    .await;
                Ok(Outcome::Failure(failure))
            }
        }
    }

    /// Toggles the informational-mails preference.
    ///
    /// Success updates the live user and patches the durable mirror so a
    /// later hydration matches.
    pub async fn set_information_mails(&self, enabled: bool) -> Result<Outcome, EngineError> {
        let _guard = self.begin(OperationKind::ChangeParameter)?;
        self.store
            .apply(Transition::Requested(OperationKind::ChangeParameter));

        match self.gateway.set_information_mails(enabled).await {
            Ok(()) => {
                let parameter = UserParameter::InformationMails(enabled);
                self.store.apply(Transition::ParameterChanged(parameter));
                if let Err(err) = self.user_store.patch(parameter).await {
                    warn!(error = %err, "failed to patch mirrored user record");
                }
                self.notifier
                    .notify(Notice::success("Change saved."))
                    .await;
                Ok(Outcome::Success)
            }
            Err(err) => {
                let failure = Failure::new(FailureClass::OperationDenied, err.message.clone());
                self.store.apply(Transition::Failed {
                    kind: OperationKind::ChangeParameter,
                    failure: failure.clone(),
                });
                self.notifier
                    .notify(Notice::danger(format!("Error: {}", err.message)))
                    .await;
                Ok(Outcome::Failure(failure))
            }
        }
    }

    /// Updates a user's profile information (admin operation).
    pub async fn update_user(&self, update: UserUpdate) -> Result<Outcome, EngineError> {
        let _guard = self.begin(OperationKind::UpdateUser)?;
        self.store
            .apply(Transition::Requested(OperationKind::UpdateUser));

        match self.gateway.update_informations(&update).await {
            Ok(()) => {
                self.store
                    .apply(Transition::Finished(OperationKind::UpdateUser));
                self.notifier
                    .notify(Notice::success("User information updated."))
                    .await;
                Ok(Outcome::Success)
            }
            Err(err) => {
                let failure = Failure::new(FailureClass::OperationDenied, err.message.clone());
                self.store.apply(Transition::Failed {
                    kind: OperationKind::UpdateUser,
                    failure: failure.clone(),
                });
                self.notifier
                    .notify(Notice::danger(format!("Error: {}", err.message)))
                    .await;
                Ok(Outcome::Failure(failure))
            }
        }
    }

    /// Deletes an account (admin operation).
    pub async fn delete_user(&self, user_id: &UserId) -> Result<Outcome, EngineError> {
        let _guard = self.begin(OperationKind::DeleteUser)?;
        self.store
            .apply(Transition::Requested(OperationKind::DeleteUser));

        match self.gateway.delete_account(user_id).await {
            Ok(()) => {
                self.store
                    .apply(Transition::Finished(OperationKind::DeleteUser));
                self.notifier
                    .notify(Notice::success("The user has been deleted."))
                    .await;
                Ok(Outcome::Success)
            }
            Err(err) => {
                let failure = Failure::new(FailureClass::OperationDenied, err.message.clone());
                self.store.apply(Transition::Failed {
                    kind: OperationKind::DeleteUser,
                    failure: failure.clone(),
                });
                self.notifier
                    .notify(Notice::danger(format!("Error: {}", err.message)))
                    .await;
                Ok(Outcome::Failure(failure))
            }
        }
    }
}
