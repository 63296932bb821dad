//! Session status record: the transient, mutually-exclusive operation flags.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::UserId;

/// The logical operations the transition engine can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Login,
    Register,
    Verify,
    Refresh,
    ChangePassword,
    ChangeParameter,
    UpdateUser,
    DeleteUser,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationKind::Login => "login",
            OperationKind::Register => "register",
            OperationKind::Verify => "verify",
            OperationKind::Refresh => "refresh",
            OperationKind::ChangePassword => "change-password",
            OperationKind::ChangeParameter => "change-parameter",
            OperationKind::UpdateUser => "update-user",
            OperationKind::DeleteUser => "delete-user",
        };
        write!(f, "{}", s)
    }
}

/// Classification of a failed operation.
///
/// The class determines which recovery cascade, if any, the engine runs:
/// `AuthorizationExpired` triggers a refresh, `RefreshDenied` forces a
/// logout, everything else is terminal at the operation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureClass {
    /// Register rejected with one or more validation reasons.
    Validation,
    /// Login rejected, optionally scoped to a known account.
    Credential,
    /// Verify rejected because the access token expired.
    AuthorizationExpired,
    /// Refresh rejected; the session cannot be recovered.
    RefreshDenied,
    /// Any other denied operation.
    OperationDenied,
}

/// Details of the last failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub class: FailureClass,
    /// Human-readable reasons; registration failures may carry several.
    pub reasons: Vec<String>,
    /// The account the failure is scoped to, when the gateway can pinpoint
    /// it (used for password-reset prompts).
    pub subject_id: Option<UserId>,
}

impl Failure {
    /// Creates a single-reason failure.
    pub fn new(class: FailureClass, reason: impl Into<String>) -> Self {
        Self {
            class,
            reasons: vec![reason.into()],
            subject_id: None,
        }
    }

    /// Creates a multi-reason failure (register validation).
    pub fn with_reasons(class: FailureClass, reasons: Vec<String>) -> Self {
        Self {
            class,
            reasons,
            subject_id: None,
        }
    }

    /// Creates a reasonless failure (verify carries no message).
    pub fn silent(class: FailureClass) -> Self {
        Self {
            class,
            reasons: Vec::new(),
            subject_id: None,
        }
    }

    /// Scopes the failure to a known account.
    pub fn for_subject(mut self, subject_id: UserId) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    /// Returns the primary reason, if any.
    pub fn reason(&self) -> Option<&str> {
        self.reasons.first().map(String::as_str)
    }
}

/// The transient phase of the session for the in-flight or last-failed
/// operation. At most one operation kind is recorded at a time; every
/// success resets to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum SessionStatus {
    Idle,
    Pending { kind: OperationKind },
    Failed { kind: OperationKind, failure: Failure },
}

impl SessionStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionStatus::Idle)
    }

    /// Returns the kind currently awaiting a gateway response, if any.
    pub fn pending_kind(&self) -> Option<OperationKind> {
        match self {
            SessionStatus::Pending { kind } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the last failure, if the session is in a failed phase.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            SessionStatus::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }
}
