//! Session transitions: the only way session state changes.
//!
//! Each engine operation settles into one of these transitions. The apply
//! rules encode the transition table: which operations clear the user on
//! request, which set it on success, and which tear it down on failure.

use crate::domain::session::{Failure, OperationKind, Session, SessionStatus};
use crate::domain::user::{UserParameter, UserRecord};

/// A single atomic mutation of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// An operation was dispatched and now awaits the gateway.
    Requested(OperationKind),
    /// Login settled successfully with the authenticated user.
    LoginSucceeded(Box<UserRecord>),
    /// A parameter change settled successfully; mutate the named field.
    ParameterChanged(UserParameter),
    /// Any other operation settled successfully.
    Finished(OperationKind),
    /// An operation settled with a failure.
    Failed {
        kind: OperationKind,
        failure: Failure,
    },
    /// The session was torn down, either by the user or forced after an
    /// unrecoverable refresh failure. Logout cannot fail locally.
    LoggedOut { reason: Option<String> },
}

impl Transition {
    /// Applies this transition to a session.
    ///
    /// Rules:
    /// - login/register requests clear the user before the gateway call;
    ///   other requests leave it untouched
    /// - every success clears the status to `Idle`
    /// - failed login and failed refresh clear the user; failed verify
    ///   preserves it
    /// - logout always leaves `user = None, status = Idle`
    pub fn apply(self, session: &mut Session) {
        match self {
            Transition::Requested(kind) => {
                if matches!(kind, OperationKind::Login | OperationKind::Register) {
                    session.user = None;
                }
                session.status = SessionStatus::Pending { kind };
            }
            Transition::LoginSucceeded(user) => {
                session.user = Some(*user);
                session.status = SessionStatus::Idle;
            }
            Transition::ParameterChanged(parameter) => {
                if let Some(user) = session.user.as_mut() {
                    parameter.apply_to(user);
                }
                session.status = SessionStatus::Idle;
            }
            Transition::Finished(_) => {
                session.status = SessionStatus::Idle;
            }
            Transition::Failed { kind, failure } => {
                if matches!(kind, OperationKind::Login | OperationKind::Refresh) {
                    session.user = None;
                }
                session.status = SessionStatus::Failed { kind, failure };
            }
            Transition::LoggedOut { .. } => {
                session.user = None;
                session.status = SessionStatus::Idle;
            }
        }
    }
}
