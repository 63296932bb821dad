//! Confirmation prompt port - blocking yes/no dialogs.
//!
//! Used before certain forced transitions: acknowledging the logout after a
//! password change, and offering a password reset after a failed login.

use async_trait::async_trait;

/// A blocking dialog shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub title: String,
    pub body: Option<String>,
    pub confirm_label: String,
    /// `None` renders a single-button acknowledgement dialog.
    pub cancel_label: Option<String>,
}

impl ConfirmationRequest {
    /// A single-button dialog the user can only acknowledge.
    pub fn acknowledgement(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            confirm_label: "OK".to_string(),
            cancel_label: None,
        }
    }

    /// A yes/no question.
    pub fn question(
        title: impl Into<String>,
        body: impl Into<String>,
        confirm_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: Some(body.into()),
            confirm_label: confirm_label.into(),
            cancel_label: Some("Cancel".to_string()),
        }
    }
}

/// Port for blocking confirmation dialogs. Resolves to `true` when the user
/// confirms; acknowledgement dialogs always resolve `true` once dismissed.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, request: ConfirmationRequest) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledgement_has_no_cancel_button() {
        let request = ConfirmationRequest::acknowledgement("Password changed");
        assert!(request.cancel_label.is_none());
        assert_eq!(request.confirm_label, "OK");
    }

    #[test]
    fn question_has_both_buttons() {
        let request = ConfirmationRequest::question("Forgot password?", "We can help", "Reset");
        assert_eq!(request.confirm_label, "Reset");
        assert!(request.cancel_label.is_some());
    }

    #[test]
    fn confirmation_prompt_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn ConfirmationPrompt) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn ConfirmationPrompt>>();
    }
}
