//! Console adapters for the UI-facing ports.
//!
//! Headless implementations backed by `tracing`, for embeddings without a
//! real UI (daemons, smoke tools, tests that want readable output).

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::foundation::Route;
use crate::ports::{
    ConfirmationPrompt, ConfirmationRequest, Navigator, Notice, NoticeLevel, NotificationSink,
};

/// Logs notices through `tracing` instead of rendering them.
#[derive(Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationSink for TracingNotifier {
    async fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => {
                info!(message = %notice.message, "notice")
            }
            NoticeLevel::Danger => warn!(message = %notice.message, "notice"),
        }
    }
}

/// Logs route changes instead of performing them.
#[derive(Debug, Default)]
pub struct TracingNavigator;

#[async_trait]
impl Navigator for TracingNavigator {
    async fn go_to(&self, route: Route) {
        info!(route = %route, "navigating");
    }
}

/// Answers every confirmation with a preset response.
#[derive(Debug)]
pub struct PresetPrompt {
    answer: bool,
}

impl PresetPrompt {
    /// Confirms every dialog.
    pub fn confirming() -> Self {
        Self { answer: true }
    }

    /// Declines every dialog.
    pub fn declining() -> Self {
        Self { answer: false }
    }
}

#[async_trait]
impl ConfirmationPrompt for PresetPrompt {
    async fn confirm(&self, request: ConfirmationRequest) -> bool {
        info!(title = %request.title, answer = self.answer, "confirmation");
        self.answer
    }
}
