//! Notification sink port - fire-and-forget user-visible messages.

use async_trait::async_trait;
use std::time::Duration;

/// Visual severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Danger,
}

/// A user-visible message with an optional display timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub timeout: Option<Duration>,
}

impl Notice {
    /// Creates a success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            timeout: None,
        }
    }

    /// Creates an informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            timeout: None,
        }
    }

    /// Creates an error notice.
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Danger,
            message: message.into(),
            timeout: None,
        }
    }

    /// Keeps the notice on screen for the given duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Port for presenting notices. Presentation is fire-and-forget; the engine
/// never waits on or reacts to how a notice is rendered.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notice: Notice);
}
