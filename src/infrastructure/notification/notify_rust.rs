//! Desktop popups through notify-rust

use async_trait::async_trait;

use crate::application::ports::{Alert, NotificationError, Notifier};

const SUMMARY: &str = "Audio Recorder";

const SUCCESS_TIMEOUT_MS: u32 = 4_000;
const ERROR_TIMEOUT_MS: u32 = 10_000;

pub struct NotifyRustNotifier {
    summary: String,
}

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self::with_summary(SUMMARY)
    }

    pub fn with_summary(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }

    /// Errors stay on screen longer than confirmations
    fn timeout_for(alert: &Alert) -> notify_rust::Timeout {
        let ms = if alert.is_error() {
            ERROR_TIMEOUT_MS
        } else {
            SUCCESS_TIMEOUT_MS
        };
        notify_rust::Timeout::Milliseconds(ms)
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn alert(&self, alert: &Alert) -> Result<(), NotificationError> {
        let mut popup = notify_rust::Notification::new();
        popup
            .appname(SUMMARY)
            .summary(&self.summary)
            .body(&alert.message())
            .icon(alert.icon_name())
            .timeout(Self::timeout_for(alert));

        // show() blocks on the session bus
        tokio::task::spawn_blocking(move || popup.show().map(|_| ()))
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}
