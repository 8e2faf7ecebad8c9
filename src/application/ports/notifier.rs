//! Alert port: user-facing capture and upload outcomes

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// Outcome the user is told about outside the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// The microphone could not be opened
    MicrophoneUnavailable(String),
    Uploaded,
    UploadFailed(String),
}

impl Alert {
    pub fn message(&self) -> String {
        match self {
            Self::MicrophoneUnavailable(reason) => {
                format!("Error accessing microphone: {}", reason)
            }
            Self::Uploaded => "Recording uploaded successfully!".to_string(),
            Self::UploadFailed(reason) => format!("Error uploading recording: {}", reason),
        }
    }

    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::Uploaded)
    }

    /// Freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::MicrophoneUnavailable(_) => "microphone-sensitivity-muted",
            Self::Uploaded => "network-transmit",
            Self::UploadFailed(_) => "network-error",
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn alert(&self, alert: &Alert) -> Result<(), NotificationError>;
}

#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn alert(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.as_ref().alert(alert).await
    }
}
