//! Notifier used when alerts are disabled

use async_trait::async_trait;

use crate::application::ports::{Alert, NotificationError, Notifier};

#[derive(Debug, Default, Clone)]
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn alert(&self, _alert: &Alert) -> Result<(), NotificationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn swallows_every_alert() {
        let notifier = NoOpNotifier::new();
        assert!(notifier.alert(&Alert::Uploaded).await.is_ok());
        assert!(notifier
            .alert(&Alert::MicrophoneUnavailable("busy".into()))
            .await
            .is_ok());
    }
}
