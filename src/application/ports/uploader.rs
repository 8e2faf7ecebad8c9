//! Upload boundary port

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::EncodedOutput;

/// MIME tag sent with the upload
pub const UPLOAD_MIME_TYPE: &str = "audio/mp3";

/// Upload errors
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("Invalid upload URL: {0}")]
    InvalidUrl(String),

    #[error("Upload request failed: {0}")]
    RequestFailed(String),

    #[error("Server rejected upload (HTTP {status}): {message}")]
    Server { status: u16, message: String },
}

/// Successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub status: u16,
    /// Optional message from the server response body
    pub message: Option<String>,
}

/// Port for sending an encoded recording to a server
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn send(
        &self,
        audio: &EncodedOutput,
        filename: &str,
        mime_type: &str,
    ) -> Result<UploadReceipt, UploadError>;
}

#[async_trait]
impl Uploader for Box<dyn Uploader> {
    async fn send(
        &self,
        audio: &EncodedOutput,
        filename: &str,
        mime_type: &str,
    ) -> Result<UploadReceipt, UploadError> {
        self.as_ref().send(audio, filename, mime_type).await
    }
}
