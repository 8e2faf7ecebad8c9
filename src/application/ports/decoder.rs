//! Container decoding port

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::{PcmBuffer, RawContainerBlob};
use crate::domain::error::PcmBufferError;

/// Decode errors
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("Recording is empty, nothing to decode")]
    Empty,

    #[error("Unsupported container: {0}")]
    UnsupportedContainer(String),

    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    #[error("Malformed container: {0}")]
    Malformed(String),

    #[error("No decodable audio track found")]
    NoAudioTrack,

    #[error("Decoded audio is invalid: {0}")]
    InvalidBuffer(#[from] PcmBufferError),

    #[error("Decode task failed: {0}")]
    TaskFailed(String),
}

/// Port for turning a recorded container into PCM
#[async_trait]
pub trait ContainerDecoder: Send + Sync {
    /// Decode every channel of the container's audio track.
    async fn decode_container(&self, blob: &RawContainerBlob) -> Result<PcmBuffer, DecodeError>;
}

#[async_trait]
impl ContainerDecoder for Box<dyn ContainerDecoder> {
    async fn decode_container(&self, blob: &RawContainerBlob) -> Result<PcmBuffer, DecodeError> {
        self.as_ref().decode_container(blob).await
    }
}
