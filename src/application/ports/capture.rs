//! Capture boundary port
//!
//! A capture device hands out a [`CaptureStream`]: an ordered, finite sequence
//! of container chunks terminated by a single stop event, plus the hardware
//! track that produces it.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::audio::ContainerMimeType;
use crate::domain::capture::InvalidCaptureTransition;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error(transparent)]
    InvalidState(#[from] InvalidCaptureTransition),
}

/// One item of the capture stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A piece of the recorded container, in order
    Data(Vec<u8>),
    /// End of capture; nothing follows
    Stopped,
}

/// Live hardware track behind a capture stream.
///
/// Dropping a track must release the hardware too, so a session that ends on
/// an error path never leaves the microphone open.
pub trait CaptureTrack: Send {
    /// Ask the device to stop. The final data and [`CaptureEvent::Stopped`]
    /// follow on the stream. Calling it again is a no-op.
    fn stop(&mut self);

    /// Whether the hardware is still held
    fn is_live(&self) -> bool;
}

/// Ordered chunk stream plus its track
pub struct CaptureStream {
    mime_type: ContainerMimeType,
    events: mpsc::UnboundedReceiver<CaptureEvent>,
    track: Box<dyn CaptureTrack>,
}

impl CaptureStream {
    pub fn new(
        mime_type: ContainerMimeType,
        events: mpsc::UnboundedReceiver<CaptureEvent>,
        track: Box<dyn CaptureTrack>,
    ) -> Self {
        Self {
            mime_type,
            events,
            track,
        }
    }

    /// Media type of the container the chunks belong to
    pub fn mime_type(&self) -> ContainerMimeType {
        self.mime_type
    }

    pub fn into_parts(
        self,
    ) -> (
        ContainerMimeType,
        mpsc::UnboundedReceiver<CaptureEvent>,
        Box<dyn CaptureTrack>,
    ) {
        (self.mime_type, self.events, self.track)
    }
}

/// Port for microphone capture
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire the microphone and start emitting container chunks.
    async fn start_capture(&self) -> Result<CaptureStream, CaptureError>;
}

#[async_trait]
impl CaptureDevice for Box<dyn CaptureDevice> {
    async fn start_capture(&self) -> Result<CaptureStream, CaptureError> {
        self.as_ref().start_capture().await
    }
}
