//! Capture session and controller
//!
//! A [`CaptureSession`] owns one recording: its hardware track and the chunks
//! delivered so far. The [`CaptureController`] keeps at most one session alive.

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::domain::audio::{ContainerMimeType, RawContainerBlob};
use crate::domain::capture::{CaptureLifecycle, CaptureState, InvalidCaptureTransition};

use super::ports::{CaptureDevice, CaptureError, CaptureEvent, CaptureTrack};

/// One recording from start to stop
pub struct CaptureSession {
    lifecycle: CaptureLifecycle,
    mime_type: ContainerMimeType,
    events: mpsc::UnboundedReceiver<CaptureEvent>,
    track: Box<dyn CaptureTrack>,
    chunks: Vec<Vec<u8>>,
    byte_len: usize,
    terminated: bool,
}

impl CaptureSession {
    /// Acquire the microphone and begin recording with an empty chunk list.
    pub async fn start<C>(device: &C) -> Result<Self, CaptureError>
    where
        C: CaptureDevice + ?Sized,
    {
        let mut lifecycle = CaptureLifecycle::new();
        let stream = device.start_capture().await?;
        lifecycle.start()?;

        let (mime_type, events, track) = stream.into_parts();
        info!(mime = %mime_type, "capture started");

        Ok(Self {
            lifecycle,
            mime_type,
            events,
            track,
            chunks: Vec::new(),
            byte_len: 0,
            terminated: false,
        })
    }

    pub fn state(&self) -> CaptureState {
        self.lifecycle.state()
    }

    pub fn mime_type(&self) -> ContainerMimeType {
        self.mime_type
    }

    /// Chunks received so far
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Bytes received so far
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn is_track_live(&self) -> bool {
        self.track.is_live()
    }

    /// Take whatever the device has already delivered, without waiting.
    /// Returns the number of new chunks.
    pub fn poll_chunks(&mut self) -> usize {
        let before = self.chunks.len();
        while !self.terminated {
            match self.events.try_recv() {
                Ok(event) => self.accept(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.terminated = true,
            }
        }
        self.chunks.len() - before
    }

    /// Stop the track, drain the stream to its end and return the recording.
    ///
    /// A session that never received data yields an empty blob.
    pub async fn stop(mut self) -> Result<RawContainerBlob, CaptureError> {
        self.lifecycle.stop()?;
        self.track.stop();

        while !self.terminated {
            match self.events.recv().await {
                Some(event) => self.accept(event),
                None => self.terminated = true,
            }
        }

        let chunks = std::mem::take(&mut self.chunks);
        info!(
            chunks = chunks.len(),
            bytes = self.byte_len,
            "capture stopped"
        );
        Ok(RawContainerBlob::from_chunks(chunks, self.mime_type))
    }

    /// Release the track and throw the recording away.
    pub fn cancel(mut self) -> Result<(), CaptureError> {
        self.lifecycle.cancel()?;
        self.track.stop();
        self.chunks.clear();
        self.byte_len = 0;
        debug!("capture cancelled");
        Ok(())
    }

    fn accept(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::Data(bytes) => {
                debug!(bytes = bytes.len(), "capture chunk");
                self.byte_len += bytes.len();
                self.chunks.push(bytes);
            }
            CaptureEvent::Stopped => self.terminated = true,
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        // Error paths drop the session without stop/cancel; the track must
        // still be released.
        self.track.stop();
    }
}

/// Holds the current recording, if any
pub struct CaptureController<C>
where
    C: CaptureDevice,
{
    device: C,
    session: Option<CaptureSession>,
}

impl<C> CaptureController<C>
where
    C: CaptureDevice,
{
    pub fn new(device: C) -> Self {
        Self {
            device,
            session: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.session
            .as_ref()
            .map(CaptureSession::state)
            .unwrap_or_default()
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut CaptureSession> {
        self.session.as_mut()
    }

    /// Start a new recording. An unfinished previous recording is released
    /// first so only one track is ever held.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if let Some(previous) = self.session.take() {
            warn!("discarding unfinished recording");
            previous.cancel()?;
        }

        self.session = Some(CaptureSession::start(&self.device).await?);
        Ok(())
    }

    /// Stop the current recording and return its container blob.
    pub async fn stop(&mut self) -> Result<RawContainerBlob, CaptureError> {
        let session = self.session.take().ok_or(InvalidCaptureTransition {
            current_state: CaptureState::Idle,
            action: "stop",
        })?;
        session.stop().await
    }

    /// Drop the current recording without producing a blob.
    pub fn cancel(&mut self) -> Result<(), CaptureError> {
        let session = self.session.take().ok_or(InvalidCaptureTransition {
            current_state: CaptureState::Idle,
            action: "cancel",
        })?;
        session.cancel()
    }
}
