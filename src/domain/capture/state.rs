//! Capture session state machine

use std::fmt;
use thiserror::Error;

/// Capture session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Recording,
    Stopped,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid capture transition: cannot {action} while {current_state}")]
pub struct InvalidCaptureTransition {
    pub current_state: CaptureState,
    pub action: &'static str,
}

/// Tracks where a single recording is in its lifecycle.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> STOPPED (stop)
///   RECORDING -> IDLE (cancel)
///
/// STOPPED is terminal: a new recording gets a new session.
#[derive(Debug, Default)]
pub struct CaptureLifecycle {
    state: CaptureState,
}

impl CaptureLifecycle {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// Transition from IDLE to RECORDING
    pub fn start(&mut self) -> Result<(), InvalidCaptureTransition> {
        self.transition(CaptureState::Idle, CaptureState::Recording, "start")
    }

    /// Transition from RECORDING to STOPPED
    pub fn stop(&mut self) -> Result<(), InvalidCaptureTransition> {
        self.transition(CaptureState::Recording, CaptureState::Stopped, "stop")
    }

    /// Transition from RECORDING back to IDLE, discarding the recording
    pub fn cancel(&mut self) -> Result<(), InvalidCaptureTransition> {
        self.transition(CaptureState::Recording, CaptureState::Idle, "cancel")
    }

    fn transition(
        &mut self,
        from: CaptureState,
        to: CaptureState,
        action: &'static str,
    ) -> Result<(), InvalidCaptureTransition> {
        if self.state != from {
            return Err(InvalidCaptureTransition {
                current_state: self.state,
                action,
            });
        }
        self.state = to;
        Ok(())
    }
}
