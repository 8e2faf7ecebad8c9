//! Capture lifecycle

pub mod state;

pub use state::{CaptureLifecycle, CaptureState, InvalidCaptureTransition};
