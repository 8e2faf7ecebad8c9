//! Domain layer - Core business logic
//!
//! Contains value objects, the capture state machine, and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod capture;
pub mod config;
pub mod error;
pub mod recording;

// Re-export common types
pub use audio::{EncodedOutput, PcmBuffer, RawContainerBlob};
pub use capture::{CaptureLifecycle, CaptureState};
pub use config::AppConfig;
pub use error::*;
pub use recording::Duration;
