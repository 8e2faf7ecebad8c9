//! Application layer - Use cases and port interfaces
//!
//! Contains the capture session, the encode pipeline and the record/upload
//! use cases, plus trait definitions for external system interactions.

pub mod capture;
pub mod encode;
pub mod ports;
pub mod record;
pub mod transcode;

// Re-export use cases
pub use capture::{CaptureController, CaptureSession};
pub use encode::{EncodePipeline, PipelineError};
pub use record::{
    ProgressCallback, RecordCallbacks, RecordError, RecordInput, RecordOutput, RecordUseCase,
    UploadRecordingUseCase,
};
pub use transcode::{TranscodeError, TranscodeUseCase};
