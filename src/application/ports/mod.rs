//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod notifier;
pub mod uploader;

// Re-export common types
pub use capture::{CaptureDevice, CaptureError, CaptureEvent, CaptureStream, CaptureTrack};
pub use config::ConfigStore;
pub use decoder::{ContainerDecoder, DecodeError};
pub use encoder::{
    validate_block, EncodeError, EncoderSettings, FrameEncoder, FrameEncoderFactory,
    MP3_BITRATE_KBPS,
};
pub use notifier::{Alert, NotificationError, Notifier};
pub use uploader::{UploadError, UploadReceipt, Uploader, UPLOAD_MIME_TYPE};
