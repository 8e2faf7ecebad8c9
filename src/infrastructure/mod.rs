//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, Symphonia, LAME, HTTP and the desktop.

pub mod capture;
pub mod config;
pub mod decoding;
pub mod encoding;
pub mod notification;
pub mod upload;

// Re-export adapters
pub use capture::CpalCaptureDevice;
pub use config::XdgConfigStore;
pub use decoding::SymphoniaDecoder;
pub use encoding::LameEncoderFactory;
pub use notification::{create_notifier, NoOpNotifier, NotifyRustNotifier};
pub use upload::HttpUploader;
