//! Audio Recorder - microphone capture to MP3
//!
//! Records the microphone into a container, decodes it to PCM, quantizes to
//! 16-bit, encodes MP3 in 1152-sample blocks and optionally uploads the result.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the capture lifecycle, quantization and block segmentation
//! - **Application**: Capture session, encode pipeline, use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, Symphonia, LAME, HTTP, notifications)
//! - **CLI**: Command-line interface, argument parsing, logging and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
