//! MP3 encoding adapters

mod lame;

pub use lame::{LameEncoderFactory, LameFrameEncoder, SUPPORTED_SAMPLE_RATES};
