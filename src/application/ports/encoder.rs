//! Frame encoder port

use thiserror::Error;

use crate::domain::audio::{EncoderState, BLOCK_SIZE};
use crate::domain::config::EncoderQuality;

/// Output bitrate, constant
pub const MP3_BITRATE_KBPS: u32 = 128;

/// Encoder errors
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    #[error("Encoder session already finalized")]
    SessionFinalized,

    #[error("Empty sample block")]
    EmptyBlock,

    #[error("Block of {len} samples exceeds the {max}-sample frame size")]
    BlockTooLarge { len: usize, max: usize },

    #[error("Unsupported encoder settings: {0}")]
    Unsupported(String),

    #[error("Encoder initialization failed: {0}")]
    InitFailed(String),

    #[error("Encoding failed: {0}")]
    EncodeFailed(String),
}

/// Target format of one encoder session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    pub channels: u8,
    pub sample_rate: u32,
    pub bitrate_kbps: u32,
    pub quality: EncoderQuality,
}

impl EncoderSettings {
    /// Mono, 128 kbps CBR at the source sample rate
    pub fn mono(sample_rate: u32, quality: EncoderQuality) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bitrate_kbps: MP3_BITRATE_KBPS,
            quality,
        }
    }
}

/// Reject blocks an encoder session cannot take.
pub fn validate_block(samples: &[i16]) -> Result<(), EncodeError> {
    if samples.is_empty() {
        return Err(EncodeError::EmptyBlock);
    }
    if samples.len() > BLOCK_SIZE {
        return Err(EncodeError::BlockTooLarge {
            len: samples.len(),
            max: BLOCK_SIZE,
        });
    }
    Ok(())
}

/// A stateful encoding session.
///
/// Blocks must arrive in their original order and `flush` is called exactly
/// once at the end. A session is not shared between threads or reused.
pub trait FrameEncoder {
    fn state(&self) -> EncoderState;

    /// Encode one block. An empty result (or empty chunks) means the encoder
    /// is still holding lookahead.
    fn submit_block(&mut self, samples: &[i16]) -> Result<Vec<Vec<u8>>, EncodeError>;

    /// Drain buffered frames and finish the bitstream.
    fn flush(&mut self) -> Result<Vec<Vec<u8>>, EncodeError>;
}

/// Creates a fresh [`FrameEncoder`] for every encode call
pub trait FrameEncoderFactory: Send + Sync {
    fn create(&self, settings: &EncoderSettings) -> Result<Box<dyn FrameEncoder>, EncodeError>;
}

impl FrameEncoderFactory for Box<dyn FrameEncoderFactory> {
    fn create(&self, settings: &EncoderSettings) -> Result<Box<dyn FrameEncoder>, EncodeError> {
        self.as_ref().create(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_settings() {
        let settings = EncoderSettings::mono(44_100, EncoderQuality::Good);
        assert_eq!(settings.channels, 1);
        assert_eq!(settings.sample_rate, 44_100);
        assert_eq!(settings.bitrate_kbps, 128);
    }

    #[test]
    fn validate_block_bounds() {
        assert!(matches!(validate_block(&[]), Err(EncodeError::EmptyBlock)));
        assert!(validate_block(&[0; 1]).is_ok());
        assert!(validate_block(&[0; BLOCK_SIZE]).is_ok());
        assert!(matches!(
            validate_block(&[0; BLOCK_SIZE + 1]),
            Err(EncodeError::BlockTooLarge { len: 1153, max: 1152 })
        ));
    }
}
