//! Decoded PCM buffer

use crate::domain::error::PcmBufferError;

/// Planar floating-point audio as produced by a container decoder.
///
/// Samples are nominally in `[-1.0, 1.0]`; the range is not enforced because
/// a decoder anomaly is passed through to quantization untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    /// Build a buffer, checking that every channel has the same length.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, PcmBufferError> {
        if sample_rate == 0 {
            return Err(PcmBufferError::ZeroSampleRate);
        }

        let expected = channels.first().ok_or(PcmBufferError::NoChannels)?.len();
        if let Some((channel, samples)) = channels
            .iter()
            .enumerate()
            .find(|(_, samples)| samples.len() != expected)
        {
            return Err(PcmBufferError::UnevenChannels {
                channel,
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Single-channel convenience constructor
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self, PcmBufferError> {
        Self::new(sample_rate, vec![samples])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Samples of one channel, or `None` when out of range
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// The channel the encoder consumes. Other channels are dropped, not mixed.
    pub fn primary_channel(&self) -> &[f32] {
        &self.channels[0]
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}
