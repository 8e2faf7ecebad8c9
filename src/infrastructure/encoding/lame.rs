//! MP3 encoding with LAME
//!
//! One [`LameFrameEncoder`] is one LAME session: blocks go in through
//! `submit_block`, the bitstream is finished by `flush`.

use mp3lame_encoder::{max_required_buffer_size, Bitrate, Builder, FlushNoGap, MonoPcm, Quality};
use tracing::debug;

use crate::application::ports::{
    validate_block, EncodeError, EncoderSettings, FrameEncoder, FrameEncoderFactory,
};
use crate::domain::audio::EncoderState;
use crate::domain::config::EncoderQuality;

/// Sample rates an MPEG-1/2/2.5 layer III stream can carry
pub const SUPPORTED_SAMPLE_RATES: [u32; 9] = [
    8_000, 11_025, 12_000, 16_000, 22_050, 24_000, 32_000, 44_100, 48_000,
];

/// LAME needs at least this much room to flush its last frames
const FLUSH_BUFFER_SIZE: usize = 7200;

fn lame_bitrate(kbps: u32) -> Result<Bitrate, EncodeError> {
    Ok(match kbps {
        64 => Bitrate::Kbps64,
        96 => Bitrate::Kbps96,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => {
            return Err(EncodeError::Unsupported(format!(
                "bitrate {} kbps",
                other
            )))
        }
    })
}

fn lame_quality(quality: EncoderQuality) -> Quality {
    match quality {
        EncoderQuality::Best => Quality::Best,
        EncoderQuality::Good => Quality::Good,
        EncoderQuality::Fast => Quality::Decent,
    }
}

/// Creates a fresh LAME session per encode call
#[derive(Debug, Default, Clone)]
pub struct LameEncoderFactory;

impl LameEncoderFactory {
    pub fn new() -> Self {
        Self
    }
}

impl FrameEncoderFactory for LameEncoderFactory {
    fn create(&self, settings: &EncoderSettings) -> Result<Box<dyn FrameEncoder>, EncodeError> {
        Ok(Box::new(LameFrameEncoder::new(settings)?))
    }
}

/// Mono LAME session
pub struct LameFrameEncoder {
    encoder: mp3lame_encoder::Encoder,
    state: EncoderState,
}

impl LameFrameEncoder {
    pub fn new(settings: &EncoderSettings) -> Result<Self, EncodeError> {
        if settings.channels != 1 {
            return Err(EncodeError::Unsupported(format!(
                "{} channels, only mono is encoded",
                settings.channels
            )));
        }
        if !SUPPORTED_SAMPLE_RATES.contains(&settings.sample_rate) {
            return Err(EncodeError::Unsupported(format!(
                "sample rate {} Hz",
                settings.sample_rate
            )));
        }
        let bitrate = lame_bitrate(settings.bitrate_kbps)?;

        let mut builder = Builder::new()
            .ok_or_else(|| EncodeError::InitFailed("Failed to create LAME builder".into()))?;

        builder
            .set_num_channels(settings.channels)
            .map_err(|e| EncodeError::InitFailed(format!("Failed to set channels: {:?}", e)))?;

        builder
            .set_sample_rate(settings.sample_rate)
            .map_err(|e| EncodeError::InitFailed(format!("Failed to set sample rate: {:?}", e)))?;

        builder
            .set_brate(bitrate)
            .map_err(|e| EncodeError::InitFailed(format!("Failed to set bitrate: {:?}", e)))?;

        builder
            .set_quality(lame_quality(settings.quality))
            .map_err(|e| EncodeError::InitFailed(format!("Failed to set quality: {:?}", e)))?;

        let encoder = builder
            .build()
            .map_err(|e| EncodeError::InitFailed(format!("{:?}", e)))?;

        debug!(
            sample_rate = settings.sample_rate,
            bitrate_kbps = settings.bitrate_kbps,
            quality = %settings.quality,
            "LAME session opened"
        );

        Ok(Self {
            encoder,
            state: EncoderState::Idle,
        })
    }
}

impl FrameEncoder for LameFrameEncoder {
    fn state(&self) -> EncoderState {
        self.state
    }

    fn submit_block(&mut self, samples: &[i16]) -> Result<Vec<Vec<u8>>, EncodeError> {
        let next = self
            .state
            .after_submit()
            .ok_or(EncodeError::SessionFinalized)?;
        validate_block(samples)?;

        let mut mp3_data = Vec::with_capacity(max_required_buffer_size(samples.len()));
        let encoded_size = self
            .encoder
            .encode(MonoPcm(samples), mp3_data.spare_capacity_mut())
            .map_err(|e| EncodeError::EncodeFailed(format!("{:?}", e)))?;

        // SAFETY: encode reports how many bytes of the spare capacity it
        // initialized.
        unsafe {
            mp3_data.set_len(encoded_size);
        }

        self.state = next;
        Ok(vec![mp3_data])
    }

    fn flush(&mut self) -> Result<Vec<Vec<u8>>, EncodeError> {
        let next = self
            .state
            .after_flush()
            .ok_or(EncodeError::SessionFinalized)?;

        let mut mp3_data = Vec::with_capacity(FLUSH_BUFFER_SIZE);
        let flush_size = self
            .encoder
            .flush::<FlushNoGap>(mp3_data.spare_capacity_mut())
            .map_err(|e| EncodeError::EncodeFailed(format!("Failed to flush: {:?}", e)))?;

        // SAFETY: flush reports how many bytes it initialized.
        unsafe {
            mp3_data.set_len(flush_size);
        }

        self.state = next;
        Ok(vec![mp3_data])
    }
}
