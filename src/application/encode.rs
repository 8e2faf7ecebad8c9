//! Encode pipeline use case
//!
//! container blob -> PCM -> channel 0 -> i16 -> 1152-sample blocks -> MP3 chunks

use thiserror::Error;
use tracing::debug;

use crate::domain::audio::{
    block_count, blocks, last_block_len, quantize, ChunkAccumulator, EncodeReport, EncodedOutput,
    PcmBuffer, RawContainerBlob,
};
use crate::domain::config::EncoderQuality;

use super::ports::{ContainerDecoder, DecodeError, EncodeError, EncoderSettings, FrameEncoderFactory};

/// Errors from the encode pipeline. Any of them aborts the whole call.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("Decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
}

/// Batch transcoder from a recorded container to MP3.
///
/// Holds no state between calls: every `encode` decodes afresh and opens its
/// own encoder session, so the same blob always yields the same bytes.
pub struct EncodePipeline<D, F>
where
    D: ContainerDecoder,
    F: FrameEncoderFactory,
{
    decoder: D,
    encoders: F,
    quality: EncoderQuality,
}

impl<D, F> EncodePipeline<D, F>
where
    D: ContainerDecoder,
    F: FrameEncoderFactory,
{
    pub fn new(decoder: D, encoders: F) -> Self {
        Self {
            decoder,
            encoders,
            quality: EncoderQuality::default(),
        }
    }

    pub fn with_quality(mut self, quality: EncoderQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Decode the blob and encode its first channel to MP3.
    pub async fn encode(&self, blob: &RawContainerBlob) -> Result<EncodedOutput, PipelineError> {
        if blob.is_empty() {
            return Err(DecodeError::Empty.into());
        }

        debug!(
            bytes = blob.len(),
            mime = %blob.mime_type(),
            "decoding container"
        );
        let pcm = self.decoder.decode_container(blob).await?;

        self.encode_pcm(&pcm)
    }

    /// Encode an already decoded buffer. Never suspends.
    pub fn encode_pcm(&self, pcm: &PcmBuffer) -> Result<EncodedOutput, PipelineError> {
        debug!(
            sample_rate = pcm.sample_rate(),
            channels = pcm.channel_count(),
            frames = pcm.frames(),
            "decoded pcm"
        );

        let samples = quantize(pcm.primary_channel());

        let settings = EncoderSettings::mono(pcm.sample_rate(), self.quality);
        let mut encoder = self.encoders.create(&settings)?;
        let mut output = ChunkAccumulator::new();

        for block in blocks(&samples) {
            output.extend(encoder.submit_block(block)?);
        }
        output.extend(encoder.flush()?);

        let report = EncodeReport {
            sample_rate: pcm.sample_rate(),
            source_channels: pcm.channel_count(),
            samples: samples.len(),
            blocks: block_count(samples.len()),
            last_block_len: last_block_len(samples.len()),
        };

        debug!(
            blocks = report.blocks,
            chunks = output.chunk_count(),
            "encoded mp3"
        );

        Ok(output.finish(report))
    }
}
