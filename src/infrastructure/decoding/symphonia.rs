//! Container decoding with symphonia

use std::io::Cursor;

use async_trait::async_trait;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{
    CodecParameters, Decoder, DecoderOptions, CODEC_TYPE_NULL, CODEC_TYPE_OPUS,
};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::application::ports::{ContainerDecoder, DecodeError};
use crate::domain::audio::{ContainerMimeType, PcmBuffer, RawContainerBlob};

/// Decodes any container symphonia can probe into planar f32 PCM at the
/// source sample rate
#[derive(Debug, Default, Clone)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Symphonia 0.5 demuxes WebM and Ogg but has no Opus decoder. Opus
    /// tracks are rejected by name.
    fn make_decoder(params: &CodecParameters) -> Result<Box<dyn Decoder>, DecodeError> {
        if params.codec == CODEC_TYPE_OPUS {
            return Err(DecodeError::UnsupportedCodec(
                "Opus (WebM/Ogg browser recordings); convert to WAV, FLAC or MP3 first".into(),
            ));
        }

        symphonia::default::get_codecs()
            .make(params, &DecoderOptions::default())
            .map_err(|e| match e {
                Error::Unsupported(what) => DecodeError::UnsupportedCodec(what.to_string()),
                other => DecodeError::Malformed(other.to_string()),
            })
    }

    /// Blocking decode of a whole container held in memory
    pub fn decode_bytes(data: Vec<u8>, mime_type: ContainerMimeType) -> Result<PcmBuffer, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

        let mut hint = Hint::new();
        hint.with_extension(mime_type.extension());
        hint.mime_type(mime_type.as_str());

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| match e {
                Error::Unsupported(what) => DecodeError::UnsupportedContainer(what.to_string()),
                other => DecodeError::Malformed(other.to_string()),
            })?;

        let mut format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeError::NoAudioTrack)?;

        let mut decoder = Self::make_decoder(&track.codec_params)?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels: Vec<Vec<f32>> = vec![
            Vec::new();
            track
                .codec_params
                .channels
                .map(|c| c.count())
                .unwrap_or(1)
        ];
        let mut skipped = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(Error::IoError(_)) => break, // EOF
                Err(Error::ResetRequired) => break,
                Err(err) => return Err(DecodeError::Malformed(err.to_string())),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    let count = spec.channels.count();
                    sample_rate = Some(spec.rate);
                    if channels.len() != count {
                        if channels.iter().any(|c| !c.is_empty()) {
                            return Err(DecodeError::Malformed(
                                "channel count changed mid-stream".into(),
                            ));
                        }
                        channels = vec![Vec::new(); count];
                    }

                    let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    sample_buf.copy_interleaved_ref(decoded);
                    for frame in sample_buf.samples().chunks(count) {
                        for (channel, &sample) in channels.iter_mut().zip(frame) {
                            channel.push(sample);
                        }
                    }
                }
                Err(Error::DecodeError(e)) => {
                    skipped += 1;
                    debug!("skipping undecodable packet: {}", e);
                }
                Err(err) => return Err(DecodeError::Malformed(err.to_string())),
            }
        }

        let sample_rate =
            sample_rate.ok_or_else(|| DecodeError::Malformed("unknown sample rate".into()))?;
        let pcm = PcmBuffer::new(sample_rate, channels)?;
        debug!(
            sample_rate,
            channels = pcm.channel_count(),
            frames = pcm.frames(),
            skipped,
            "container decoded"
        );
        Ok(pcm)
    }
}

#[async_trait]
impl ContainerDecoder for SymphoniaDecoder {
    async fn decode_container(&self, blob: &RawContainerBlob) -> Result<PcmBuffer, DecodeError> {
        if blob.is_empty() {
            return Err(DecodeError::Empty);
        }

        let data = blob.data().to_vec();
        let mime_type = blob.mime_type();
        tokio::task::spawn_blocking(move || Self::decode_bytes(data, mime_type))
            .await
            .map_err(|e| DecodeError::TaskFailed(e.to_string()))?
    }
}
