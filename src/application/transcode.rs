//! Transcode use case: an existing container file to MP3

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::audio::{ContainerMimeType, EncodedOutput, RawContainerBlob};

use super::encode::{EncodePipeline, PipelineError};
use super::ports::{ContainerDecoder, FrameEncoderFactory};

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to read audio file {path}: {message}")]
    Read { path: String, message: String },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Failed to write {path}: {message}")]
    Output { path: String, message: String },
}

pub struct TranscodeUseCase<D, F>
where
    D: ContainerDecoder,
    F: FrameEncoderFactory,
{
    pipeline: EncodePipeline<D, F>,
}

impl<D, F> TranscodeUseCase<D, F>
where
    D: ContainerDecoder,
    F: FrameEncoderFactory,
{
    pub fn new(pipeline: EncodePipeline<D, F>) -> Self {
        Self { pipeline }
    }

    /// Read `input`, encode it and write the MP3 to `output`.
    pub async fn execute(&self, input: &Path, output: &Path) -> Result<EncodedOutput, TranscodeError> {
        let blob = read_container(input).await?;
        self.encode_to(&blob, output).await
    }

    /// Encode a blob already in memory and write the MP3 to `output`.
    pub async fn encode_to(
        &self,
        blob: &RawContainerBlob,
        output: &Path,
    ) -> Result<EncodedOutput, TranscodeError> {
        let encoded = self.pipeline.encode(blob).await?;

        tokio::fs::write(output, encoded.data())
            .await
            .map_err(|e| TranscodeError::Output {
                path: output.display().to_string(),
                message: e.to_string(),
            })?;

        info!(
            path = %output.display(),
            bytes = encoded.size_bytes(),
            "transcoded"
        );
        Ok(encoded)
    }
}

async fn read_container(path: &Path) -> Result<RawContainerBlob, TranscodeError> {
    let mime_type = ContainerMimeType::from_path(path);
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| TranscodeError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    debug!(path = %path.display(), bytes = data.len(), %mime_type, "container read");
    Ok(RawContainerBlob::new(data, mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        DecodeError, EncodeError, EncoderSettings, FrameEncoder,
    };
    use crate::domain::audio::{EncoderState, PcmBuffer};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Decodes every blob to 100 samples at half scale, remembering the tag
    #[derive(Default, Clone)]
    struct RampDecoder {
        seen: Arc<Mutex<Vec<ContainerMimeType>>>,
    }

    #[async_trait]
    impl ContainerDecoder for RampDecoder {
        async fn decode_container(
            &self,
            blob: &RawContainerBlob,
        ) -> Result<PcmBuffer, DecodeError> {
            if blob.is_empty() {
                return Err(DecodeError::Empty);
            }
            self.seen.lock().unwrap().push(blob.mime_type());
            Ok(PcmBuffer::mono(8_000, vec![0.5; 100])?)
        }
    }

    struct EchoEncoder(EncoderState);

    impl FrameEncoder for EchoEncoder {
        fn state(&self) -> EncoderState {
            self.0
        }

        fn submit_block(&mut self, samples: &[i16]) -> Result<Vec<Vec<u8>>, EncodeError> {
            self.0 = self.0.after_submit().ok_or(EncodeError::SessionFinalized)?;
            Ok(vec![samples[0].to_le_bytes().to_vec()])
        }

        fn flush(&mut self) -> Result<Vec<Vec<u8>>, EncodeError> {
            self.0 = self.0.after_flush().ok_or(EncodeError::SessionFinalized)?;
            Ok(Vec::new())
        }
    }

    struct EchoFactory;

    impl FrameEncoderFactory for EchoFactory {
        fn create(
            &self,
            _settings: &EncoderSettings,
        ) -> Result<Box<dyn FrameEncoder>, EncodeError> {
            Ok(Box::new(EchoEncoder(EncoderState::Idle)))
        }
    }

    fn use_case(decoder: RampDecoder) -> TranscodeUseCase<RampDecoder, EchoFactory> {
        TranscodeUseCase::new(EncodePipeline::new(decoder, EchoFactory))
    }

    #[tokio::test]
    async fn reads_tags_encodes_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("take.WAV");
        let output = dir.path().join("out.mp3");
        std::fs::write(&input, b"RIFF").unwrap();
        let decoder = RampDecoder::default();
        let seen = Arc::clone(&decoder.seen);

        let encoded = use_case(decoder).execute(&input, &output).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![ContainerMimeType::Wav]);
        // 0.5 * 32767 truncates to 16383
        assert_eq!(encoded.data(), &16383i16.to_le_bytes());
        assert_eq!(std::fs::read(&output).unwrap(), encoded.data());
    }

    #[tokio::test]
    async fn missing_input_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nope.webm");
        let output = dir.path().join("out.mp3");

        let err = use_case(RampDecoder::default())
            .execute(&input, &output)
            .await
            .unwrap_err();

        assert!(matches!(err, TranscodeError::Read { .. }));
        assert!(err.to_string().starts_with("Failed to read audio file"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.webm");
        let output = dir.path().join("out.mp3");
        std::fs::write(&input, b"").unwrap();

        let err = use_case(RampDecoder::default())
            .execute(&input, &output)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TranscodeError::Pipeline(PipelineError::Decode(DecodeError::Empty))
        ));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn unwritable_output_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing/dir/out.mp3");

        let blob = RawContainerBlob::new(vec![1], ContainerMimeType::Wav);
        let err = use_case(RampDecoder::default())
            .encode_to(&blob, &output)
            .await
            .unwrap_err();
        assert!(matches!(err, TranscodeError::Output { .. }));
    }
}
