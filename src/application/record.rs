//! Record and upload use cases

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::domain::audio::{EncodedOutput, OUTPUT_FILENAME};
use crate::domain::recording::Duration;

use super::capture::CaptureController;
use super::encode::{EncodePipeline, PipelineError};
use super::ports::{
    Alert, CaptureDevice, CaptureError, ContainerDecoder, FrameEncoderFactory, Notifier,
    UploadError, UploadReceipt, Uploader, UPLOAD_MIME_TYPE,
};

/// Errors from the record use case
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{0}")]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Failed to write {path}: {message}")]
    Output { path: String, message: String },
}

/// Progress callback: (elapsed_ms, total_ms, captured_bytes)
pub type ProgressCallback = Arc<dyn Fn(u64, u64, usize) + Send + Sync>;

/// Input parameters for the record use case
#[derive(Debug, Clone, Default)]
pub struct RecordInput {
    /// Stop automatically after this long
    pub duration: Duration,
    /// Where to write the MP3 preview, if anywhere
    pub output: Option<PathBuf>,
    /// Send the MP3 to the upload endpoint
    pub upload: bool,
    /// Show desktop notifications for capture and upload outcomes
    pub enable_notify: bool,
}

/// Output from the record use case
#[derive(Debug)]
pub struct RecordOutput {
    pub encoded: EncodedOutput,
    pub written_to: Option<PathBuf>,
    /// Upload outcome when an upload was requested. A failed upload does not
    /// fail the recording.
    pub upload: Option<Result<UploadReceipt, UploadError>>,
}

/// Callbacks for progress and status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct RecordCallbacks {
    pub on_progress: Option<ProgressCallback>,
    pub on_recording_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called with the size of the recorded container in bytes
    pub on_recording_end: Option<Box<dyn Fn(usize) + Send + Sync>>,
    pub on_encoding_end: Option<Box<dyn Fn(&EncodedOutput) + Send + Sync>>,
    pub on_upload_start: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Record -> encode -> preview file -> optional upload
pub struct RecordUseCase<C, D, F, U, N>
where
    C: CaptureDevice,
    D: ContainerDecoder,
    F: FrameEncoderFactory,
    U: Uploader,
    N: Notifier,
{
    capture: CaptureController<C>,
    pipeline: EncodePipeline<D, F>,
    uploader: U,
    notifier: N,
}

impl<C, D, F, U, N> RecordUseCase<C, D, F, U, N>
where
    C: CaptureDevice,
    D: ContainerDecoder,
    F: FrameEncoderFactory,
    U: Uploader,
    N: Notifier,
{
    pub fn new(device: C, pipeline: EncodePipeline<D, F>, uploader: U, notifier: N) -> Self {
        Self {
            capture: CaptureController::new(device),
            pipeline,
            uploader,
            notifier,
        }
    }

    /// Record until `input.duration` elapses or `stop` resolves, whichever
    /// comes first.
    pub async fn execute<S>(
        &mut self,
        input: RecordInput,
        callbacks: RecordCallbacks,
        stop: S,
    ) -> Result<RecordOutput, RecordError>
    where
        S: Future<Output = ()>,
    {
        if let Err(e) = self.capture.start().await {
            if input.enable_notify {
                alert(
                    &self.notifier,
                    &Alert::MicrophoneUnavailable(e.to_string()),
                )
                .await;
            }
            return Err(e.into());
        }

        if let Some(ref cb) = callbacks.on_recording_start {
            cb();
        }

        self.wait_for_stop(input.duration, callbacks.on_progress.as_ref(), stop)
            .await;

        let blob = self.capture.stop().await?;

        if let Some(ref cb) = callbacks.on_recording_end {
            cb(blob.len());
        }

        let encoded = self.pipeline.encode(&blob).await?;
        info!(bytes = encoded.size_bytes(), "recording encoded");

        if let Some(ref cb) = callbacks.on_encoding_end {
            cb(&encoded);
        }

        let written_to = match input.output {
            Some(path) => {
                tokio::fs::write(&path, encoded.data())
                    .await
                    .map_err(|e| RecordError::Output {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
                Some(path)
            }
            None => None,
        };

        let upload = if input.upload {
            if let Some(ref cb) = callbacks.on_upload_start {
                cb();
            }
            Some(
                upload_with_alert(&self.uploader, &self.notifier, &encoded, input.enable_notify)
                    .await,
            )
        } else {
            None
        };

        Ok(RecordOutput {
            encoded,
            written_to,
            upload,
        })
    }

    async fn wait_for_stop<S>(&mut self, duration: Duration, progress: Option<&ProgressCallback>, stop: S)
    where
        S: Future<Output = ()>,
    {
        let total_ms = duration.as_millis();
        let started = Instant::now();
        let deadline = started
            .checked_add(duration.as_std())
            .unwrap_or_else(|| started + Duration::max_duration().as_std());

        let mut ticker = interval(std::time::Duration::from_millis(100));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(stop);
        loop {
            tokio::select! {
                _ = &mut stop => {
                    info!("recording stopped by user");
                    break;
                }
                _ = tokio::time::sleep_until(deadline) => break,
                _ = ticker.tick() => {
                    let bytes = match self.capture.session_mut() {
                        Some(session) => {
                            session.poll_chunks();
                            session.byte_len()
                        }
                        None => 0,
                    };
                    if let Some(cb) = progress {
                        let elapsed = (started.elapsed().as_millis() as u64).min(total_ms);
                        cb(elapsed, total_ms, bytes);
                    }
                }
            }
        }
    }
}

/// Re-upload an MP3 that was produced earlier
pub struct UploadRecordingUseCase<U, N>
where
    U: Uploader,
    N: Notifier,
{
    uploader: U,
    notifier: N,
}

impl<U, N> UploadRecordingUseCase<U, N>
where
    U: Uploader,
    N: Notifier,
{
    pub fn new(uploader: U, notifier: N) -> Self {
        Self { uploader, notifier }
    }

    pub async fn execute(
        &self,
        audio: &EncodedOutput,
        enable_notify: bool,
    ) -> Result<UploadReceipt, UploadError> {
        upload_with_alert(&self.uploader, &self.notifier, audio, enable_notify).await
    }
}

async fn upload_with_alert<U, N>(
    uploader: &U,
    notifier: &N,
    audio: &EncodedOutput,
    enable_notify: bool,
) -> Result<UploadReceipt, UploadError>
where
    U: Uploader,
    N: Notifier,
{
    let result = uploader.send(audio, OUTPUT_FILENAME, UPLOAD_MIME_TYPE).await;

    let outcome = match &result {
        Ok(_) => {
            info!(bytes = audio.size_bytes(), "upload succeeded");
            Alert::Uploaded
        }
        Err(e) => {
            warn!("upload failed: {}", e);
            Alert::UploadFailed(e.to_string())
        }
    };

    if enable_notify {
        alert(notifier, &outcome).await;
    }

    result
}

async fn alert<N: Notifier>(notifier: &N, alert: &Alert) {
    if let Err(e) = notifier.alert(alert).await {
        warn!("notification failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::capture::tests::FakeDevice;
    use crate::application::ports::{
        DecodeError, EncodeError, EncoderSettings, FrameEncoder, NotificationError,
    };
    use crate::domain::audio::{EncoderState, PcmBuffer, RawContainerBlob};
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    struct SilenceDecoder;

    #[async_trait]
    impl ContainerDecoder for SilenceDecoder {
        async fn decode_container(
            &self,
            _blob: &RawContainerBlob,
        ) -> Result<PcmBuffer, DecodeError> {
            Ok(PcmBuffer::mono(44_100, vec![0.0; 2304])?)
        }
    }

    struct ByteEncoder(EncoderState);

    impl FrameEncoder for ByteEncoder {
        fn state(&self) -> EncoderState {
            self.0
        }

        fn submit_block(&mut self, _samples: &[i16]) -> Result<Vec<Vec<u8>>, EncodeError> {
            self.0 = self.0.after_submit().ok_or(EncodeError::SessionFinalized)?;
            Ok(vec![vec![0xAA]])
        }

        fn flush(&mut self) -> Result<Vec<Vec<u8>>, EncodeError> {
            self.0 = self.0.after_flush().ok_or(EncodeError::SessionFinalized)?;
            Ok(vec![vec![0xBB]])
        }
    }

    struct ByteEncoderFactory;

    impl FrameEncoderFactory for ByteEncoderFactory {
        fn create(
            &self,
            _settings: &EncoderSettings,
        ) -> Result<Box<dyn FrameEncoder>, EncodeError> {
            Ok(Box::new(ByteEncoder(EncoderState::Idle)))
        }
    }

    #[derive(Clone, Default)]
    struct MockUploader {
        sent: Arc<Mutex<Vec<(usize, String, String)>>>,
        fail: bool,
    }

    #[async_trait]
    impl Uploader for MockUploader {
        async fn send(
            &self,
            audio: &EncodedOutput,
            filename: &str,
            mime_type: &str,
        ) -> Result<UploadReceipt, UploadError> {
            self.sent.lock().unwrap().push((
                audio.size_bytes(),
                filename.to_string(),
                mime_type.to_string(),
            ));
            if self.fail {
                return Err(UploadError::Server {
                    status: 500,
                    message: "disk full".into(),
                });
            }
            Ok(UploadReceipt {
                status: 200,
                message: None,
            })
        }
    }

    #[derive(Clone, Default)]
    struct MockNotifier {
        alerts: Arc<Mutex<Vec<Alert>>>,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn alert(&self, alert: &Alert) -> Result<(), NotificationError> {
            self.alerts.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    fn use_case(
        device: FakeDevice,
        uploader: MockUploader,
        notifier: MockNotifier,
    ) -> RecordUseCase<FakeDevice, SilenceDecoder, ByteEncoderFactory, MockUploader, MockNotifier>
    {
        RecordUseCase::new(
            device,
            EncodePipeline::new(SilenceDecoder, ByteEncoderFactory),
            uploader,
            notifier,
        )
    }

    #[tokio::test]
    async fn records_encodes_writes_and_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.mp3");
        let device = FakeDevice::with_chunks(vec![vec![1, 2, 3]]);
        let uploader = MockUploader::default();
        let sent = Arc::clone(&uploader.sent);
        let mut use_case = use_case(device.clone(), uploader, MockNotifier::default());

        let input = RecordInput {
            output: Some(path.clone()),
            upload: true,
            ..Default::default()
        };
        let output = use_case
            .execute(input, RecordCallbacks::default(), std::future::ready(()))
            .await
            .unwrap();

        // two blocks plus flush
        assert_eq!(output.encoded.data(), &[0xAA, 0xAA, 0xBB]);
        assert_eq!(std::fs::read(&path).unwrap(), output.encoded.data());
        assert_eq!(output.written_to, Some(path));
        assert!(matches!(output.upload, Some(Ok(_))));
        assert_eq!(
            *sent.lock().unwrap(),
            vec![(3, "recording.mp3".to_string(), "audio/mp3".to_string())]
        );
        assert_eq!(device.active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stop_before_any_chunk_is_decode_error() {
        let device = FakeDevice::default();
        let mut use_case = use_case(device.clone(), MockUploader::default(), MockNotifier::default());

        let err = use_case
            .execute(
                RecordInput::default(),
                RecordCallbacks::default(),
                std::future::ready(()),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RecordError::Pipeline(PipelineError::Decode(DecodeError::Empty))
        ));
        assert_eq!(device.active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn permission_denied_is_reported() {
        let notifier = MockNotifier::default();
        let alerts = Arc::clone(&notifier.alerts);
        let mut use_case = use_case(FakeDevice::denied(), MockUploader::default(), notifier);

        let input = RecordInput {
            enable_notify: true,
            ..Default::default()
        };
        let err = use_case
            .execute(input, RecordCallbacks::default(), std::future::ready(()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RecordError::Capture(CaptureError::PermissionDenied(_))
        ));
        let alerts = alerts.lock().unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(matches!(alerts[0], Alert::MicrophoneUnavailable(_)));
    }

    #[tokio::test]
    async fn failed_upload_keeps_the_recording() {
        let uploader = MockUploader {
            fail: true,
            ..Default::default()
        };
        let notifier = MockNotifier::default();
        let alerts = Arc::clone(&notifier.alerts);
        let mut use_case = use_case(
            FakeDevice::with_chunks(vec![vec![1]]),
            uploader,
            notifier,
        );

        let input = RecordInput {
            upload: true,
            enable_notify: true,
            ..Default::default()
        };
        let output = use_case
            .execute(input, RecordCallbacks::default(), std::future::ready(()))
            .await
            .unwrap();

        assert!(!output.encoded.is_empty());
        match output.upload {
            Some(Err(UploadError::Server { status, message })) => {
                assert_eq!(status, 500);
                assert_eq!(message, "disk full");
            }
            other => panic!("expected server error, got {:?}", other),
        }
        let alerts = alerts.lock().unwrap();
        assert_eq!(
            alerts[0],
            Alert::UploadFailed("Server rejected upload (HTTP 500): disk full".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn duration_ends_the_recording() {
        let progress = Arc::new(Mutex::new(Vec::new()));
        let progress_log = Arc::clone(&progress);
        let callbacks = RecordCallbacks {
            on_progress: Some(Arc::new(move |elapsed, total, _bytes| {
                progress_log.lock().unwrap().push((elapsed, total));
            })),
            ..Default::default()
        };
        let mut use_case = use_case(
            FakeDevice::with_chunks(vec![vec![1]]),
            MockUploader::default(),
            MockNotifier::default(),
        );

        let input = RecordInput {
            duration: Duration::from_secs(1),
            ..Default::default()
        };
        let output = use_case
            .execute(input, callbacks, std::future::pending())
            .await
            .unwrap();

        assert!(output.upload.is_none());
        let progress = progress.lock().unwrap();
        assert!(!progress.is_empty());
        assert!(progress.iter().all(|&(e, t)| t == 1000 && e <= 1000));
    }

    #[tokio::test(start_paused = true)]
    async fn huge_duration_does_not_overflow_the_deadline() {
        let mut use_case = use_case(
            FakeDevice::with_chunks(vec![vec![1]]),
            MockUploader::default(),
            MockNotifier::default(),
        );

        let input = RecordInput {
            duration: Duration::from_secs(u64::MAX),
            ..Default::default()
        };
        let output = use_case
            .execute(input, RecordCallbacks::default(), std::future::ready(()))
            .await
            .unwrap();

        assert!(!output.encoded.is_empty());
    }

    #[tokio::test]
    async fn upload_use_case_sends_mp3() {
        let uploader = MockUploader::default();
        let sent = Arc::clone(&uploader.sent);
        let use_case = UploadRecordingUseCase::new(uploader, MockNotifier::default());

        let audio = EncodedOutput::from_mp3_bytes(vec![0xFF, 0xFB, 0x90, 0x00]);
        let receipt = use_case.execute(&audio, false).await.unwrap();

        assert_eq!(receipt.status, 200);
        assert_eq!(sent.lock().unwrap()[0].0, 4);
    }
}
