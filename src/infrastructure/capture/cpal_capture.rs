//! Microphone capture using cpal
//!
//! The cpal stream is not `Send`, so it lives on its own thread for the whole
//! recording. Samples are buffered there and written out as a single 32-bit
//! float WAV chunk when the track is stopped.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::thread::JoinHandle;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BuildStreamError, SampleFormat, SampleRate, StreamConfig};
use hound::{WavSpec, WavWriter};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::application::ports::{
    CaptureDevice, CaptureError, CaptureEvent, CaptureStream, CaptureTrack,
};
use crate::domain::audio::ContainerMimeType;

/// Rates tried first, in order, when the device supports a range
const PREFERRED_SAMPLE_RATES: [u32; 2] = [48_000, 44_100];

/// Poll interval of the capture thread while waiting for stop
const STOP_POLL_MS: u64 = 20;

/// Capture device backed by the default cpal input
#[derive(Debug, Default, Clone)]
pub struct CpalCaptureDevice;

impl CpalCaptureDevice {
    pub fn new() -> Self {
        Self
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::NoInputDevice)
    }

    /// Pick an f32 or i16 configuration, preferring fewer channels and a
    /// common speech rate.
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;
        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    config.channels() < current.channels()
                        || (config.channels() == current.channels()
                            && config.sample_format() == SampleFormat::F32
                            && current.sample_format() != SampleFormat::F32)
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config
            .ok_or_else(|| CaptureError::StartFailed("No suitable config found".into()))?;

        let sample_rate = PREFERRED_SAMPLE_RATES
            .iter()
            .copied()
            .find(|&rate| {
                config_range.min_sample_rate().0 <= rate && config_range.max_sample_rate().0 >= rate
            })
            .map(SampleRate)
            .unwrap_or_else(|| config_range.max_sample_rate());

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        sample_format: SampleFormat,
        buffer: Arc<StdMutex<Vec<f32>>>,
    ) -> Result<cpal::Stream, CaptureError> {
        let on_error = |err: cpal::StreamError| error!("audio stream error: {}", err);

        let stream = match sample_format {
            SampleFormat::F32 => device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut samples) = buffer.lock() {
                        samples.extend_from_slice(data);
                    }
                },
                on_error,
                None,
            ),
            SampleFormat::I16 => device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut samples) = buffer.lock() {
                        samples.extend(data.iter().map(|&s| i16_to_f32(s)));
                    }
                },
                on_error,
                None,
            ),
            other => {
                return Err(CaptureError::StartFailed(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream.map_err(|e| match e {
            BuildStreamError::DeviceNotAvailable => {
                CaptureError::PermissionDenied("input device is not available".into())
            }
            other => CaptureError::StartFailed(other.to_string()),
        })
    }

    /// Body of the capture thread. `discard` skips the WAV write when the
    /// track is dropped instead of stopped.
    fn run(
        stop: Arc<AtomicBool>,
        discard: Arc<AtomicBool>,
        ready: oneshot::Sender<Result<(), CaptureError>>,
        events: mpsc::UnboundedSender<CaptureEvent>,
    ) {
        let buffer = Arc::new(StdMutex::new(Vec::new()));

        let started = Self::get_input_device().and_then(|device| {
            let (config, sample_format) = Self::get_input_config(&device)?;
            let stream = Self::build_stream(&device, &config, sample_format, Arc::clone(&buffer))?;
            stream
                .play()
                .map_err(|e| CaptureError::StartFailed(e.to_string()))?;
            Ok((stream, config))
        });

        let (stream, config) = match started {
            Ok(started) => started,
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        info!(
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            "microphone opened"
        );
        if ready.send(Ok(())).is_err() {
            // Caller went away before the stream was handed out
            return;
        }

        while !stop.load(Ordering::SeqCst) {
            std::thread::sleep(std::time::Duration::from_millis(STOP_POLL_MS));
        }
        drop(stream);

        let samples = match buffer.lock() {
            Ok(mut samples) => std::mem::take(&mut *samples),
            Err(_) => Vec::new(),
        };
        debug!(samples = samples.len(), "microphone closed");

        if !samples.is_empty() && !discard.load(Ordering::SeqCst) {
            match write_wav(&samples, config.sample_rate.0, config.channels) {
                Ok(wav) => {
                    let _ = events.send(CaptureEvent::Data(wav));
                }
                Err(e) => warn!("failed to write captured audio: {}", e),
            }
        }
        let _ = events.send(CaptureEvent::Stopped);
    }
}

#[async_trait]
impl CaptureDevice for CpalCaptureDevice {
    async fn start_capture(&self) -> Result<CaptureStream, CaptureError> {
        let stop = Arc::new(AtomicBool::new(false));
        let discard = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = oneshot::channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let thread_stop = Arc::clone(&stop);
        let thread_discard = Arc::clone(&discard);
        let handle = std::thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || Self::run(thread_stop, thread_discard, ready_tx, events_tx))
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        ready_rx
            .await
            .map_err(|_| CaptureError::StartFailed("capture thread exited".into()))??;

        let track = CpalTrack {
            stop,
            discard,
            handle: Some(handle),
        };
        Ok(CaptureStream::new(
            ContainerMimeType::Wav,
            events_rx,
            Box::new(track),
        ))
    }
}

/// Handle to the capture thread
struct CpalTrack {
    stop: Arc<AtomicBool>,
    discard: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureTrack for CpalTrack {
    fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for CpalTrack {
    /// Blocks until the capture thread has closed the stream, at most one
    /// poll interval when nothing is left to write.
    fn drop(&mut self) {
        self.discard.store(true, Ordering::SeqCst);
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("capture thread panicked");
            }
        }
    }
}

fn i16_to_f32(sample: i16) -> f32 {
    sample as f32 / 32768.0
}

/// Serialize interleaved samples as a complete 32-bit float WAV file.
pub fn write_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}
