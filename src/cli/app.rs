//! App runners for the record, encode and upload commands

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tracing::warn;

use crate::application::ports::{ConfigStore, Notifier, UploadError};
use crate::application::{
    EncodePipeline, RecordCallbacks, RecordInput, RecordUseCase, TranscodeUseCase,
    UploadRecordingUseCase,
};
use crate::domain::audio::EncodedOutput;
use crate::domain::config::{AppConfig, EncoderQuality};
use crate::infrastructure::{
    create_notifier, CpalCaptureDevice, HttpUploader, LameEncoderFactory,
    SymphoniaDecoder, XdgConfigStore,
};

use super::args::RecordOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment override for the upload endpoint
pub const UPLOAD_URL_ENV: &str = "AUDIO_RECORDER_UPLOAD_URL";

fn pipeline(quality: EncoderQuality) -> EncodePipeline<SymphoniaDecoder, LameEncoderFactory> {
    EncodePipeline::new(SymphoniaDecoder::new(), LameEncoderFactory::new()).with_quality(quality)
}

/// Record from the microphone until the duration elapses or Ctrl+C
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let uploader = match HttpUploader::new(&options.upload_url) {
        Ok(uploader) => uploader,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    let mut use_case = RecordUseCase::new(
        CpalCaptureDevice::new(),
        pipeline(options.quality),
        uploader,
        create_notifier(options.notify),
    );

    let input = RecordInput {
        duration: options.duration,
        output: Some(options.output.clone()),
        upload: options.upload,
        enable_notify: options.notify,
    };

    presenter.start_spinner("Opening microphone...");
    let callbacks = match presenter.spinner_handle() {
        Some(bar) => spinner_callbacks(bar),
        None => RecordCallbacks::default(),
    };

    let output = match use_case.execute(input, callbacks, shutdown.wait()).await {
        Ok(output) => output,
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let location = output
        .written_to
        .as_deref()
        .unwrap_or(options.output.as_path());
    presenter.spinner_success(&Presenter::saved_message(location, &output.encoded));

    match output.upload {
        None => ExitCode::from(EXIT_SUCCESS),
        Some(result) => report_upload(&presenter, result),
    }
}

fn spinner_callbacks(bar: indicatif::ProgressBar) -> RecordCallbacks {
    let on_start = bar.clone();
    let on_progress = bar.clone();
    let on_end = bar.clone();
    let on_upload = bar;

    RecordCallbacks {
        on_recording_start: Some(Box::new(move || {
            on_start.set_message("Recording... (Ctrl+C to stop)");
        })),
        on_progress: Some(Arc::new(move |elapsed, total, bytes| {
            on_progress.set_message(Presenter::recording_message(elapsed, total, bytes));
        })),
        on_recording_end: Some(Box::new(move |_bytes| {
            on_end.set_message("Encoding to MP3...");
        })),
        on_encoding_end: None,
        on_upload_start: Some(Box::new(move || {
            on_upload.set_message("Uploading...");
        })),
    }
}

fn report_upload(
    presenter: &Presenter,
    result: Result<crate::application::ports::UploadReceipt, UploadError>,
) -> ExitCode {
    match result {
        Ok(receipt) => {
            match receipt.message {
                Some(message) => presenter.success(&format!("Uploaded: {}", message)),
                None => presenter.success("Recording uploaded successfully!"),
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&format!("Error uploading recording: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Default output for `encode`: the input with an `.mp3` extension, or a
/// sibling name when the input already is one.
pub fn default_encode_output(input: &Path) -> PathBuf {
    let is_mp3 = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp3"));

    if is_mp3 {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording".to_string());
        input.with_file_name(format!("{}.reencoded.mp3", stem))
    } else {
        input.with_extension("mp3")
    }
}

/// Transcode a container file to MP3
pub async fn run_encode(input: PathBuf, output: PathBuf, quality: EncoderQuality) -> ExitCode {
    let mut presenter = Presenter::new();

    presenter.start_spinner(&format!("Encoding {}...", input.display()));
    let use_case = TranscodeUseCase::new(pipeline(quality));
    match use_case.execute(&input, &output).await {
        Ok(encoded) => {
            presenter.spinner_success(&Presenter::saved_message(&output, &encoded));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Upload an MP3 file from disk
pub async fn run_upload(file: PathBuf, upload_url: &str, notify: bool) -> ExitCode {
    let mut presenter = Presenter::new();

    let uploader = match HttpUploader::new(upload_url) {
        Ok(uploader) => uploader,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let data = match tokio::fs::read(&file).await {
        Ok(data) if !data.is_empty() => data,
        Ok(_) => {
            presenter.error(&format!("{} is empty", file.display()));
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.error(&format!("Failed to read {}: {}", file.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let audio = EncodedOutput::from_mp3_bytes(data);

    let notifier: Box<dyn Notifier> = create_notifier(notify);
    let use_case = UploadRecordingUseCase::new(uploader, notifier);

    presenter.start_spinner(&format!("Uploading to {}...", upload_url));
    let result = use_case.execute(&audio, notify).await;
    presenter.stop_spinner();
    report_upload(&presenter, result)
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!("ignoring config file {}: {}", store.path().display(), e);
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        upload_url: env::var(UPLOAD_URL_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_output_swaps_extension() {
        assert_eq!(
            default_encode_output(Path::new("dir/take.webm")),
            PathBuf::from("dir/take.mp3")
        );
        assert_eq!(
            default_encode_output(Path::new("take")),
            PathBuf::from("take.mp3")
        );
    }

    #[test]
    fn encode_output_never_overwrites_mp3_input() {
        assert_eq!(
            default_encode_output(Path::new("dir/take.MP3")),
            PathBuf::from("dir/take.reencoded.mp3")
        );
    }
}
