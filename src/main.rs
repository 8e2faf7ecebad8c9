//! Audio Recorder CLI entry point

use std::process::ExitCode;

use clap::Parser;

use audio_recorder::cli::{
    app::{default_encode_output, load_merged_config, run_encode, run_record, run_upload},
    args::{Cli, Commands, RecordOptions},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
    EXIT_ERROR, EXIT_USAGE_ERROR,
};
use audio_recorder::domain::config::{AppConfig, EncoderQuality};
use audio_recorder::domain::recording::Duration;
use audio_recorder::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let presenter = Presenter::new();

    match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Record {
            duration,
            output,
            upload,
            url,
            quality,
            notify,
        } => {
            let cli_config = AppConfig {
                upload_url: url,
                duration,
                output: output.map(|p| p.to_string_lossy().into_owned()),
                quality: quality.map(|q| EncoderQuality::from(q).to_string()),
                notify: if notify { Some(true) } else { None },
            };
            let config = load_merged_config(cli_config).await;

            let duration = match config.duration.as_ref() {
                Some(s) => match s.parse::<Duration>() {
                    Ok(d) => d,
                    Err(e) => {
                        presenter.error(&format!("Invalid duration: {}", e));
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => Duration::default_duration(),
            };

            let options = RecordOptions {
                duration,
                output: config.output_or_default().into(),
                upload,
                upload_url: config.upload_url_or_default().to_string(),
                quality: config.quality_or_default(),
                notify: config.notify_or_default(),
            };
            run_record(options).await
        }
        Commands::Encode {
            input,
            output,
            quality,
        } => {
            let config = load_merged_config(AppConfig::empty()).await;
            let quality = quality
                .map(Into::into)
                .unwrap_or_else(|| config.quality_or_default());
            let output = output.unwrap_or_else(|| default_encode_output(&input));
            run_encode(input, output, quality).await
        }
        Commands::Upload { file, url, notify } => {
            let cli_config = AppConfig {
                upload_url: url,
                notify: if notify { Some(true) } else { None },
                ..Default::default()
            };
            let config = load_merged_config(cli_config).await;
            run_upload(file, config.upload_url_or_default(), config.notify_or_default()).await
        }
    }
}
