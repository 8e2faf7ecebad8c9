//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::config::EncoderQuality;
use crate::domain::recording::Duration;

/// Audio Recorder - record the microphone, encode to MP3, upload
#[derive(Parser, Debug)]
#[command(name = "audio-recorder")]
#[command(version)]
#[command(about = "Record microphone audio, transcode it to MP3 and upload it")]
#[command(long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record from the microphone and encode to MP3
    Record {
        /// Recording duration (e.g., 10s, 1m, 2m30s)
        #[arg(short = 'd', long, value_name = "TIME")]
        duration: Option<String>,

        /// Where to write the MP3
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Upload the recording when done
        #[arg(short = 'u', long)]
        upload: bool,

        /// Upload endpoint (overrides config)
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Encoder quality preset
        #[arg(short = 'q', long, value_name = "QUALITY")]
        quality: Option<QualityArg>,

        /// Show desktop notifications
        #[arg(short = 'n', long)]
        notify: bool,
    },
    /// Encode an existing recording (wav, webm, ogg, flac, m4a, mp3) to MP3
    Encode {
        /// Container file to read
        input: PathBuf,

        /// Where to write the MP3
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Encoder quality preset
        #[arg(short = 'q', long, value_name = "QUALITY")]
        quality: Option<QualityArg>,
    },
    /// Upload an MP3 produced earlier
    Upload {
        /// MP3 file to send
        file: PathBuf,

        /// Upload endpoint (overrides config)
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Show desktop notifications
        #[arg(short = 'n', long)]
        notify: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Quality argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    Best,
    Good,
    Fast,
}

impl From<QualityArg> for EncoderQuality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Best => EncoderQuality::Best,
            QualityArg::Good => EncoderQuality::Good,
            QualityArg::Fast => EncoderQuality::Fast,
        }
    }
}

/// Parsed record options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub duration: Duration,
    pub output: PathBuf,
    pub upload: bool,
    pub upload_url: String,
    pub quality: EncoderQuality,
    pub notify: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["upload_url", "duration", "output", "quality", "notify"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
