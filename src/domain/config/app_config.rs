//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Default upload endpoint
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:3000/upload-audio";

/// Default preview file written after encoding
pub const DEFAULT_OUTPUT: &str = "recording.mp3";

/// LAME quality presets exposed in config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncoderQuality {
    Best,
    #[default]
    Good,
    Fast,
}

impl EncoderQuality {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Good => "good",
            Self::Fast => "fast",
        }
    }
}

impl std::str::FromStr for EncoderQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(Self::Best),
            "good" => Ok(Self::Good),
            "fast" => Ok(Self::Fast),
            other => Err(format!(
                "Invalid quality \"{}\". Valid values are: best, good, fast",
                other
            )),
        }
    }
}

impl std::fmt::Display for EncoderQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub upload_url: Option<String>,
    pub duration: Option<String>,
    pub output: Option<String>,
    pub quality: Option<String>,
    pub notify: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            upload_url: Some(DEFAULT_UPLOAD_URL.to_string()),
            duration: Some("10s".to_string()),
            output: Some(DEFAULT_OUTPUT.to_string()),
            quality: Some(EncoderQuality::default().to_string()),
            notify: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            upload_url: other.upload_url.or(self.upload_url),
            duration: other.duration.or(self.duration),
            output: other.output.or(self.output),
            quality: other.quality.or(self.quality),
            notify: other.notify.or(self.notify),
        }
    }

    pub fn upload_url_or_default(&self) -> &str {
        self.upload_url.as_deref().unwrap_or(DEFAULT_UPLOAD_URL)
    }

    /// Get duration as parsed Duration, or default if not set/invalid
    pub fn duration_or_default(&self) -> Duration {
        self.duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_duration)
    }

    pub fn output_or_default(&self) -> &str {
        self.output.as_deref().unwrap_or(DEFAULT_OUTPUT)
    }

    /// Get quality as parsed preset, or default if not set/invalid
    pub fn quality_or_default(&self) -> EncoderQuality {
        self.quality
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }
}
