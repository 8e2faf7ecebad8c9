//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
    InvalidFormat { input: String },

    #[error("Duration \"{input}\" is longer than the {max} maximum")]
    TooLong { input: String, max: String },
}

/// Error when a decoded buffer violates its shape invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PcmBufferError {
    #[error("Sample rate must be positive")]
    ZeroSampleRate,

    #[error("PCM buffer needs at least one channel")]
    NoChannels,

    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    UnevenChannels {
        channel: usize,
        expected: usize,
        actual: usize,
    },
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
