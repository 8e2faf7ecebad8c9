//! Configuration value objects

pub mod app_config;

pub use app_config::{AppConfig, EncoderQuality, DEFAULT_OUTPUT, DEFAULT_UPLOAD_URL};
