//! Audio capture adapters

mod cpal_capture;

pub use cpal_capture::{write_wav, CpalCaptureDevice};
