//! Upload adapters

mod http;

pub use http::{HttpUploader, UPLOAD_FIELD};
