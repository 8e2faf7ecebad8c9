//! HTTP multipart uploader

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::application::ports::{UploadError, UploadReceipt, Uploader};
use crate::domain::audio::EncodedOutput;

/// Multipart field the server reads the recording from
pub const UPLOAD_FIELD: &str = "audio";

#[derive(Debug, Default, Deserialize)]
struct UploadResponse {
    error: Option<String>,
    message: Option<String>,
}

/// Posts the MP3 as `multipart/form-data` to a fixed endpoint
pub struct HttpUploader {
    url: reqwest::Url,
    client: reqwest::Client,
}

impl HttpUploader {
    pub fn new(url: &str) -> Result<Self, UploadError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| UploadError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(UploadError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                url
            )));
        }

        Ok(Self {
            url,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    fn build_form(
        audio: &EncodedOutput,
        filename: &str,
        mime_type: &str,
    ) -> Result<Form, UploadError> {
        let part = Part::bytes(audio.data().to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| UploadError::RequestFailed(format!("Invalid MIME type: {}", e)))?;
        Ok(Form::new().part(UPLOAD_FIELD, part))
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn send(
        &self,
        audio: &EncodedOutput,
        filename: &str,
        mime_type: &str,
    ) -> Result<UploadReceipt, UploadError> {
        let form = Self::build_form(audio, filename, mime_type)?;

        debug!(url = %self.url, bytes = audio.size_bytes(), "uploading recording");
        let response = self
            .client
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;
        let parsed: Option<UploadResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = match parsed.and_then(|r| r.error) {
                Some(error) => error,
                None if body.trim().is_empty() => status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
                None => body.trim().to_string(),
            };
            return Err(UploadError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(UploadReceipt {
            status: status.as_u16(),
            message: parsed.and_then(|r| r.message),
        })
    }
}
