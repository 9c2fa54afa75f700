//! Image-host collaborator — avatar and cover photo uploads.
//!
//! Outside the wizard core proper, but the same collaborator pattern: a
//! trait seam plus an HTTP implementation the profile page uses.

use async_trait::async_trait;

use crate::config::SignupConfig;
use crate::error::UploadError;

/// The image-hosting seam.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload an image and return its public URL.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadError>;
}

/// HTTP implementation of [`ImageHost`] — multipart POST to the host's
/// upload endpoint.
pub struct HttpImageHost {
    base_url: String,
    client: reqwest::Client,
}

impl HttpImageHost {
    pub fn new(config: &SignupConfig) -> Self {
        Self {
            base_url: config.image_base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct UploadResponse {
    url: String,
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("image", part);

        let resp = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Http {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let reason = resp.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                reason,
            });
        }

        let uploaded: UploadResponse = resp.json().await.map_err(|e| UploadError::Http {
            reason: format!("malformed upload response: {e}"),
        })?;
        Ok(uploaded.url)
    }
}
