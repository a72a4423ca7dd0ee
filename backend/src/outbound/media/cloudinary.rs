//! Cloudinary signed-upload adapter.
//!
//! Implements the signed upload flow: the request parameters (excluding
//! `file`, `api_key` and `signature_algorithm`) are sorted, joined as
//! `key=value&...`, suffixed with the API secret and hashed with SHA-256.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{MediaAsset, MediaStore, MediaStoreError, MediaUpload};

/// Public upload API root.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1/";

/// Credentials and placement for uploads.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Zeroizing<String>,
    pub folder: String,
    pub api_base: Url,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponseDto {
    secure_url: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorDto {
    error: UploadErrorBodyDto,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBodyDto {
    message: String,
}

/// Hex SHA-256 signature over sorted `params` and `secret`.
///
/// # Examples
/// ```
/// use assistant_backend::outbound::media::sign_params;
///
/// let signature = sign_params(&[("timestamp", "1315060510")], "abcd");
/// assert_eq!(signature.len(), 64);
/// ```
pub fn sign_params(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|left, right| left.0.cmp(right.0));
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha256::digest(format!("{joined}{secret}").as_bytes()))
}

/// Media store backed by Cloudinary's image upload endpoint.
pub struct CloudinaryMediaStore {
    client: Client,
    config: CloudinaryConfig,
    clock: Arc<dyn Clock>,
}

impl CloudinaryMediaStore {
    /// Build an uploader whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        config: CloudinaryConfig,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            config,
            clock,
        })
    }

    fn upload_url(&self) -> Result<Url, MediaStoreError> {
        self.config
            .api_base
            .join(&format!("{}/image/upload", self.config.cloud_name))
            .map_err(|error| MediaStoreError::transport(format!("invalid upload URL: {error}")))
    }
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    async fn upload(&self, upload: &MediaUpload) -> Result<MediaAsset, MediaStoreError> {
        let bytes = tokio::fs::read(&upload.path)
            .await
            .map_err(|error| MediaStoreError::io(error.to_string()))?;
        let timestamp = self.clock.utc().timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            self.config.api_secret.as_str(),
        );

        let mut file = Part::bytes(bytes)
            .file_name(upload.file_name.clone().unwrap_or_else(|| "upload".to_owned()));
        if let Some(content_type) = &upload.content_type {
            file = file
                .mime_str(content_type)
                .map_err(|error| MediaStoreError::io(error.to_string()))?;
        }
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.upload_url()?)
            .multipart(form)
            .send()
            .await
            .map_err(|error| MediaStoreError::transport(error.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| MediaStoreError::transport(error.to_string()))?;
        if !status.is_success() {
            let message = serde_json::from_slice::<UploadErrorDto>(&body).map_or_else(
                |_| String::from_utf8_lossy(&body).into_owned(),
                |dto| dto.error.message,
            );
            return Err(MediaStoreError::rejected(status.as_u16(), message));
        }

        let decoded: UploadResponseDto = serde_json::from_slice(&body)
            .map_err(|error| MediaStoreError::transport(format!("invalid upload reply: {error}")))?;
        let secure_url = decoded
            .secure_url
            .or(decoded.url)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(MediaStoreError::missing_url)?;
        info!(folder = %self.config.folder, "uploaded assistant image");
        Ok(MediaAsset { secure_url })
    }
}
