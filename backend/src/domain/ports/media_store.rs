//! Port for the hosted media store that serves assistant avatars.
use std::path::PathBuf;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures uploading assistant images.
    pub enum MediaStoreError {
        /// Upload credentials are missing.
        NotConfigured => "media store is not configured",
        /// The local file could not be read.
        Io { message: String } => "failed to read upload: {message}",
        /// The upload request failed in transit.
        Transport { message: String } => "media upload failed: {message}",
        /// The media host refused the upload.
        Rejected { status: u16, message: String } => "media host rejected upload with status {status}: {message}",
        /// The media host answered without a usable URL.
        MissingUrl => "media host did not return a usable image URL",
    }
}

/// File spooled to local storage, awaiting upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub path: PathBuf,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Uploaded asset as reported by the media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub secure_url: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload the spooled file. Adapters never delete `upload.path`.
    async fn upload(&self, upload: &MediaUpload) -> Result<MediaAsset, MediaStoreError>;
}
