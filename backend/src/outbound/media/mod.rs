//! Media store adapters.

mod cloudinary;

use async_trait::async_trait;

use crate::domain::ports::{MediaAsset, MediaStore, MediaStoreError, MediaUpload};

pub use cloudinary::{CloudinaryConfig, CloudinaryMediaStore, DEFAULT_API_BASE, sign_params};

/// Media store used when upload credentials are absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredMediaStore;

#[async_trait]
impl MediaStore for UnconfiguredMediaStore {
    async fn upload(&self, _upload: &MediaUpload) -> Result<MediaAsset, MediaStoreError> {
        Err(MediaStoreError::not_configured())
    }
}
