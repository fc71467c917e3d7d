//! Media relay: forwards uploaded files to the CDN and reports where they landed.

pub mod cloudinary;
pub mod error;

use async_trait::async_trait;
use bytes::Bytes;
use hub_core::ResourceType;
use serde::{Deserialize, Serialize};

pub use cloudinary::{sign_params, CloudinaryClient};
pub use error::MediaError;

/// One file to relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    /// Destination folder, already expanded for the uploading user.
    pub folder: String,
    pub resource_type: ResourceType,
}

/// Descriptor the provider returns for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub secure_url: String,
    pub public_id: String,
    pub resource_type: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Sends the file upstream once. There are no retries.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError`] when the provider is unreachable, refuses the
    /// file, or answers with an unexpected body.
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia, MediaError>;
}

/// Stand-in used when no provider credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredMedia;

#[async_trait]
impl MediaStore for UnconfiguredMedia {
    async fn upload(&self, _upload: MediaUpload) -> Result<UploadedMedia, MediaError> {
        Err(MediaError::NotConfigured)
    }
}
