//! Asset store trait for the remote binary-object hosting service.
//!
//! The hierarchy services only ever talk to an [`AssetStore`]: upload a
//! binary, delete it by asset id, and ask for a URL to deliver it.
//! Implementations live in `docusphere-storage`.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A binary handed to the asset store.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    /// Original file name, used to derive the asset format.
    pub file_name: String,
    /// MIME type of the content.
    pub mime_type: String,
    /// File content.
    pub data: Bytes,
}

/// What the asset store returns after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    /// Unique asset identifier, the join key for delete and URL calls.
    pub asset_id: String,
    /// Canonical HTTPS (or local) URL of the asset.
    pub secure_url: String,
    /// Asset format (lower-case file extension, or `bin`).
    pub format: String,
    /// Delivery class: `image`, `video` or `raw`.
    pub resource_type: String,
    /// Stored size in bytes.
    pub bytes: u64,
}

/// Delivery options for [`AssetStore::url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetUrlOptions {
    /// Target width for image variants.
    pub width: Option<u32>,
    /// Target height for image variants.
    pub height: Option<u32>,
    /// Crop mode for image variants (`fill`, `limit`).
    pub crop: Option<String>,
    /// Page to render for paged documents.
    pub page: Option<u32>,
    /// Ask the delivery service to force a download.
    pub attachment: bool,
}

impl AssetUrlOptions {
    /// Plain delivery of the original asset.
    pub fn original() -> Self {
        Self::default()
    }

    /// Delivery as an attachment download.
    pub fn download() -> Self {
        Self {
            attachment: true,
            ..Self::default()
        }
    }

    /// A resized image variant.
    pub fn resized(width: u32, height: u32, crop: &str) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            crop: Some(crop.to_string()),
            ..Self::default()
        }
    }

    /// A single rendered page of a document.
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Whether any transformation was requested.
    pub fn is_original(&self) -> bool {
        self == &Self::default()
    }
}

/// Trait for asset store adapters.
#[async_trait]
pub trait AssetStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the adapter type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the adapter is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Upload a binary and return its storage reference.
    async fn upload(&self, upload: AssetUpload) -> AppResult<StoredAsset>;

    /// Delete an asset. Deleting an unknown asset is not an error.
    async fn delete(&self, asset_id: &str) -> AppResult<()>;

    /// Build a delivery URL for an asset.
    async fn url(&self, asset_id: &str, options: &AssetUrlOptions) -> AppResult<String>;
}

/// Classify a MIME type into a delivery class.
///
/// Anything that is not an image or a video is delivered raw, which is also
/// how documents (`application/*`) are treated.
pub fn resource_type_for(mime_type: &str) -> &'static str {
    if mime_type.starts_with("image/") {
        "image"
    } else if mime_type.starts_with("video/") {
        "video"
    } else {
        "raw"
    }
}

/// Derive an asset format from a file name.
pub fn format_for(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => "bin".to_string(),
    }
}
