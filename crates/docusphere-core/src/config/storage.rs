//! Asset store configuration.

use serde::{Deserialize, Serialize};

/// Top-level asset store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Active adapter: `"local"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Maximum file upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Maximum post attachment size in bytes.
    #[serde(default = "default_max_attachment")]
    pub max_attachment_size_bytes: u64,
    /// Folder (key prefix) that uploaded assets are placed in.
    #[serde(default = "default_asset_folder")]
    pub asset_folder: String,
    /// Local filesystem adapter configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible adapter configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            max_upload_size_bytes: default_max_upload(),
            max_attachment_size_bytes: default_max_attachment(),
            asset_folder: default_asset_folder(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Directory that holds uploaded assets.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// Public base URL the assets are served from.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Lifetime of presigned URLs in seconds.
    #[serde(default = "default_presign_ttl")]
    pub presign_ttl_seconds: u64,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            presign_ttl_seconds: default_presign_ttl(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_max_upload() -> u64 {
    25 * 1024 * 1024
}

fn default_max_attachment() -> u64 {
    5 * 1024 * 1024
}

fn default_asset_folder() -> String {
    "app-files".to_string()
}

fn default_local_root() -> String {
    "./data/assets".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/assets".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_presign_ttl() -> u64 {
    3600
}
