//! S3-compatible asset store (requires the `s3` feature).
//!
//! Credentials come from the standard AWS provider chain. Objects are
//! private; delivery URLs are presigned `GET` requests.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};
use uuid::Uuid;

use docusphere_core::config::S3StorageConfig;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_core::traits::asset::{
    AssetStore, AssetUpload, AssetUrlOptions, StoredAsset, format_for, resource_type_for,
};

use super::validate_asset_id;

/// Asset store backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3AssetStore {
    client: Client,
    bucket: String,
    asset_folder: String,
    public_base_url: String,
    presign_ttl: Duration,
}

impl S3AssetStore {
    /// Create a client for the configured bucket.
    pub async fn new(config: &S3StorageConfig, asset_folder: &str) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration(
                "storage.s3.bucket must be set when storage.provider is \"s3\"",
            ));
        }
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 asset store"
        );

        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        let public_base_url = if config.endpoint.is_empty() {
            format!(
                "https://{}.s3.{}.amazonaws.com",
                config.bucket, config.region
            )
        } else {
            builder = builder.endpoint_url(&config.endpoint).force_path_style(true);
            format!("{}/{}", config.endpoint.trim_end_matches('/'), config.bucket)
        };

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            asset_folder: asset_folder.trim_matches('/').to_string(),
            public_base_url,
            presign_ttl: Duration::from_secs(config.presign_ttl_seconds),
        })
    }
}

fn upstream<E>(action: &str, err: E) -> AppError
where
    E: std::error::Error,
{
    AppError::upstream(format!("{action}: {}", DisplayErrorContext(&err)))
}

#[async_trait]
impl AssetStore for S3AssetStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok())
    }

    async fn upload(&self, upload: AssetUpload) -> AppResult<StoredAsset> {
        let format = format_for(&upload.file_name);
        let asset_id = format!("{}/{}.{}", self.asset_folder, Uuid::now_v7(), format);
        let bytes = upload.data.len() as u64;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&asset_id)
            .content_type(&upload.mime_type)
            .body(ByteStream::from(upload.data))
            .send()
            .await
            .map_err(|e| upstream("Failed to upload asset", e))?;

        debug!(asset_id = %asset_id, bytes, "Uploaded asset to S3");
        Ok(StoredAsset {
            secure_url: format!("{}/{}", self.public_base_url, asset_id),
            resource_type: resource_type_for(&upload.mime_type).to_string(),
            asset_id,
            format,
            bytes,
        })
    }

    async fn delete(&self, asset_id: &str) -> AppResult<()> {
        validate_asset_id(asset_id)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(asset_id)
            .send()
            .await
            .map_err(|e| upstream("Failed to delete asset", e))?;
        Ok(())
    }

    /// S3 cannot transform objects, so only `attachment` affects the URL.
    async fn url(&self, asset_id: &str, options: &AssetUrlOptions) -> AppResult<String> {
        validate_asset_id(asset_id)?;
        let presigning = PresigningConfig::expires_in(self.presign_ttl)
            .map_err(|e| AppError::configuration(format!("Invalid presign TTL: {e}")))?;

        let mut request = self.client.get_object().bucket(&self.bucket).key(asset_id);
        if options.attachment {
            request = request.response_content_disposition("attachment");
        }
        let presigned = request
            .presigned(presigning)
            .await
            .map_err(|e| upstream("Failed to presign asset URL", e))?;
        Ok(presigned.uri().to_string())
    }
}
