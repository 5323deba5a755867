//! Local filesystem asset store.
//!
//! Assets are written under `{root}/{asset_folder}/` and delivered by the
//! HTTP layer's static file service mounted at `public_base_url`.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use docusphere_core::config::LocalStorageConfig;
use docusphere_core::error::{AppError, ErrorKind};
use docusphere_core::result::AppResult;
use docusphere_core::traits::asset::{
    AssetStore, AssetUpload, AssetUrlOptions, StoredAsset, format_for, resource_type_for,
};

use super::{delivery_query, validate_asset_id};

/// Asset store backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    public_base_url: String,
    asset_folder: String,
}

impl LocalAssetStore {
    /// Create the store, creating the asset directory if needed.
    pub async fn new(config: &LocalStorageConfig, asset_folder: &str) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        let asset_folder = asset_folder.trim_matches('/').to_string();
        fs::create_dir_all(root.join(&asset_folder)).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create asset directory under {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            asset_folder,
        })
    }

    /// Directory the assets are served from.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn public_url(&self, asset_id: &str) -> String {
        format!("{}/{}", self.public_base_url, asset_id)
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(self.root.join(&self.asset_folder))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn upload(&self, upload: AssetUpload) -> AppResult<StoredAsset> {
        let format = format_for(&upload.file_name);
        let asset_id = format!("{}/{}.{}", self.asset_folder, Uuid::now_v7(), format);
        let bytes = upload.data.len() as u64;

        fs::write(self.root.join(&asset_id), &upload.data)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Upstream,
                    format!("Failed to store asset for '{}'", upload.file_name),
                    e,
                )
            })?;

        debug!(asset_id = %asset_id, bytes, "Stored asset");
        Ok(StoredAsset {
            secure_url: self.public_url(&asset_id),
            resource_type: resource_type_for(&upload.mime_type).to_string(),
            asset_id,
            format,
            bytes,
        })
    }

    async fn delete(&self, asset_id: &str) -> AppResult<()> {
        validate_asset_id(asset_id)?;
        match fs::remove_file(self.root.join(asset_id)).await {
            Ok(()) => {
                debug!(asset_id, "Deleted asset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Upstream,
                format!("Failed to delete asset '{asset_id}'"),
                e,
            )),
        }
    }

    async fn url(&self, asset_id: &str, options: &AssetUrlOptions) -> AppResult<String> {
        validate_asset_id(asset_id)?;
        Ok(format!("{}{}", self.public_url(asset_id), delivery_query(options)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    async fn store(dir: &tempfile::TempDir) -> LocalAssetStore {
        let config = LocalStorageConfig {
            root_path: dir.path().to_string_lossy().into_owned(),
            public_base_url: "http://localhost:8080/assets/".to_string(),
        };
        LocalAssetStore::new(&config, "app-files").await.unwrap()
    }

    fn pdf(name: &str) -> AssetUpload {
        AssetUpload {
            file_name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            data: Bytes::from_static(b"%PDF-1.7"),
        }
    }

    #[tokio::test]
    async fn test_upload_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        assert!(store.health_check().await.unwrap());

        let asset = store.upload(pdf("Report.PDF")).await.unwrap();
        assert!(asset.asset_id.starts_with("app-files/"));
        assert!(asset.asset_id.ends_with(".pdf"));
        assert_eq!(asset.format, "pdf");
        assert_eq!(asset.resource_type, "raw");
        assert_eq!(asset.bytes, 8);
        assert_eq!(
            asset.secure_url,
            format!("http://localhost:8080/assets/{}", asset.asset_id)
        );

        let path = dir.path().join(&asset.asset_id);
        assert!(path.exists());
        store.delete(&asset.asset_id).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_delete_unknown_asset_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        store.delete("app-files/missing.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let err = store.delete("../outside.txt").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_download_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let url = store
            .url("app-files/a.png", &AssetUrlOptions::download())
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:8080/assets/app-files/a.png?download=1");
    }
}
