//! Shared fixtures for the service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use docusphere_core::config::LocalStorageConfig;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_core::traits::asset::{AssetStore, AssetUpload, AssetUrlOptions, StoredAsset};
use docusphere_core::types::pagination::{PageRequest, PageResponse};
use docusphere_database::Stores;
use docusphere_database::store::{HistoryFilter, HistoryStore};
use docusphere_entity::account::{AccountRole, Identity};
use docusphere_entity::file::File;
use docusphere_entity::history::{CreateHistoryEntry, HistoryAction, HistoryEntry};
use docusphere_storage::LocalAssetStore;

use crate::context::RequestContext;
use crate::file::{DownloadService, FileService, UploadRequest, UploadService};
use crate::folder::FolderService;
use crate::history::HistoryRecorder;

pub(crate) const MAX_UPLOAD: u64 = 1024 * 1024;

/// A caller with a fresh account id.
pub(crate) fn context(role: AccountRole) -> RequestContext {
    let account_id = Uuid::new_v4();
    RequestContext::new(
        Identity {
            account_id,
            role,
            name: format!("user-{}", &account_id.simple().to_string()[..8]),
            email: format!("{account_id}@docusphere.test"),
            avatar: None,
        },
        "127.0.0.1".to_string(),
        Some("Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0".to_string()),
    )
}

/// History store whose every call fails.
#[derive(Debug)]
pub(crate) struct FailingHistoryStore;

#[async_trait]
impl HistoryStore for FailingHistoryStore {
    async fn append(&self, _data: &CreateHistoryEntry) -> AppResult<HistoryEntry> {
        Err(AppError::database("history is down"))
    }

    async fn search(
        &self,
        _filter: &HistoryFilter,
        _page: &PageRequest,
    ) -> AppResult<PageResponse<HistoryEntry>> {
        Err(AppError::database("history is down"))
    }

    async fn count_action_between(
        &self,
        _action: HistoryAction,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> AppResult<i64> {
        Err(AppError::database("history is down"))
    }

    async fn count_actors_since(&self, _since: DateTime<Utc>) -> AppResult<i64> {
        Err(AppError::database("history is down"))
    }
}

/// Asset store that rejects everything.
#[derive(Debug)]
pub(crate) struct FailingAssetStore;

#[async_trait]
impl AssetStore for FailingAssetStore {
    fn provider_type(&self) -> &str {
        "failing"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }

    async fn upload(&self, _upload: AssetUpload) -> AppResult<StoredAsset> {
        Err(AppError::upstream("asset host unreachable"))
    }

    async fn delete(&self, _asset_id: &str) -> AppResult<()> {
        Err(AppError::upstream("asset host unreachable"))
    }

    async fn url(&self, _asset_id: &str, _options: &AssetUrlOptions) -> AppResult<String> {
        Err(AppError::upstream("asset host unreachable"))
    }
}

/// Asset store that hands out the same asset id every time and remembers
/// deletions.
#[derive(Debug, Default)]
pub(crate) struct FixedAssetStore {
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl AssetStore for FixedAssetStore {
    fn provider_type(&self) -> &str {
        "fixed"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn upload(&self, upload: AssetUpload) -> AppResult<StoredAsset> {
        Ok(StoredAsset {
            asset_id: "app-files/fixed.bin".to_string(),
            secure_url: "https://assets.test/app-files/fixed.bin".to_string(),
            format: "bin".to_string(),
            resource_type: "raw".to_string(),
            bytes: upload.data.len() as u64,
        })
    }

    async fn delete(&self, asset_id: &str) -> AppResult<()> {
        self.deleted.lock().unwrap().push(asset_id.to_string());
        Ok(())
    }

    async fn url(&self, asset_id: &str, _options: &AssetUrlOptions) -> AppResult<String> {
        Ok(format!("https://assets.test/{asset_id}"))
    }
}

/// In-memory stores, a temporary local asset store and the hierarchy services.
pub(crate) struct Harness {
    pub stores: Stores,
    pub assets: Arc<dyn AssetStore>,
    pub history: HistoryRecorder,
    pub folders: FolderService,
    pub files: FileService,
    pub uploads: UploadService,
    pub downloads: DownloadService,
    _dir: TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = LocalStorageConfig {
            root_path: dir.path().to_string_lossy().into_owned(),
            public_base_url: "http://localhost:8080/assets".to_string(),
        };
        let assets: Arc<dyn AssetStore> =
            Arc::new(LocalAssetStore::new(&config, "app-files").await.unwrap());
        Self::with_assets(Stores::in_memory(), assets, dir)
    }

    pub fn with_assets(stores: Stores, assets: Arc<dyn AssetStore>, dir: TempDir) -> Self {
        let history = HistoryRecorder::new(stores.history.clone());
        let folders = FolderService::new(stores.folders.clone(), stores.files.clone(), history.clone());
        let files = FileService::new(
            stores.files.clone(),
            stores.folders.clone(),
            assets.clone(),
            history.clone(),
        );
        let uploads = UploadService::new(
            stores.files.clone(),
            stores.folders.clone(),
            assets.clone(),
            history.clone(),
            MAX_UPLOAD,
        );
        let downloads = DownloadService::new(stores.files.clone(), assets.clone(), history.clone());
        Self {
            stores,
            assets,
            history,
            folders,
            files,
            uploads,
            downloads,
            _dir: dir,
        }
    }

    pub fn context(&self, role: AccountRole) -> RequestContext {
        context(role)
    }

    /// Upload a small text file.
    pub async fn upload(&self, ctx: &RequestContext, name: &str, parent_id: Option<Uuid>) -> File {
        self.uploads
            .upload(ctx, UploadRequest {
                file_name: name.to_string(),
                mime_type: None,
                data: Bytes::from_static(b"hello docusphere"),
                parent_id,
                is_public: false,
                tags: Vec::new(),
            })
            .await
            .unwrap()
    }
}
