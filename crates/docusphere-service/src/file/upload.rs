//! File upload: the asset store first, then the database row.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use docusphere_auth::AccessEvaluator;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_core::traits::asset::{AssetStore, AssetUpload};
use docusphere_database::store::{FileStore, FolderStore};
use docusphere_entity::file::{CreateFile, File, StorageRef};
use docusphere_entity::history::{HistoryAction, TargetType};

use crate::context::RequestContext;
use crate::file::service::clean_tags;
use crate::history::HistoryRecorder;

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original file name.
    pub file_name: String,
    /// MIME type announced by the client.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
    /// Destination folder, the root when `None`.
    pub parent_id: Option<Uuid>,
    /// Whether the file is public.
    pub is_public: bool,
    /// Tags.
    pub tags: Vec<String>,
}

/// Stores uploaded files.
#[derive(Clone)]
pub struct UploadService {
    files: Arc<dyn FileStore>,
    folders: Arc<dyn FolderStore>,
    assets: Arc<dyn AssetStore>,
    access: AccessEvaluator,
    history: HistoryRecorder,
    max_size: u64,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("max_size", &self.max_size)
            .finish()
    }
}

/// MIME type announced by the client, or one guessed from the file name.
pub fn resolve_mime_type(announced: Option<&str>, file_name: &str) -> String {
    match announced.map(str::trim) {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => mime.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

impl UploadService {
    /// Creates a new upload service accepting files up to `max_size` bytes.
    pub fn new(
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        assets: Arc<dyn AssetStore>,
        history: HistoryRecorder,
        max_size: u64,
    ) -> Self {
        Self {
            files,
            folders,
            assets,
            access: AccessEvaluator::new(),
            history,
            max_size,
        }
    }

    /// Upload a file.
    ///
    /// Nothing is persisted when the asset store fails. When the row insert
    /// fails after a successful upload the asset is deleted again.
    pub async fn upload(&self, ctx: &RequestContext, req: UploadRequest) -> AppResult<File> {
        let file_name = req.file_name.trim().to_string();
        if file_name.is_empty() {
            return Err(AppError::validation("File name is required")
                .with_details(json!({ "file": "File name is required" })));
        }
        let size = req.data.len() as u64;
        if size > self.max_size {
            return Err(AppError::validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_size
            ))
            .with_details(json!({ "file": "File is too large" })));
        }
        if let Some(parent_id) = req.parent_id {
            self.folders
                .find(parent_id, self.access.view_scope(ctx))
                .await?
                .ok_or_else(|| AppError::not_found("Folder not found"))?;
        }

        let mime_type = resolve_mime_type(req.mime_type.as_deref(), &file_name);
        let stored = self
            .assets
            .upload(AssetUpload {
                file_name: file_name.clone(),
                mime_type: mime_type.clone(),
                data: req.data,
            })
            .await?;

        let create = CreateFile {
            name: file_name,
            size: size as i64,
            mime_type,
            parent_id: req.parent_id,
            owner: ctx.actor(),
            is_public: req.is_public,
            tags: clean_tags(req.tags),
            storage: StorageRef {
                asset_id: stored.asset_id.clone(),
                secure_url: stored.secure_url,
                format: stored.format,
                resource_type: stored.resource_type,
            },
        };
        let file = match self.files.create(&create).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.assets.delete(&stored.asset_id).await {
                    warn!(
                        asset_id = %stored.asset_id,
                        error = %cleanup,
                        "Failed to remove orphaned asset"
                    );
                }
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.account_id(),
            file_id = %file.id,
            size = file.size,
            mime_type = %file.mime_type,
            "File uploaded"
        );
        self.history
            .record(
                ctx,
                HistoryAction::Upload,
                TargetType::File,
                file.id,
                format!("Uploaded \"{}\"", file.name),
                Some(json!({
                    "size": file.size,
                    "mime_type": file.mime_type,
                    "parent_id": file.parent_id,
                })),
            )
            .await;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingAssetStore, FixedAssetStore, Harness, MAX_UPLOAD};
    use docusphere_core::error::ErrorKind;
    use docusphere_database::Stores;
    use docusphere_entity::account::AccountRole;

    fn request(name: &str, data: &'static [u8]) -> UploadRequest {
        UploadRequest {
            file_name: name.to_string(),
            mime_type: None,
            data: Bytes::from_static(data),
            parent_id: None,
            is_public: false,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_resolve_mime_type() {
        assert_eq!(resolve_mime_type(Some("image/png"), "a.bin"), "image/png");
        assert_eq!(resolve_mime_type(None, "report.pdf"), "application/pdf");
        assert_eq!(
            resolve_mime_type(Some("application/octet-stream"), "photo.jpg"),
            "image/jpeg"
        );
        assert_eq!(resolve_mime_type(Some(""), "README"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_upload_then_list_parent() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let docs = h.folders.create(&owner, "Docs", None).await.unwrap();

        let file = h.upload(&owner, "report.pdf", Some(docs.id)).await;
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.format, "pdf");
        assert_eq!(file.owner_id, owner.account_id());

        let contents = h.folders.contents(&owner, Some(docs.id)).await.unwrap();
        let hits = contents.files.iter().filter(|f| f.id == file.id).count();
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn test_upload_cleans_tags() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let file = h
            .uploads
            .upload(&owner, UploadRequest {
                tags: [" q1 ", "finance", "", "q1"].map(String::from).to_vec(),
                ..request("budget.xlsx", b"x")
            })
            .await
            .unwrap();
        assert_eq!(file.tags, vec!["q1", "finance"]);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let h = Harness::new().await;
        let big = vec![0u8; MAX_UPLOAD as usize + 1];
        let err = h
            .uploads
            .upload(&h.context(AccountRole::Editor), UploadRequest {
                data: Bytes::from(big),
                ..request("big.bin", b"")
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_upload_into_invisible_folder() {
        let h = Harness::new().await;
        let other = h.context(AccountRole::Editor);
        let hidden = h.folders.create(&other, "Hidden", None).await.unwrap();
        let err = h
            .uploads
            .upload(&h.context(AccountRole::Editor), UploadRequest {
                parent_id: Some(hidden.id),
                ..request("a.txt", b"a")
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_asset_failure_persists_nothing() {
        let stores = Stores::in_memory();
        let h = Harness::with_assets(stores, Arc::new(FailingAssetStore), tempfile::TempDir::new().unwrap());
        let owner = h.context(AccountRole::Editor);

        let err = h.uploads.upload(&owner, request("a.txt", b"a")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upstream);
        assert_eq!(h.stores.files.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_insert_deletes_the_asset() {
        let assets = Arc::new(FixedAssetStore::default());
        let h = Harness::with_assets(Stores::in_memory(), assets.clone(), tempfile::TempDir::new().unwrap());
        let owner = h.context(AccountRole::Editor);

        h.uploads.upload(&owner, request("a.txt", b"a")).await.unwrap();
        let err = h.uploads.upload(&owner, request("b.txt", b"b")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(*assets.deleted.lock().unwrap(), vec!["app-files/fixed.bin"]);
        assert_eq!(h.stores.files.count().await.unwrap(), 1);
    }
}
