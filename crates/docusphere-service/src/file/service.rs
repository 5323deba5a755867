//! File metadata, placement, sharing and deletion.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use docusphere_auth::AccessEvaluator;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_core::traits::asset::AssetStore;
use docusphere_database::store::{FileStore, FolderStore};
use docusphere_entity::file::naming::rename_keeping_extension;
use docusphere_entity::file::{File, UpdateFile};
use docusphere_entity::history::{HistoryAction, TargetType};

use crate::context::RequestContext;
use crate::history::HistoryRecorder;

/// Manages stored files.
#[derive(Clone)]
pub struct FileService {
    files: Arc<dyn FileStore>,
    folders: Arc<dyn FolderStore>,
    assets: Arc<dyn AssetStore>,
    access: AccessEvaluator,
    history: HistoryRecorder,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService")
            .field("assets", &self.assets.provider_type())
            .finish()
    }
}

/// Files shared with the caller and files the caller shared.
#[derive(Debug, Clone, Serialize)]
pub struct SharedFiles {
    /// Files other accounts shared with the caller.
    pub shared_with_me: Vec<File>,
    /// The caller's files shared with at least one account.
    pub shared_by_me: Vec<File>,
}

fn not_found() -> AppError {
    AppError::not_found("File not found")
}

/// Trim tags and drop empty or repeated ones.
pub(crate) fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !cleaned.iter().any(|t| t == tag) {
            cleaned.push(tag.to_string());
        }
    }
    cleaned
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        assets: Arc<dyn AssetStore>,
        history: HistoryRecorder,
    ) -> Self {
        Self {
            files,
            folders,
            assets,
            access: AccessEvaluator::new(),
            history,
        }
    }

    /// Find a file the caller may see.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<File> {
        self.files
            .find(id, self.access.view_scope(ctx))
            .await?
            .ok_or_else(not_found)
    }

    /// Visible files directly in a folder, or at the root when `folder_id`
    /// is `None`.
    pub async fn list(&self, ctx: &RequestContext, folder_id: Option<Uuid>) -> AppResult<Vec<File>> {
        let scope = self.access.view_scope(ctx);
        if let Some(folder_id) = folder_id {
            self.folders
                .find(folder_id, scope)
                .await?
                .ok_or_else(|| AppError::not_found("Folder not found"))?;
        }
        self.files.list_in(folder_id, scope).await
    }

    /// Files shared with the caller and by the caller.
    pub async fn shared(&self, ctx: &RequestContext) -> AppResult<SharedFiles> {
        Ok(SharedFiles {
            shared_with_me: self.files.list_shared_with(ctx.account_id()).await?,
            shared_by_me: self.files.list_shared_by(ctx.account_id()).await?,
        })
    }

    /// Update name, visibility or tags. Owner only.
    pub async fn update(&self, ctx: &RequestContext, id: Uuid, data: UpdateFile) -> AppResult<File> {
        let name = match data.name {
            Some(name) if name.trim().is_empty() => {
                return Err(AppError::validation("File name cannot be empty")
                    .with_details(json!({ "name": "File name cannot be empty" })));
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        let update = UpdateFile {
            name,
            is_public: data.is_public,
            tags: data.tags.map(clean_tags),
        };

        self.files
            .find(id, self.access.owner_scope(ctx))
            .await?
            .ok_or_else(not_found)?;
        let file = self.files.update(id, &update).await?.ok_or_else(not_found)?;

        self.history
            .record(
                ctx,
                HistoryAction::Modify,
                TargetType::File,
                id,
                format!("Updated file \"{}\"", file.name),
                Some(serde_json::to_value(&update)?),
            )
            .await;
        Ok(file)
    }

    /// Rename a file, keeping its extension.
    pub async fn rename(&self, ctx: &RequestContext, id: Uuid, new_name: &str) -> AppResult<File> {
        if new_name.trim().is_empty() {
            return Err(AppError::validation("New name is required")
                .with_details(json!({ "new_name": "New name is required" })));
        }
        let file = self
            .files
            .find(id, self.access.manage_scope(ctx))
            .await?
            .ok_or_else(not_found)?;

        let name = rename_keeping_extension(&file.name, new_name);
        let renamed = self
            .files
            .update(id, &UpdateFile {
                name: Some(name),
                ..Default::default()
            })
            .await?
            .ok_or_else(not_found)?;

        info!(
            user_id = %ctx.account_id(),
            file_id = %id,
            old_name = %file.name,
            new_name = %renamed.name,
            "File renamed"
        );
        self.history
            .record(
                ctx,
                HistoryAction::Rename,
                TargetType::File,
                id,
                format!("Renamed \"{}\" to \"{}\"", file.name, renamed.name),
                Some(json!({ "old_name": file.name, "new_name": renamed.name })),
            )
            .await;
        Ok(renamed)
    }

    /// Move a file into `target`, or to the root when `None`.
    pub async fn move_to(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        target: Option<Uuid>,
    ) -> AppResult<File> {
        let file = self
            .files
            .find(id, self.access.manage_scope(ctx))
            .await?
            .ok_or_else(not_found)?;
        if let Some(target_id) = target {
            self.folders
                .find(target_id, self.access.view_scope(ctx))
                .await?
                .ok_or_else(|| AppError::not_found("Target folder not found"))?;
        }

        let moved = self.files.move_to(id, target).await?.ok_or_else(not_found)?;

        self.history
            .record(
                ctx,
                HistoryAction::Move,
                TargetType::File,
                id,
                format!("Moved \"{}\"", file.name),
                Some(json!({ "from": file.parent_id, "to": target })),
            )
            .await;
        Ok(moved)
    }

    /// Delete the remote asset, then the file row.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let file = self
            .files
            .find(id, self.access.manage_scope(ctx))
            .await?
            .ok_or_else(not_found)?;

        self.assets.delete(&file.asset_id).await?;
        if let Err(e) = self.files.delete(id).await {
            warn!(
                file_id = %id,
                asset_id = %file.asset_id,
                error = %e,
                "Asset deleted but file row removal failed"
            );
            return Err(e);
        }

        info!(user_id = %ctx.account_id(), file_id = %id, "File deleted");
        self.history
            .record(
                ctx,
                HistoryAction::Delete,
                TargetType::File,
                id,
                format!("Deleted \"{}\"", file.name),
                Some(json!({ "size": file.size, "mime_type": file.mime_type })),
            )
            .await;
        Ok(())
    }

    /// Share a file with accounts. Owner only.
    pub async fn share(&self, ctx: &RequestContext, id: Uuid, accounts: &[Uuid]) -> AppResult<File> {
        self.change_shares(ctx, id, accounts, HistoryAction::Share).await
    }

    /// Remove accounts from a file's share list. Owner only.
    pub async fn unshare(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        accounts: &[Uuid],
    ) -> AppResult<File> {
        self.change_shares(ctx, id, accounts, HistoryAction::Unshare).await
    }

    async fn change_shares(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        accounts: &[Uuid],
        action: HistoryAction,
    ) -> AppResult<File> {
        if accounts.is_empty() {
            return Err(AppError::validation("At least one account is required")
                .with_details(json!({ "account_ids": "At least one account is required" })));
        }
        self.files
            .find(id, self.access.owner_scope(ctx))
            .await?
            .ok_or_else(not_found)?;

        let file = match action {
            HistoryAction::Share => self.files.add_shares(id, accounts).await?,
            _ => self.files.remove_shares(id, accounts).await?,
        }
        .ok_or_else(not_found)?;

        self.history
            .record(
                ctx,
                action,
                TargetType::File,
                id,
                format!("Updated sharing of \"{}\"", file.name),
                Some(json!({ "accounts": accounts })),
            )
            .await;
        Ok(file)
    }
}
