//! Folder CRUD, tree maintenance and sharing.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use docusphere_auth::AccessEvaluator;
use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_database::store::{FileStore, FolderStore};
use docusphere_entity::file::File;
use docusphere_entity::folder::path::{child_path, parent_prefix};
use docusphere_entity::folder::{CreateFolder, Folder};
use docusphere_entity::history::{HistoryAction, TargetType};

use crate::context::RequestContext;
use crate::history::HistoryRecorder;

/// Manages the folder tree.
#[derive(Clone)]
pub struct FolderService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    access: AccessEvaluator,
    history: HistoryRecorder,
}

impl std::fmt::Debug for FolderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderService").finish()
    }
}

/// Direct children of a folder (or of the root) visible to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct FolderContents {
    /// The listed folder, `None` for the root.
    pub folder: Option<Folder>,
    /// Child folders.
    pub folders: Vec<Folder>,
    /// Files in the folder.
    pub files: Vec<File>,
}

fn required_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name is required")
            .with_details(json!({ "name": "Folder name is required" })));
    }
    if name.contains('/') {
        return Err(AppError::validation("Folder name cannot contain '/'")
            .with_details(json!({ "name": "Folder name cannot contain '/'" })));
    }
    Ok(name.to_string())
}

fn not_found() -> AppError {
    AppError::not_found("Folder not found")
}

/// Path of the parent of `folder`, `None` for a root folder.
fn parent_path(folder: &Folder) -> Option<&str> {
    let parent = parent_prefix(&folder.path);
    (!parent.is_empty()).then_some(parent)
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        history: HistoryRecorder,
    ) -> Self {
        Self {
            folders,
            files,
            access: AccessEvaluator::new(),
            history,
        }
    }

    /// Find a folder the caller may see.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Folder> {
        self.folders
            .find(id, self.access.view_scope(ctx))
            .await?
            .ok_or_else(not_found)
    }

    /// List a folder's visible children, or the root's when `id` is `None`.
    pub async fn contents(&self, ctx: &RequestContext, id: Option<Uuid>) -> AppResult<FolderContents> {
        let folder = match id {
            Some(id) => Some(self.get(ctx, id).await?),
            None => None,
        };
        let scope = self.access.view_scope(ctx);
        let folders = self.folders.list_children(id, scope).await?;
        let files = self.files.list_in(id, scope).await?;
        Ok(FolderContents {
            folder,
            folders,
            files,
        })
    }

    /// Every folder the caller owns.
    pub async fn list_owned(&self, ctx: &RequestContext) -> AppResult<Vec<Folder>> {
        self.folders.list_owned(ctx.account_id()).await
    }

    /// Create a folder at the root or under a visible parent.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let name = required_name(name)?;
        let parent = match parent_id {
            Some(id) => Some(self.get(ctx, id).await?),
            None => None,
        };
        let path = child_path(parent.as_ref().map(|p| p.path.as_str()), &name);

        let folder = self
            .folders
            .create(&CreateFolder {
                name,
                path,
                parent_id,
                owner: ctx.actor(),
            })
            .await?;

        info!(
            user_id = %ctx.account_id(),
            folder_id = %folder.id,
            path = %folder.path,
            "Folder created"
        );
        self.history
            .record(
                ctx,
                HistoryAction::CreateFolder,
                TargetType::Folder,
                folder.id,
                format!("Created folder \"{}\"", folder.name),
                Some(json!({ "path": folder.path })),
            )
            .await;
        Ok(folder)
    }

    /// Rename a folder and rewrite the paths below it.
    pub async fn rename(&self, ctx: &RequestContext, id: Uuid, new_name: &str) -> AppResult<Folder> {
        let name = required_name(new_name)?;
        let folder = self
            .folders
            .find(id, self.access.manage_scope(ctx))
            .await?
            .ok_or_else(not_found)?;

        let new_path = child_path(parent_path(&folder), &name);
        let renamed = self
            .folders
            .rename(id, &name, &new_path)
            .await?
            .ok_or_else(not_found)?;
        let rewritten = self
            .folders
            .rebase_descendants(id, &folder.path, &new_path)
            .await?;

        info!(
            user_id = %ctx.account_id(),
            folder_id = %id,
            old_path = %folder.path,
            new_path = %new_path,
            rewritten,
            "Folder renamed"
        );
        self.history
            .record(
                ctx,
                HistoryAction::Rename,
                TargetType::Folder,
                id,
                format!("Renamed folder \"{}\" to \"{}\"", folder.name, renamed.name),
                Some(json!({ "old_name": folder.name, "new_name": renamed.name })),
            )
            .await;
        Ok(renamed)
    }

    /// Move a folder under `target` (the root when `None`).
    pub async fn move_to(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        target: Option<Uuid>,
    ) -> AppResult<Folder> {
        let folder = self
            .folders
            .find(id, self.access.manage_scope(ctx))
            .await?
            .ok_or_else(not_found)?;

        let target_folder = match target {
            Some(target_id) => {
                if self.folders.is_within(id, target_id).await? {
                    return Err(AppError::validation(
                        "A folder cannot be moved into itself or one of its subfolders",
                    ));
                }
                Some(
                    self.get(ctx, target_id)
                        .await
                        .map_err(|_| AppError::not_found("Target folder not found"))?,
                )
            }
            None => None,
        };

        let new_path = child_path(target_folder.as_ref().map(|t| t.path.as_str()), &folder.name);
        let moved = self
            .folders
            .move_to(id, target, &new_path)
            .await?
            .ok_or_else(not_found)?;
        self.folders
            .rebase_descendants(id, &folder.path, &new_path)
            .await?;

        info!(
            user_id = %ctx.account_id(),
            folder_id = %id,
            new_path = %new_path,
            "Folder moved"
        );
        self.history
            .record(
                ctx,
                HistoryAction::Move,
                TargetType::Folder,
                id,
                format!("Moved folder \"{}\"", folder.name),
                Some(json!({
                    "from": folder.parent_id,
                    "to": target,
                    "old_path": folder.path,
                    "new_path": new_path,
                })),
            )
            .await;
        Ok(moved)
    }

    /// Change whether the folder is public. Owner only.
    pub async fn set_visibility(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        is_public: bool,
    ) -> AppResult<Folder> {
        self.folders
            .find(id, self.access.owner_scope(ctx))
            .await?
            .ok_or_else(not_found)?;
        let folder = self
            .folders
            .set_visibility(id, is_public)
            .await?
            .ok_or_else(not_found)?;

        self.history
            .record(
                ctx,
                HistoryAction::Modify,
                TargetType::Folder,
                id,
                format!(
                    "Made folder \"{}\" {}",
                    folder.name,
                    if is_public { "public" } else { "private" }
                ),
                Some(json!({ "is_public": is_public })),
            )
            .await;
        Ok(folder)
    }

    /// Delete a folder. Its direct children move up to its parent and the
    /// subtree's paths are rewritten; nothing below it is deleted.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let folder = self
            .folders
            .find(id, self.access.manage_scope(ctx))
            .await?
            .ok_or_else(not_found)?;

        let lifted_prefix = parent_prefix(&folder.path);
        self.folders
            .rebase_descendants(id, &folder.path, lifted_prefix)
            .await?;
        let folders_moved = self.folders.reparent_children(id, folder.parent_id).await?;
        let files_moved = self.files.reparent_children(id, folder.parent_id).await?;
        if !self.folders.delete(id).await? {
            return Err(not_found());
        }

        info!(
            user_id = %ctx.account_id(),
            folder_id = %id,
            folders_moved,
            files_moved,
            "Folder deleted"
        );
        self.history
            .record(
                ctx,
                HistoryAction::Delete,
                TargetType::Folder,
                id,
                format!("Deleted folder \"{}\"", folder.name),
                Some(json!({
                    "path": folder.path,
                    "folders_moved": folders_moved,
                    "files_moved": files_moved,
                })),
            )
            .await;
        Ok(())
    }

    /// Share a folder with accounts. Owner only.
    pub async fn share(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        accounts: &[Uuid],
    ) -> AppResult<Folder> {
        self.change_shares(ctx, id, accounts, HistoryAction::Share).await
    }

    /// Remove accounts from a folder's share list. Owner only.
    pub async fn unshare(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        accounts: &[Uuid],
    ) -> AppResult<Folder> {
        self.change_shares(ctx, id, accounts, HistoryAction::Unshare).await
    }

    async fn change_shares(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        accounts: &[Uuid],
        action: HistoryAction,
    ) -> AppResult<Folder> {
        if accounts.is_empty() {
            return Err(AppError::validation("At least one account is required")
                .with_details(json!({ "account_ids": "At least one account is required" })));
        }
        self.folders
            .find(id, self.access.owner_scope(ctx))
            .await?
            .ok_or_else(not_found)?;

        let folder = match action {
            HistoryAction::Share => self.folders.add_shares(id, accounts).await?,
            _ => self.folders.remove_shares(id, accounts).await?,
        }
        .ok_or_else(not_found)?;

        self.history
            .record(
                ctx,
                action,
                TargetType::Folder,
                id,
                format!("Updated sharing of folder \"{}\"", folder.name),
                Some(json!({ "accounts": accounts })),
            )
            .await;
        Ok(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use docusphere_core::error::ErrorKind;
    use docusphere_entity::account::AccountRole;

    #[tokio::test]
    async fn test_create_builds_paths() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let docs = h.folders.create(&owner, " Docs ", None).await.unwrap();
        let year = h.folders.create(&owner, "2024", Some(docs.id)).await.unwrap();
        assert_eq!(docs.name, "Docs");
        assert_eq!(docs.path, "/Docs");
        assert_eq!(year.path, "/Docs/2024");
        assert!(!year.is_public);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let h = Harness::new().await;
        let err = h
            .folders
            .create(&h.context(AccountRole::Editor), "   ", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.details.is_some());
    }

    #[tokio::test]
    async fn test_create_under_invisible_parent_is_not_found() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let stranger = h.context(AccountRole::Editor);
        let private = h.folders.create(&owner, "Private", None).await.unwrap();
        let err = h
            .folders
            .create(&stranger, "Mine", Some(private.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_rename_rewrites_descendant_paths() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let docs = h.folders.create(&owner, "Docs", None).await.unwrap();
        let year = h.folders.create(&owner, "2024", Some(docs.id)).await.unwrap();
        let quarter = h.folders.create(&owner, "Q1", Some(year.id)).await.unwrap();

        let renamed = h.folders.rename(&owner, docs.id, "Archive").await.unwrap();
        assert_eq!(renamed.path, "/Archive");
        assert_eq!(h.folders.get(&owner, quarter.id).await.unwrap().path, "/Archive/2024/Q1");
    }

    #[tokio::test]
    async fn test_move_into_descendant_fails() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let docs = h.folders.create(&owner, "Docs", None).await.unwrap();
        let year = h.folders.create(&owner, "2024", Some(docs.id)).await.unwrap();

        let err = h.folders.move_to(&owner, docs.id, Some(year.id)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = h.folders.move_to(&owner, docs.id, Some(docs.id)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_move_rewrites_paths() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let docs = h.folders.create(&owner, "Docs", None).await.unwrap();
        let year = h.folders.create(&owner, "2024", Some(docs.id)).await.unwrap();
        let q1 = h.folders.create(&owner, "Q1", Some(year.id)).await.unwrap();
        let archive = h.folders.create(&owner, "Archive", None).await.unwrap();

        let moved = h.folders.move_to(&owner, year.id, Some(archive.id)).await.unwrap();
        assert_eq!(moved.parent_id, Some(archive.id));
        assert_eq!(moved.path, "/Archive/2024");
        assert_eq!(h.folders.get(&owner, q1.id).await.unwrap().path, "/Archive/2024/Q1");

        let lifted = h.folders.move_to(&owner, year.id, None).await.unwrap();
        assert_eq!(lifted.path, "/2024");
        assert_eq!(h.folders.get(&owner, q1.id).await.unwrap().path, "/2024/Q1");
    }

    #[tokio::test]
    async fn test_delete_reparents_children() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let docs = h.folders.create(&owner, "Docs", None).await.unwrap();
        let year = h.folders.create(&owner, "2024", Some(docs.id)).await.unwrap();
        let q1 = h.folders.create(&owner, "Q1", Some(year.id)).await.unwrap();
        let file = h.upload(&owner, "notes.txt", Some(year.id)).await;

        h.folders.delete(&owner, year.id).await.unwrap();

        let q1 = h.folders.get(&owner, q1.id).await.unwrap();
        assert_eq!(q1.parent_id, Some(docs.id));
        assert_eq!(q1.path, "/Docs/Q1");
        let file = h.files.get(&owner, file.id).await.unwrap();
        assert_eq!(file.parent_id, Some(docs.id));
        assert_eq!(
            h.folders.get(&owner, year.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_admin_may_delete_but_not_share() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let admin = h.context(AccountRole::Admin);
        let docs = h.folders.create(&owner, "Docs", None).await.unwrap();

        let err = h
            .folders
            .share(&admin, docs.id, &[admin.account_id()])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        h.folders.delete(&admin, docs.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_sharing_grants_visibility() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let friend = h.context(AccountRole::Viewer);
        let docs = h.folders.create(&owner, "Docs", None).await.unwrap();

        assert!(h.folders.get(&friend, docs.id).await.is_err());
        h.folders.share(&owner, docs.id, &[friend.account_id()]).await.unwrap();
        let shared = h
            .folders
            .share(&owner, docs.id, &[friend.account_id()])
            .await
            .unwrap();
        assert_eq!(shared.shared_with, vec![friend.account_id()]);
        assert!(h.folders.get(&friend, docs.id).await.is_ok());

        h.folders.unshare(&owner, docs.id, &[friend.account_id()]).await.unwrap();
        assert!(h.folders.get(&friend, docs.id).await.is_err());
    }

    #[tokio::test]
    async fn test_root_contents_are_filtered() {
        let h = Harness::new().await;
        let owner = h.context(AccountRole::Editor);
        let other = h.context(AccountRole::Editor);
        h.folders.create(&owner, "Mine", None).await.unwrap();
        let public = h.folders.create(&other, "Public", None).await.unwrap();
        h.folders.set_visibility(&other, public.id, true).await.unwrap();
        h.folders.create(&other, "Hidden", None).await.unwrap();

        let contents = h.folders.contents(&owner, None).await.unwrap();
        let names: Vec<&str> = contents.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Mine", "Public"]);
        assert!(contents.folder.is_none());
    }
}
