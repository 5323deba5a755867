//! In-memory folder store.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use docusphere_core::result::AppResult;
use docusphere_entity::access::AccessScope;
use docusphere_entity::folder::path::rebase;
use docusphere_entity::folder::{CreateFolder, Folder};

use super::{add_to_set, remove_from_set};
use crate::store::FolderStore;

/// Folder store backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct MemoryFolderStore {
    folders: DashMap<Uuid, Folder>,
}

impl MemoryFolderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// IDs of every folder below `id`.
    fn descendants(&self, id: Uuid) -> Vec<Uuid> {
        let mut found = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            let children: Vec<Uuid> = self
                .folders
                .iter()
                .filter(|f| f.parent_id == Some(current))
                .map(|f| f.id)
                .collect();
            for child in children {
                if seen.insert(child) {
                    found.push(child);
                    frontier.push(child);
                }
            }
        }
        found
    }

    fn modify<F>(&self, id: Uuid, change: F) -> Option<Folder>
    where
        F: FnOnce(&mut Folder),
    {
        let mut folder = self.folders.get_mut(&id)?;
        change(&mut folder);
        folder.updated_at = Utc::now();
        Some(folder.clone())
    }
}

#[async_trait]
impl FolderStore for MemoryFolderStore {
    async fn find(&self, id: Uuid, scope: AccessScope) -> AppResult<Option<Folder>> {
        Ok(self
            .folders
            .get(&id)
            .filter(|f| scope.permits(f.value()))
            .map(|f| f.value().clone()))
    }

    async fn list_children(
        &self,
        parent: Option<Uuid>,
        scope: AccessScope,
    ) -> AppResult<Vec<Folder>> {
        let mut folders: Vec<Folder> = self
            .folders
            .iter()
            .filter(|f| f.parent_id == parent && scope.permits(f.value()))
            .map(|f| f.value().clone())
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn list_owned(&self, owner: Uuid) -> AppResult<Vec<Folder>> {
        let mut folders: Vec<Folder> = self
            .folders
            .iter()
            .filter(|f| f.owner_id == owner)
            .map(|f| f.value().clone())
            .collect();
        folders.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(folders)
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let now = Utc::now();
        let folder = Folder {
            id: Uuid::now_v7(),
            name: data.name.clone(),
            path: data.path.clone(),
            parent_id: data.parent_id,
            owner_id: data.owner.id,
            owner_name: data.owner.name.clone(),
            owner_avatar: data.owner.avatar.clone(),
            is_public: false,
            shared_with: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn rename(&self, id: Uuid, name: &str, path: &str) -> AppResult<Option<Folder>> {
        Ok(self.modify(id, |f| {
            f.name = name.to_string();
            f.path = path.to_string();
        }))
    }

    async fn set_visibility(&self, id: Uuid, is_public: bool) -> AppResult<Option<Folder>> {
        Ok(self.modify(id, |f| f.is_public = is_public))
    }

    async fn move_to(
        &self,
        id: Uuid,
        parent: Option<Uuid>,
        path: &str,
    ) -> AppResult<Option<Folder>> {
        Ok(self.modify(id, |f| {
            f.parent_id = parent;
            f.path = path.to_string();
        }))
    }

    async fn rebase_descendants(
        &self,
        id: Uuid,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<u64> {
        let mut rewritten = 0;
        for descendant in self.descendants(id) {
            if let Some(mut folder) = self.folders.get_mut(&descendant) {
                if let Some(path) = rebase(&folder.path, old_prefix, new_prefix) {
                    folder.path = path;
                    folder.updated_at = Utc::now();
                    rewritten += 1;
                }
            }
        }
        Ok(rewritten)
    }

    async fn is_within(&self, ancestor: Uuid, candidate: Uuid) -> AppResult<bool> {
        let mut seen = HashSet::new();
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            if !seen.insert(id) {
                break;
            }
            current = self.folders.get(&id).and_then(|f| f.parent_id);
        }
        Ok(false)
    }

    async fn reparent_children(&self, from: Uuid, to: Option<Uuid>) -> AppResult<u64> {
        let children: Vec<Uuid> = self
            .folders
            .iter()
            .filter(|f| f.parent_id == Some(from))
            .map(|f| f.id)
            .collect();
        let count = children.len() as u64;
        for child in children {
            self.modify(child, |f| f.parent_id = to);
        }
        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.folders.remove(&id).is_some())
    }

    async fn add_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<Folder>> {
        Ok(self.modify(id, |f| add_to_set(&mut f.shared_with, accounts)))
    }

    async fn remove_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<Folder>> {
        Ok(self.modify(id, |f| remove_from_set(&mut f.shared_with, accounts)))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.folders.len() as i64)
    }
}
