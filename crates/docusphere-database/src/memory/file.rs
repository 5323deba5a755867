//! In-memory file store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_entity::access::AccessScope;
use docusphere_entity::file::{CreateFile, File, UpdateFile};

use super::{add_to_set, remove_from_set};
use crate::store::{FileStore, FileTypeCount, OwnerUsage};

/// File store backed by a concurrent hash map with a unique asset index.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: DashMap<Uuid, File>,
    assets: DashMap<String, Uuid>,
}

impl MemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn modify<F>(&self, id: Uuid, change: F) -> Option<File>
    where
        F: FnOnce(&mut File),
    {
        let mut file = self.files.get_mut(&id)?;
        change(&mut file);
        file.updated_at = Utc::now();
        Some(file.clone())
    }

    fn collect<P>(&self, predicate: P) -> Vec<File>
    where
        P: Fn(&File) -> bool,
    {
        self.files
            .iter()
            .filter(|f| predicate(f.value()))
            .map(|f| f.value().clone())
            .collect()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn find(&self, id: Uuid, scope: AccessScope) -> AppResult<Option<File>> {
        Ok(self
            .files
            .get(&id)
            .filter(|f| scope.permits(f.value()))
            .map(|f| f.value().clone()))
    }

    async fn list_in(&self, parent: Option<Uuid>, scope: AccessScope) -> AppResult<Vec<File>> {
        let mut files = self.collect(|f| f.parent_id == parent && scope.permits(f));
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    async fn list_shared_with(&self, account: Uuid) -> AppResult<Vec<File>> {
        let mut files = self.collect(|f| f.shared_with.contains(&account));
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn list_shared_by(&self, owner: Uuid) -> AppResult<Vec<File>> {
        let mut files = self.collect(|f| f.owner_id == owner && !f.shared_with.is_empty());
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        match self.assets.entry(data.storage.asset_id.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Asset '{}' is already referenced by another file",
                data.storage.asset_id
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let file = File {
                    id: Uuid::now_v7(),
                    name: data.name.clone(),
                    size: data.size,
                    mime_type: data.mime_type.clone(),
                    parent_id: data.parent_id,
                    owner_id: data.owner.id,
                    owner_name: data.owner.name.clone(),
                    owner_avatar: data.owner.avatar.clone(),
                    is_public: data.is_public,
                    shared_with: Vec::new(),
                    tags: data.tags.clone(),
                    asset_id: data.storage.asset_id.clone(),
                    secure_url: data.storage.secure_url.clone(),
                    format: data.storage.format.clone(),
                    resource_type: data.storage.resource_type.clone(),
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(file.id);
                self.files.insert(file.id, file.clone());
                Ok(file)
            }
        }
    }

    async fn update(&self, id: Uuid, data: &UpdateFile) -> AppResult<Option<File>> {
        Ok(self.modify(id, |f| {
            if let Some(name) = &data.name {
                f.name = name.clone();
            }
            if let Some(is_public) = data.is_public {
                f.is_public = is_public;
            }
            if let Some(tags) = &data.tags {
                f.tags = tags.clone();
            }
        }))
    }

    async fn move_to(&self, id: Uuid, parent: Option<Uuid>) -> AppResult<Option<File>> {
        Ok(self.modify(id, |f| f.parent_id = parent))
    }

    async fn reparent_children(&self, from: Uuid, to: Option<Uuid>) -> AppResult<u64> {
        let children: Vec<Uuid> = self
            .files
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
        match self.files.remove(&id) {
            Some((_, file)) => {
                self.assets.remove(&file.asset_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<File>> {
        Ok(self.modify(id, |f| add_to_set(&mut f.shared_with, accounts)))
    }

    async fn remove_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<File>> {
        Ok(self.modify(id, |f| remove_from_set(&mut f.shared_with, accounts)))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.files.len() as i64)
    }

    async fn total_size(&self) -> AppResult<i64> {
        Ok(self.files.iter().map(|f| f.size).sum())
    }

    async fn count_by_mime(&self) -> AppResult<Vec<FileTypeCount>> {
        let mut counts: HashMap<String, i64> = HashMap::new();
        for file in self.files.iter() {
            *counts.entry(file.mime_type.clone()).or_default() += 1;
        }
        let mut rows: Vec<FileTypeCount> = counts
            .into_iter()
            .map(|(mime_type, count)| FileTypeCount { mime_type, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.mime_type.cmp(&b.mime_type)));
        Ok(rows)
    }

    async fn usage_by_owner(&self) -> AppResult<Vec<OwnerUsage>> {
        let mut usage: HashMap<Uuid, (DateTime<Utc>, String, i64)> = HashMap::new();
        for file in self.files.iter() {
            let entry = usage
                .entry(file.owner_id)
                .or_insert_with(|| (file.created_at, file.owner_name.clone(), 0));
            if file.created_at > entry.0 {
                entry.0 = file.created_at;
                entry.1 = file.owner_name.clone();
            }
            entry.2 += file.size;
        }
        let mut rows: Vec<OwnerUsage> = usage
            .into_iter()
            .map(|(owner_id, (_, owner_name, bytes))| OwnerUsage {
                owner_id,
                owner_name,
                bytes,
            })
            .collect();
        rows.sort_by(|a, b| b.bytes.cmp(&a.bytes));
        Ok(rows)
    }

    async fn size_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<i64> {
        Ok(self
            .files
            .iter()
            .filter(|f| f.created_at >= from && f.created_at < to)
            .map(|f| f.size)
            .sum())
    }
}
