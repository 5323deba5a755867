//! In-memory history log.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use docusphere_core::result::AppResult;
use docusphere_core::types::pagination::{PageRequest, PageResponse};
use docusphere_entity::history::{CreateHistoryEntry, HistoryAction, HistoryEntry};

use crate::store::{HistoryFilter, HistoryStore};

/// Append-only history log kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl MemoryHistoryStore {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(filter: &HistoryFilter, entry: &HistoryEntry) -> bool {
    filter.action.is_none_or(|a| a == entry.action_type)
        && filter.target_type.is_none_or(|t| t == entry.target_type)
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, data: &CreateHistoryEntry) -> AppResult<HistoryEntry> {
        let entry = HistoryEntry {
            id: Uuid::now_v7(),
            actor_id: data.actor.id,
            actor_name: data.actor.name.clone(),
            actor_avatar: data.actor.avatar.clone(),
            action_type: data.action_type,
            target_type: data.target_type,
            target_id: data.target_id,
            details: data.details.clone(),
            metadata: data.metadata.clone(),
            created_at: Utc::now(),
        };
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn search(
        &self,
        filter: &HistoryFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<HistoryEntry>> {
        let entries = self.entries.read().await;
        let matching: Vec<&HistoryEntry> =
            entries.iter().rev().filter(|e| matches(filter, e)).collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn count_action_between(
        &self,
        action: HistoryAction,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<i64> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.action_type == action && e.created_at >= from && e.created_at < to)
            .count() as i64)
    }

    async fn count_actors_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        let entries = self.entries.read().await;
        let actors: HashSet<Uuid> = entries
            .iter()
            .filter(|e| e.created_at >= since)
            .map(|e| e.actor_id)
            .collect();
        Ok(actors.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use docusphere_entity::history::TargetType;
    use docusphere_entity::snapshot::OwnerSnapshot;

    fn entry(actor: Uuid, action: HistoryAction, target_type: TargetType) -> CreateHistoryEntry {
        CreateHistoryEntry {
            actor: OwnerSnapshot {
                id: actor,
                name: "Awa".to_string(),
                avatar: None,
            },
            action_type: action,
            target_type,
            target_id: Uuid::new_v4(),
            details: format!("{action} happened"),
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_search_is_newest_first_and_filtered() {
        let store = MemoryHistoryStore::new();
        let actor = Uuid::new_v4();
        store.append(&entry(actor, HistoryAction::Upload, TargetType::File)).await.unwrap();
        store
            .append(&entry(actor, HistoryAction::CreateFolder, TargetType::Folder))
            .await
            .unwrap();
        let last = store.append(&entry(actor, HistoryAction::Upload, TargetType::File)).await.unwrap();

        let page = store
            .search(&HistoryFilter::default(), &PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, last.id);
        assert!(page.has_next);

        let uploads = store
            .search(
                &HistoryFilter {
                    action: Some(HistoryAction::Upload),
                    target_type: None,
                },
                &PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(uploads.total_items, 2);
    }

    #[tokio::test]
    async fn test_counts() {
        let store = MemoryHistoryStore::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        store.append(&entry(first, HistoryAction::Upload, TargetType::File)).await.unwrap();
        store.append(&entry(first, HistoryAction::Upload, TargetType::File)).await.unwrap();
        store.append(&entry(second, HistoryAction::Delete, TargetType::File)).await.unwrap();

        let now = Utc::now();
        let hour_ago = now - Duration::hours(1);
        let later = now + Duration::minutes(1);
        assert_eq!(
            store
                .count_action_between(HistoryAction::Upload, hour_ago, later)
                .await
                .unwrap(),
            2
        );
        assert_eq!(store.count_actors_since(hour_ago).await.unwrap(), 2);
        assert_eq!(store.count_actors_since(later).await.unwrap(), 0);
    }
}
