//! Append-only activity log used by every mutating service.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_core::types::pagination::{PageRequest, PageResponse};
use docusphere_database::store::{HistoryFilter, HistoryStore};
use docusphere_entity::history::{CreateHistoryEntry, HistoryAction, HistoryEntry, TargetType};

use crate::context::RequestContext;

/// Records and queries history entries.
#[derive(Clone)]
pub struct HistoryRecorder {
    store: Arc<dyn HistoryStore>,
}

impl std::fmt::Debug for HistoryRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryRecorder").finish()
    }
}

/// A client-submitted history entry.
#[derive(Debug, Clone)]
pub struct RecordRequest {
    /// What happened.
    pub action_type: HistoryAction,
    /// Kind of resource.
    pub target_type: TargetType,
    /// Resource ID.
    pub target_id: Uuid,
    /// Description.
    pub details: String,
    /// Extra data.
    pub metadata: Option<Value>,
}

impl HistoryRecorder {
    /// Creates a new recorder.
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Record an action that already happened.
    ///
    /// A storage failure is logged and swallowed: the primary write has
    /// already succeeded and is not rolled back.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        action_type: HistoryAction,
        target_type: TargetType,
        target_id: Uuid,
        details: impl Into<String>,
        metadata: Option<Value>,
    ) {
        let entry = CreateHistoryEntry {
            actor: ctx.actor(),
            action_type,
            target_type,
            target_id,
            details: details.into(),
            metadata,
        };
        if let Err(e) = self.store.append(&entry).await {
            warn!(
                action = %action_type,
                target_id = %target_id,
                error = %e,
                "Failed to record history entry"
            );
        }
    }

    /// Append an entry submitted by a client.
    pub async fn append(
        &self,
        ctx: &RequestContext,
        req: RecordRequest,
    ) -> AppResult<HistoryEntry> {
        if req.details.trim().is_empty() {
            return Err(AppError::validation("History details are required"));
        }
        self.store
            .append(&CreateHistoryEntry {
                actor: ctx.actor(),
                action_type: req.action_type,
                target_type: req.target_type,
                target_id: req.target_id,
                details: req.details,
                metadata: req.metadata,
            })
            .await
    }

    /// Page through entries, newest first.
    pub async fn search(
        &self,
        filter: HistoryFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<HistoryEntry>> {
        self.store.search(&filter, &page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingHistoryStore, context};
    use docusphere_database::memory::MemoryHistoryStore;
    use docusphere_entity::account::AccountRole;

    #[tokio::test]
    async fn test_record_swallows_store_failures() {
        let recorder = HistoryRecorder::new(Arc::new(FailingHistoryStore));
        let ctx = context(AccountRole::Editor);
        recorder
            .record(&ctx, HistoryAction::Upload, TargetType::File, Uuid::new_v4(), "x", None)
            .await;
    }

    #[tokio::test]
    async fn test_append_and_search() {
        let recorder = HistoryRecorder::new(Arc::new(MemoryHistoryStore::new()));
        let ctx = context(AccountRole::Editor);
        let entry = recorder
            .append(&ctx, RecordRequest {
                action_type: HistoryAction::Archive,
                target_type: TargetType::Folder,
                target_id: Uuid::new_v4(),
                details: "Archived Q1".to_string(),
                metadata: None,
            })
            .await
            .unwrap();
        assert_eq!(entry.actor_id, ctx.account_id());

        let page = recorder
            .search(HistoryFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 1);
    }

    #[tokio::test]
    async fn test_append_requires_details() {
        let recorder = HistoryRecorder::new(Arc::new(MemoryHistoryStore::new()));
        let err = recorder
            .append(&context(AccountRole::Viewer), RecordRequest {
                action_type: HistoryAction::Modify,
                target_type: TargetType::File,
                target_id: Uuid::new_v4(),
                details: "  ".to_string(),
                metadata: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, docusphere_core::error::ErrorKind::Validation);
    }
}
