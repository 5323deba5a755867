//! History repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use docusphere_core::error::{AppError, ErrorKind};
use docusphere_core::result::AppResult;
use docusphere_core::types::pagination::{PageRequest, PageResponse};
use docusphere_entity::history::{CreateHistoryEntry, HistoryAction, HistoryEntry};

use crate::store::{HistoryFilter, HistoryStore};

/// Repository for the append-only history log.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    /// Create a new history repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for HistoryRepository {
    async fn append(&self, data: &CreateHistoryEntry) -> AppResult<HistoryEntry> {
        sqlx::query_as::<_, HistoryEntry>(
            "INSERT INTO history_entries (id, actor_id, actor_name, actor_avatar, action_type, \
                 target_type, target_id, details, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.actor.id)
        .bind(&data.actor.name)
        .bind(&data.actor.avatar)
        .bind(data.action_type)
        .bind(data.target_type)
        .bind(data.target_id)
        .bind(&data.details)
        .bind(&data.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append history", e))
    }

    async fn search(
        &self,
        filter: &HistoryFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<HistoryEntry>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1;

        if filter.action.is_some() {
            conditions.push(format!("action_type = ${param_idx}"));
            param_idx += 1;
        }
        if filter.target_type.is_some() {
            conditions.push(format!("target_type = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM history_entries {where_clause}");
        let select_sql = format!(
            "SELECT * FROM history_entries {where_clause} \
             ORDER BY created_at DESC, id DESC LIMIT ${} OFFSET ${}",
            param_idx,
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, HistoryEntry>(&select_sql);

        if let Some(action) = filter.action {
            count_query = count_query.bind(action);
            select_query = select_query.bind(action);
        }
        if let Some(target) = filter.target_type {
            count_query = count_query.bind(target);
            select_query = select_query.bind(target);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count history entries", e)
        })?;

        let entries = select_query
            .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search history", e))?;

        Ok(PageResponse::new(entries, page, total as u64))
    }

    async fn count_action_between(
        &self,
        action: HistoryAction,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM history_entries \
             WHERE action_type = $1 AND created_at >= $2 AND created_at < $3",
        )
        .bind(action)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count actions", e))
    }

    async fn count_actors_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT actor_id) FROM history_entries WHERE created_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count active accounts", e)
        })
    }
}
