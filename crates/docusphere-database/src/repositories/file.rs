//! File repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use docusphere_core::error::{AppError, ErrorKind};
use docusphere_core::result::AppResult;
use docusphere_entity::access::AccessScope;
use docusphere_entity::file::{CreateFile, File, UpdateFile};

use super::scope::{scope_clause, scope_param};
use crate::store::{FileStore, FileTypeCount, OwnerUsage};

/// Repository for file CRUD, sharing and file aggregates.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn find(&self, id: Uuid, scope: AccessScope) -> AppResult<Option<File>> {
        let sql = format!(
            "SELECT * FROM files WHERE id = $1 AND {}",
            scope_clause(scope, 2)
        );
        sqlx::query_as::<_, File>(&sql)
            .bind(id)
            .bind(scope_param(scope))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn list_in(&self, parent: Option<Uuid>, scope: AccessScope) -> AppResult<Vec<File>> {
        let sql = format!(
            "SELECT * FROM files WHERE parent_id IS NOT DISTINCT FROM $1 AND {} \
             ORDER BY name ASC",
            scope_clause(scope, 2)
        );
        sqlx::query_as::<_, File>(&sql)
            .bind(parent)
            .bind(scope_param(scope))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn list_shared_with(&self, account: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE $1 = ANY(shared_with) ORDER BY created_at DESC",
        )
        .bind(account)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list files shared with me", e)
        })
    }

    async fn list_shared_by(&self, owner: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE owner_id = $1 AND cardinality(shared_with) > 0 \
             ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list files shared by me", e)
        })
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, name, size, mime_type, parent_id, owner_id, owner_name, \
                 owner_avatar, is_public, tags, asset_id, secure_url, format, resource_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.name)
        .bind(data.size)
        .bind(&data.mime_type)
        .bind(data.parent_id)
        .bind(data.owner.id)
        .bind(&data.owner.name)
        .bind(&data.owner.avatar)
        .bind(data.is_public)
        .bind(&data.tags)
        .bind(&data.storage.asset_id)
        .bind(&data.storage.secure_url)
        .bind(&data.storage.format)
        .bind(&data.storage.resource_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("files_asset_id_key") =>
            {
                AppError::conflict(format!(
                    "Asset '{}' is already referenced by another file",
                    data.storage.asset_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    async fn update(&self, id: Uuid, data: &UpdateFile) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET \
                name = COALESCE($2, name), \
                is_public = COALESCE($3, is_public), \
                tags = COALESCE($4, tags), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.is_public)
        .bind(&data.tags)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))
    }

    async fn move_to(&self, id: Uuid, parent: Option<Uuid>) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET parent_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(parent)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move file", e))
    }

    async fn reparent_children(&self, from: Uuid, to: Option<Uuid>) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE files SET parent_id = $2, updated_at = NOW() WHERE parent_id = $1")
                .bind(from)
                .bind(to)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to re-parent files", e)
                })?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files \
             SET shared_with = shared_with || ARRAY( \
                     SELECT DISTINCT a FROM unnest($2::uuid[]) AS a \
                     WHERE a <> ALL(shared_with) \
                 ), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(accounts)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to share file", e))
    }

    async fn remove_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files \
             SET shared_with = ARRAY( \
                     SELECT a FROM unnest(shared_with) AS a WHERE a <> ALL($2::uuid[]) \
                 ), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(accounts)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unshare file", e))
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))
    }

    async fn total_size(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(size), 0)::BIGINT FROM files")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to sum file sizes", e))
    }

    async fn count_by_mime(&self) -> AppResult<Vec<FileTypeCount>> {
        sqlx::query_as::<_, FileTypeCount>(
            "SELECT mime_type, COUNT(*) AS count FROM files GROUP BY mime_type ORDER BY count DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to group files by type", e)
        })
    }

    async fn usage_by_owner(&self) -> AppResult<Vec<OwnerUsage>> {
        sqlx::query_as::<_, OwnerUsage>(
            "SELECT owner_id, \
                    (array_agg(owner_name ORDER BY created_at DESC))[1] AS owner_name, \
                    COALESCE(SUM(size), 0)::BIGINT AS bytes \
             FROM files GROUP BY owner_id ORDER BY bytes DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to group storage by owner", e)
        })
    }

    async fn size_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(size), 0)::BIGINT FROM files \
             WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sum uploads in range", e)
        })
    }
}
