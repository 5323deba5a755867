//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use docusphere_core::error::{AppError, ErrorKind};
use docusphere_core::result::AppResult;
use docusphere_entity::access::AccessScope;
use docusphere_entity::folder::{CreateFolder, Folder};

use super::scope::{scope_clause, scope_param};
use crate::store::FolderStore;

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn find(&self, id: Uuid, scope: AccessScope) -> AppResult<Option<Folder>> {
        let sql = format!(
            "SELECT * FROM folders WHERE id = $1 AND {}",
            scope_clause(scope, 2)
        );
        sqlx::query_as::<_, Folder>(&sql)
            .bind(id)
            .bind(scope_param(scope))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn list_children(
        &self,
        parent: Option<Uuid>,
        scope: AccessScope,
    ) -> AppResult<Vec<Folder>> {
        let sql = format!(
            "SELECT * FROM folders WHERE parent_id IS NOT DISTINCT FROM $1 AND {} \
             ORDER BY name ASC",
            scope_clause(scope, 2)
        );
        sqlx::query_as::<_, Folder>(&sql)
            .bind(parent)
            .bind(scope_param(scope))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn list_owned(&self, owner: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE owner_id = $1 ORDER BY path ASC")
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list owned folders", e)
            })
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, path, parent_id, owner_id, owner_name, owner_avatar) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.name)
        .bind(&data.path)
        .bind(data.parent_id)
        .bind(data.owner.id)
        .bind(&data.owner.name)
        .bind(&data.owner.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    async fn rename(&self, id: Uuid, name: &str, path: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, path = $3, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename folder", e))
    }

    async fn set_visibility(&self, id: Uuid, is_public: bool) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET is_public = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_public)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update folder visibility", e)
        })
    }

    async fn move_to(
        &self,
        id: Uuid,
        parent: Option<Uuid>,
        path: &str,
    ) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2, path = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(parent)
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move folder", e))
    }

    async fn rebase_descendants(
        &self,
        id: Uuid,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "WITH RECURSIVE subtree AS ( \
                 SELECT id FROM folders WHERE parent_id = $1 \
                 UNION \
                 SELECT f.id FROM folders f JOIN subtree s ON f.parent_id = s.id \
             ) \
             UPDATE folders \
             SET path = $3 || substr(path, char_length($2) + 1), updated_at = NOW() \
             WHERE id IN (SELECT id FROM subtree) AND left(path, char_length($2)) = $2",
        )
        .bind(id)
        .bind(old_prefix)
        .bind(new_prefix)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rewrite folder paths", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn is_within(&self, ancestor: Uuid, candidate: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "WITH RECURSIVE chain AS ( \
                 SELECT id, parent_id FROM folders WHERE id = $2 \
                 UNION \
                 SELECT f.id, f.parent_id FROM folders f JOIN chain c ON f.id = c.parent_id \
             ) \
             SELECT EXISTS (SELECT 1 FROM chain WHERE id = $1)",
        )
        .bind(ancestor)
        .bind(candidate)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to walk folder chain", e))
    }

    async fn reparent_children(&self, from: Uuid, to: Option<Uuid>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE folders SET parent_id = $2, updated_at = NOW() WHERE parent_id = $1",
        )
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to re-parent folders", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete folder", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders \
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
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to share folder", e))
    }

    async fn remove_shares(&self, id: Uuid, accounts: &[Uuid]) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders \
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
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unshare folder", e))
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM folders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))
    }
}
