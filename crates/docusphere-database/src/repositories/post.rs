//! Post repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use docusphere_core::error::{AppError, ErrorKind};
use docusphere_core::result::AppResult;
use docusphere_entity::post::{AuthorEngagement, Comment, CreatePost, Post, UpdatePost};

use crate::store::PostStore;

/// Repository for the community feed.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (id, title, content, author_id, author_name, author_avatar, files, \
                 tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.title)
        .bind(&data.content)
        .bind(data.author.id)
        .bind(&data.author.name)
        .bind(&data.author.avatar)
        .bind(Json(&data.files))
        .bind(&data.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create post", e))
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post", e))
    }

    async fn list(&self) -> AppResult<Vec<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list posts", e))
    }

    async fn update(&self, id: Uuid, data: &UpdatePost) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                tags = COALESCE($4, tags), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.tags)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update post", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete post", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn push_comment(&self, id: Uuid, comment: &Comment) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET comments = comments || jsonb_build_array($2::jsonb), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Json(comment))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add comment", e))
    }

    async fn toggle_like(&self, id: Uuid, account: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET likes = CASE \
                     WHEN $2 = ANY(likes) THEN array_remove(likes, $2) \
                     ELSE array_append(likes, $2) \
                 END \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(account)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to toggle like", e))
    }

    async fn author_engagement(&self) -> AppResult<Vec<AuthorEngagement>> {
        sqlx::query_as::<_, AuthorEngagement>(
            "SELECT author_id, \
                    (array_agg(author_name ORDER BY created_at ASC))[1] AS author_name, \
                    (array_agg(author_avatar ORDER BY created_at ASC))[1] AS author_avatar, \
                    COUNT(*) AS total_posts, \
                    COALESCE(SUM(cardinality(likes)), 0)::BIGINT AS total_likes, \
                    COALESCE(SUM(jsonb_array_length(comments)), 0)::BIGINT AS total_comments \
             FROM posts GROUP BY author_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate post engagement", e)
        })
    }
}
