//! Task repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use docusphere_core::error::{AppError, ErrorKind};
use docusphere_core::result::AppResult;
use docusphere_entity::task::{CreateTask, Task, TaskStatus, UpdateTask};

use crate::store::TaskStore;

/// Repository for the task board.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new task repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn create(&self, data: &CreateTask) -> AppResult<Task> {
        let completed = data.status.is_completed();
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, title, description, priority, status, created_by_id, \
                 created_by_name, created_by_avatar, assigned_to, tags, completed, completed_at, \
                 due_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, \
                 CASE WHEN $11 THEN NOW() ELSE NULL END, $12) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.created_by.id)
        .bind(&data.created_by.name)
        .bind(&data.created_by.avatar)
        .bind(data.assigned_to)
        .bind(&data.tags)
        .bind(completed)
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create task", e))
    }

    async fn find_involving(&self, id: Uuid, account: Uuid) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE id = $1 AND (created_by_id = $2 OR assigned_to = $2)",
        )
        .bind(id)
        .bind(account)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find task", e))
    }

    async fn list_involving(
        &self,
        account: Uuid,
        status: Option<TaskStatus>,
    ) -> AppResult<Vec<Task>> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks \
             WHERE (created_by_id = $1 OR assigned_to = $1) \
               AND ($2::task_status IS NULL OR status = $2) \
             ORDER BY created_at DESC",
        )
        .bind(account)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tasks", e))
    }

    async fn update(&self, id: Uuid, data: &UpdateTask) -> AppResult<Option<Task>> {
        let (touch_completed_at, completed_at) = match data.completed_at {
            Some(value) => (true, value),
            None => (false, None),
        };
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                priority = COALESCE($4, priority), \
                status = COALESCE($5, status), \
                assigned_to = COALESCE($6, assigned_to), \
                tags = COALESCE($7, tags), \
                due_date = COALESCE($8, due_date), \
                completed = COALESCE($9, completed), \
                completed_at = CASE WHEN $10 THEN $11 ELSE completed_at END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.assigned_to)
        .bind(&data.tags)
        .bind(data.due_date)
        .bind(data.completed)
        .bind(touch_completed_at)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update task", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete task", e))?;
        Ok(result.rows_affected() > 0)
    }
}
