//! Tasks visible to their creator and assignee.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use docusphere_core::error::AppError;
use docusphere_core::result::AppResult;
use docusphere_database::store::TaskStore;
use docusphere_entity::history::{HistoryAction, TargetType};
use docusphere_entity::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};

use crate::context::RequestContext;
use crate::history::HistoryRecorder;

/// New task input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    /// Title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Priority, medium when absent.
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// Status, todo when absent.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Assignee.
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Task changes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New assignee.
    pub assigned_to: Option<Uuid>,
    /// New tags.
    pub tags: Option<Vec<String>>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Completion flag, kept in step with `status`.
    pub completed: Option<bool>,
}

/// Task management.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    history: HistoryRecorder,
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskService").finish()
    }
}

fn not_found() -> AppError {
    AppError::not_found("Task not found")
}

fn title_required() -> AppError {
    AppError::validation("Title is required").with_details(json!({ "title": "Title is required" }))
}

/// Derive the stored update, keeping `status`, `completed` and
/// `completed_at` consistent.
fn to_update(req: UpdateTaskRequest, now: DateTime<Utc>) -> AppResult<UpdateTask> {
    let title = match req.title {
        Some(title) if title.trim().is_empty() => return Err(title_required()),
        Some(title) => Some(title.trim().to_string()),
        None => None,
    };
    let status = match (req.status, req.completed) {
        (Some(status), _) => Some(status),
        (None, Some(true)) => Some(TaskStatus::Completed),
        (None, Some(false)) => Some(TaskStatus::Todo),
        (None, None) => None,
    };
    let (completed, completed_at) = match status {
        Some(status) if status.is_completed() => (Some(true), Some(Some(now))),
        Some(_) => (Some(false), Some(None)),
        None => (None, None),
    };
    Ok(UpdateTask {
        title,
        description: req.description,
        priority: req.priority,
        status,
        assigned_to: req.assigned_to,
        tags: req.tags,
        due_date: req.due_date,
        completed,
        completed_at,
    })
}

impl TaskService {
    /// Creates a new task service.
    pub fn new(tasks: Arc<dyn TaskStore>, history: HistoryRecorder) -> Self {
        Self { tasks, history }
    }

    /// Tasks the caller created or is assigned to, newest first.
    pub async fn list(&self, ctx: &RequestContext, status: Option<TaskStatus>) -> AppResult<Vec<Task>> {
        self.tasks.list_involving(ctx.account_id(), status).await
    }

    /// Create a task owned by the caller.
    pub async fn create(&self, ctx: &RequestContext, req: CreateTaskRequest) -> AppResult<Task> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(title_required());
        }
        let task = self
            .tasks
            .create(&CreateTask {
                title: title.to_string(),
                description: req.description,
                priority: req.priority.unwrap_or_default(),
                status: req.status.unwrap_or_default(),
                created_by: ctx.actor(),
                assigned_to: req.assigned_to,
                tags: req.tags,
                due_date: req.due_date,
            })
            .await?;

        info!(user_id = %ctx.account_id(), task_id = %task.id, "Task created");
        Ok(task)
    }

    /// A task the caller created or is assigned to.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Task> {
        self.tasks
            .find_involving(id, ctx.account_id())
            .await?
            .ok_or_else(not_found)
    }

    /// Update a task. Creator or assignee.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateTaskRequest,
    ) -> AppResult<Task> {
        let update = to_update(req, Utc::now())?;
        self.get(ctx, id).await?;
        let task = self.tasks.update(id, &update).await?.ok_or_else(not_found)?;

        self.history
            .record(
                ctx,
                HistoryAction::Modify,
                TargetType::Task,
                id,
                format!("Updated task \"{}\"", task.title),
                Some(json!({ "status": task.status, "completed": task.completed })),
            )
            .await;
        Ok(task)
    }

    /// Mark a task completed.
    pub async fn complete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Task> {
        self.update(
            ctx,
            id,
            UpdateTaskRequest {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a task. Its creator or an Admin.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !ctx.is_admin() {
            let task = self.get(ctx, id).await?;
            if task.created_by_id != ctx.account_id() {
                return Err(AppError::forbidden("Only the creator may delete this task"));
            }
        }
        if !self.tasks.delete(id).await? {
            return Err(not_found());
        }

        info!(user_id = %ctx.account_id(), task_id = %id, "Task deleted");
        self.history
            .record(ctx, HistoryAction::Delete, TargetType::Task, id, "Deleted task", None)
            .await;
        Ok(())
    }
}
