//! Task entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{TaskPriority, TaskStatus};
use crate::snapshot::OwnerSnapshot;

/// A task on the board.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique task identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Workflow status.
    pub status: TaskStatus,
    /// Creator account ID.
    pub created_by_id: Uuid,
    /// Creator display name at creation time.
    pub created_by_name: String,
    /// Creator avatar at creation time.
    pub created_by_avatar: Option<String>,
    /// Assignee account ID.
    pub assigned_to: Option<Uuid>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Whether the task is done.
    pub completed: bool,
    /// When the task was completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Check whether the account created or is assigned to the task.
    pub fn involves(&self, account_id: Uuid) -> bool {
        self.created_by_id == account_id || self.assigned_to == Some(account_id)
    }

    /// The creator snapshot.
    pub fn created_by(&self) -> OwnerSnapshot {
        OwnerSnapshot {
            id: self.created_by_id,
            name: self.created_by_name.clone(),
            avatar: self.created_by_avatar.clone(),
        }
    }
}

/// Data required to create a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Initial status.
    pub status: TaskStatus,
    /// Creator snapshot.
    pub created_by: OwnerSnapshot,
    /// Assignee.
    pub assigned_to: Option<Uuid>,
    /// Tags.
    pub tags: Vec<String>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial task update. `None` fields are left untouched.
///
/// `completed` and `completed_at` are derived from `status` by the service
/// and always written together with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
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
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Completion flag (set with `status`).
    pub completed: Option<bool>,
    /// Completion time; `Some(None)` clears it.
    pub completed_at: Option<Option<DateTime<Utc>>>,
}
