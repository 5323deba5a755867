//! In-memory task store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use docusphere_core::result::AppResult;
use docusphere_entity::task::{CreateTask, Task, TaskStatus, UpdateTask};

use crate::store::TaskStore;

/// Task store backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: DashMap<Uuid, Task>,
}

impl MemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(&self, data: &CreateTask) -> AppResult<Task> {
        let now = Utc::now();
        let completed = data.status.is_completed();
        let task = Task {
            id: Uuid::now_v7(),
            title: data.title.clone(),
            description: data.description.clone(),
            priority: data.priority,
            status: data.status,
            created_by_id: data.created_by.id,
            created_by_name: data.created_by.name.clone(),
            created_by_avatar: data.created_by.avatar.clone(),
            assigned_to: data.assigned_to,
            tags: data.tags.clone(),
            completed,
            completed_at: completed.then_some(now),
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_involving(&self, id: Uuid, account: Uuid) -> AppResult<Option<Task>> {
        Ok(self
            .tasks
            .get(&id)
            .filter(|t| t.involves(account))
            .map(|t| t.value().clone()))
    }

    async fn list_involving(
        &self,
        account: Uuid,
        status: Option<TaskStatus>,
    ) -> AppResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.involves(account) && status.is_none_or(|s| s == t.status))
            .map(|t| t.value().clone())
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn update(&self, id: Uuid, data: &UpdateTask) -> AppResult<Option<Task>> {
        let Some(mut task) = self.tasks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &data.title {
            task.title = title.clone();
        }
        if let Some(description) = &data.description {
            task.description = Some(description.clone());
        }
        if let Some(priority) = data.priority {
            task.priority = priority;
        }
        if let Some(status) = data.status {
            task.status = status;
        }
        if let Some(assignee) = data.assigned_to {
            task.assigned_to = Some(assignee);
        }
        if let Some(tags) = &data.tags {
            task.tags = tags.clone();
        }
        if let Some(due_date) = data.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(completed) = data.completed {
            task.completed = completed;
        }
        if let Some(completed_at) = data.completed_at {
            task.completed_at = completed_at;
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tasks.remove(&id).is_some())
    }
}
