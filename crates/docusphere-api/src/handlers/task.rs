//! Task board handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use docusphere_entity::task::Task;

use crate::dto::request::{CreateTaskBody, TaskListQuery, UpdateTaskBody};
use crate::dto::response::{ApiResponse, MessageResponse, ok};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson, ValidPath};
use crate::state::AppState;

/// GET /api/tasks?status=
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Task>>>> {
    let tasks = state.task_service.list(&auth, query.status).await?;
    Ok(ok(tasks))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(body): ValidJson<CreateTaskBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Task>>)> {
    let task = state.task_service.create(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, ok(task)))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let task = state.task_service.get(&auth, id).await?;
    Ok(ok(task))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<UpdateTaskBody>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let task = state.task_service.update(&auth, id, body.into()).await?;
    Ok(ok(task))
}

/// POST /api/tasks/{id}/complete
pub async fn complete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let task = state.task_service.complete(&auth, id).await?;
    Ok(ok(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.task_service.delete(&auth, id).await?;
    Ok(ok(MessageResponse::new("Task deleted")))
}
