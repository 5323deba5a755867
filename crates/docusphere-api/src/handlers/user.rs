//! Account administration and self-service handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use docusphere_entity::account::Account;

use crate::dto::request::{ChangePasswordBody, CreateAccountBody, UpdateAccountBody};
use crate::dto::response::{ApiResponse, MessageResponse, ok};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson, ValidPath};
use crate::state::AppState;

/// GET /api/users (Admin)
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Account>>>> {
    let accounts = state.account_service.list(&auth).await?;
    Ok(ok(accounts))
}

/// POST /api/users (Admin)
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(body): ValidJson<CreateAccountBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Account>>)> {
    let account = state.account_service.create(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, ok(account)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Account>>> {
    let account = state.account_service.get(&auth, id).await?;
    Ok(ok(account))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<UpdateAccountBody>,
) -> ApiResult<Json<ApiResponse<Account>>> {
    let account = state.account_service.update(&auth, id, body.into()).await?;
    Ok(ok(account))
}

/// DELETE /api/users/{id} (Admin)
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.account_service.delete(&auth, id).await?;
    Ok(ok(MessageResponse::new("User deleted")))
}

/// POST /api/users/{id}/change-info
pub async fn change_info(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<UpdateAccountBody>,
) -> ApiResult<Json<ApiResponse<Account>>> {
    let account = state
        .account_service
        .change_info(&auth, id, body.into())
        .await?;
    Ok(ok(account))
}

/// POST /api/users/{id}/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<ChangePasswordBody>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .account_service
        .change_password(&auth, id, body.into())
        .await?;
    Ok(ok(MessageResponse::new("Password changed")))
}
