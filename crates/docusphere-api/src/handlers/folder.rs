//! Folder hierarchy handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use docusphere_entity::folder::Folder;
use docusphere_service::folder::FolderContents;

use crate::dto::request::{CreateFolderBody, MoveBody, RenameBody, ShareBody, VisibilityBody};
use crate::dto::response::{ApiResponse, MessageResponse, ok};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson, ValidPath};
use crate::state::AppState;

/// GET /api/folders
pub async fn list_owned(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<Folder>>>> {
    let folders = state.folder_service.list_owned(&auth).await?;
    Ok(ok(folders))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(body): ValidJson<CreateFolderBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Folder>>)> {
    let folder = state
        .folder_service
        .create(&auth, &body.name, body.parent_id)
        .await?;
    Ok((StatusCode::CREATED, ok(folder)))
}

/// GET /api/folders/contents
pub async fn root_contents(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<FolderContents>>> {
    let contents = state.folder_service.contents(&auth, None).await?;
    Ok(ok(contents))
}

/// GET /api/folders/{id}/contents
pub async fn folder_contents(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<FolderContents>>> {
    let contents = state.folder_service.contents(&auth, Some(id)).await?;
    Ok(ok(contents))
}

/// PUT /api/folders/{id}
pub async fn set_visibility(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<VisibilityBody>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state
        .folder_service
        .set_visibility(&auth, id, body.is_public)
        .await?;
    Ok(ok(folder))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.folder_service.delete(&auth, id).await?;
    Ok(ok(MessageResponse::new("Folder deleted")))
}

/// PUT /api/folders/{id}/rename
pub async fn rename_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<RenameBody>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state.folder_service.rename(&auth, id, &body.name).await?;
    Ok(ok(folder))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<MoveBody>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state
        .folder_service
        .move_to(&auth, id, body.target_folder_id)
        .await?;
    Ok(ok(folder))
}

/// POST /api/folders/{id}/share
pub async fn share_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<ShareBody>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state
        .folder_service
        .share(&auth, id, &body.account_ids)
        .await?;
    Ok(ok(folder))
}

/// DELETE /api/folders/{id}/share
pub async fn unshare_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<ShareBody>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state
        .folder_service
        .unshare(&auth, id, &body.account_ids)
        .await?;
    Ok(ok(folder))
}
