//! File listing, upload, metadata, sharing and delivery handlers.

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use docusphere_entity::file::File;
use docusphere_service::file::{DownloadLink, FilePreview, SharedFiles, UploadRequest};

use super::multipart::{read_form, require_file};
use crate::dto::request::{FileListQuery, MoveBody, RenameBody, ShareBody, UpdateFileBody};
use crate::dto::response::{ApiResponse, MessageResponse, ok};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson, ValidPath};
use crate::state::AppState;

/// GET /api/files?folder_id=...
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FileListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<File>>>> {
    let files = state.file_service.list(&auth, query.folder_id).await?;
    Ok(ok(files))
}

/// POST /api/files (multipart: `file`, `parent_id`, `is_public`, `tags`)
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<File>>)> {
    let mut form = read_form(multipart).await?;
    let part = require_file(&mut form)?;

    let file = state
        .upload_service
        .upload(
            &auth,
            UploadRequest {
                file_name: part.file_name,
                mime_type: part.mime_type,
                data: part.data,
                parent_id: form.uuid("parent_id")?,
                is_public: form.flag("is_public"),
                tags: form.tags("tags"),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, ok(file)))
}

/// GET /api/files/shared
pub async fn shared_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<SharedFiles>>> {
    let shared = state.file_service.shared(&auth).await?;
    Ok(ok(shared))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state.file_service.get(&auth, id).await?;
    Ok(ok(file))
}

/// PUT /api/files/{id}
pub async fn update_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<UpdateFileBody>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state.file_service.update(&auth, id, body.into()).await?;
    Ok(ok(file))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.file_service.delete(&auth, id).await?;
    Ok(ok(MessageResponse::new("File deleted")))
}

/// PUT /api/files/{id}/rename
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<RenameBody>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state.file_service.rename(&auth, id, &body.name).await?;
    Ok(ok(file))
}

/// PUT /api/files/{id}/move
pub async fn move_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<MoveBody>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state
        .file_service
        .move_to(&auth, id, body.target_folder_id)
        .await?;
    Ok(ok(file))
}

/// POST /api/files/{id}/share
pub async fn share_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<ShareBody>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state
        .file_service
        .share(&auth, id, &body.account_ids)
        .await?;
    Ok(ok(file))
}

/// DELETE /api/files/{id}/share
pub async fn unshare_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<ShareBody>,
) -> ApiResult<Json<ApiResponse<File>>> {
    let file = state
        .file_service
        .unshare(&auth, id, &body.account_ids)
        .await?;
    Ok(ok(file))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<DownloadLink>>> {
    let link = state.download_service.download(&auth, id).await?;
    Ok(ok(link))
}

/// GET /api/files/{id}/preview
pub async fn preview_file(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<FilePreview>>> {
    let preview = state.download_service.preview(&auth, id).await?;
    Ok(ok(preview))
}
