//! Community feed handlers. Reads are public, writes need a session.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use uuid::Uuid;

use docusphere_entity::post::{Comment, Post, PostAttachment};
use docusphere_service::report::TopAuthor;

use super::multipart::{read_form, require_file};
use crate::dto::request::{CommentBody, CreatePostBody, UpdatePostBody};
use crate::dto::response::{ApiResponse, MessageResponse, ok};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson, ValidPath};
use crate::state::AppState;

/// GET /api/posts
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Post>>>> {
    let posts = state.post_service.list().await?;
    Ok(ok(posts))
}

/// GET /api/posts/top-authors
pub async fn top_authors(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<TopAuthor>>>> {
    let authors = state.post_service.top_authors().await?;
    Ok(ok(authors))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Post>>> {
    let post = state.post_service.get(id).await?;
    Ok(ok(post))
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(body): ValidJson<CreatePostBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Post>>)> {
    let post = state.post_service.create(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, ok(post)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<UpdatePostBody>,
) -> ApiResult<Json<ApiResponse<Post>>> {
    let post = state.post_service.update(&auth, id, body.into()).await?;
    Ok(ok(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.post_service.delete(&auth, id).await?;
    Ok(ok(MessageResponse::new("Post deleted")))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(body): ValidJson<CommentBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Comment>>)> {
    let comment = state.post_service.comment(&auth, id, &body.content).await?;
    Ok((StatusCode::CREATED, ok(comment)))
}

/// PUT /api/posts/{id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<Uuid>,
) -> ApiResult<Json<ApiResponse<Post>>> {
    let post = state.post_service.toggle_like(&auth, id).await?;
    Ok(ok(post))
}

/// POST /api/posts/upload (multipart: `file`)
pub async fn upload_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<PostAttachment>>)> {
    let mut form = read_form(multipart).await?;
    let part = require_file(&mut form)?;

    let attachment = state
        .post_service
        .upload_attachment(&auth, &part.file_name, part.mime_type.as_deref(), part.data)
        .await?;
    Ok((StatusCode::CREATED, ok(attachment)))
}
