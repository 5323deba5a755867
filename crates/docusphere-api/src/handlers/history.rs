//! Activity log handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use docusphere_core::types::pagination::PageResponse;
use docusphere_entity::history::HistoryEntry;

use crate::dto::request::RecordHistoryBody;
use crate::dto::response::{ApiResponse, ok};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, HistoryQuery, ValidJson};
use crate::state::AppState;

/// GET /api/history?page=&limit=&type=&target=
pub async fn query_history(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<HistoryEntry>>>> {
    let page = state
        .history
        .search(query.filter(), query.page_request())
        .await?;
    Ok(ok(page))
}

/// POST /api/history
pub async fn record_history(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(body): ValidJson<RecordHistoryBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<HistoryEntry>>)> {
    let entry = state.history.append(&auth, body.into()).await?;
    Ok((StatusCode::CREATED, ok(entry)))
}
