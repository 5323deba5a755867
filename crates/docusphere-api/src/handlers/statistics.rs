//! Dashboard aggregates.

use axum::Json;
use axum::extract::State;

use docusphere_service::report::{ActivityPoint, LoginChart, Statistics, StoragePoint};

use crate::dto::response::{ApiResponse, ok};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/statistics
pub async fn statistics(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Statistics>>> {
    let stats = state.statistics_service.statistics().await?;
    Ok(ok(stats))
}

/// GET /api/storage/chart
pub async fn storage_chart(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<StoragePoint>>>> {
    let points = state.statistics_service.storage_chart().await?;
    Ok(ok(points))
}

/// GET /api/activity/chart
pub async fn activity_chart(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<ActivityPoint>>>> {
    let points = state.statistics_service.activity_chart().await?;
    Ok(ok(points))
}

/// GET /api/login-history/chart
pub async fn login_chart(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<LoginChart>>> {
    let chart = state.statistics_service.login_chart().await?;
    Ok(ok(chart))
}
