//! Liveness probe.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, ComponentHealth, HealthResponse, ok};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let (database, assets) = tokio::join!(
        state.stores.health_check(),
        state.assets.health_check()
    );
    ok(HealthResponse::new(
        ComponentHealth::probe(state.stores.provider_type(), database),
        ComponentHealth::probe(state.assets.provider_type(), assets),
    ))
}
