//! Registration, login and current identity.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use docusphere_entity::account::Account;
use docusphere_service::auth::LoginResult;

use crate::dto::request::{LoginBody, RegisterBody};
use crate::dto::response::{ApiResponse, ok};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Client, ValidJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterBody>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Account>>)> {
    let account = state.auth_service.register(body.into()).await?;
    Ok((StatusCode::CREATED, ok(account)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Client(client): Client,
    ValidJson(body): ValidJson<LoginBody>,
) -> ApiResult<Json<ApiResponse<LoginResult>>> {
    let result = state
        .auth_service
        .login(&body.email, &body.password, &client)
        .await?;
    Ok(ok(result))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Account>>> {
    let account = state.account_service.get(&auth, auth.account_id()).await?;
    Ok(ok(account))
}
