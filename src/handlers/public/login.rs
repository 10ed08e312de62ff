use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::handlers::params::is_blank;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ServiceError, Session};

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub login: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login - Exchange credentials for a bearer token
///
/// ```json
/// { "token": "eyJ...", "token_type": "Bearer", "expires_in": 14400,
///   "user": { "login": "alice", "role": "USER" } }
/// ```
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> ApiResult<Session> {
    let Json(payload) = payload?;
    if is_blank(&payload.login) {
        return Err(ServiceError::invalid_field("login", "This field is required").into());
    }
    let login = payload.login.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let session = state.identity.login(&login, &password).await?;
    tracing::info!("Issued token for '{}'", session.user.login);
    Ok(ApiResponse::success(session))
}
