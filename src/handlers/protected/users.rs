use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{AccountView, NewAccount, Page};
use crate::handlers::params::{is_blank, PageParams};
use crate::middleware::{ApiResponse, ApiResult};
use crate::security::{Identity, Role};
use crate::services::ServiceError;

#[derive(Debug, Default, Deserialize)]
pub struct CreateAccountPayload {
    pub login: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl CreateAccountPayload {
    pub fn validate(self) -> Result<NewAccount, ServiceError> {
        if is_blank(&self.login) {
            return Err(ServiceError::invalid_field("login", "This field is required"));
        }
        if is_blank(&self.password) {
            return Err(ServiceError::invalid_field("password", "This field is required"));
        }
        Ok(NewAccount {
            login: self.login.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            role: self.role.unwrap_or(Role::User),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RolePayload {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct PasswordPayload {
    pub password: Option<String>,
}

/// GET /api/users - Admin only
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(paging): Query<PageParams>,
) -> ApiResult<Page<AccountView>> {
    let window = paging.to_window(&state.pagination);
    let page = state.users.list_all(&identity, &window).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/users - Admin only; role defaults to USER
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<CreateAccountPayload>, JsonRejection>,
) -> ApiResult<AccountView> {
    let Json(payload) = payload?;
    let view = state.users.create(&identity, payload.validate()?).await?;
    Ok(ApiResponse::created(view))
}

/// DELETE /api/users/:login - Admin only, never on the caller's own account
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(login): Path<String>,
) -> ApiResult<()> {
    state.users.delete(&identity, &login).await?;
    Ok(ApiResponse::no_content())
}

/// POST /api/users/:login/reset-password - Returns the generated plaintext once
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(login): Path<String>,
) -> ApiResult<Value> {
    let password = state.users.reset_password(&identity, &login).await?;
    Ok(ApiResponse::success(json!({ "password": password })))
}

/// PATCH /api/users/:login/role
pub async fn update_role(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(login): Path<String>,
    payload: Result<Json<RolePayload>, JsonRejection>,
) -> ApiResult<()> {
    let Json(payload) = payload?;
    state.users.update_role(&identity, &login, payload.role).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /api/users/:login/password - Only the account owner may call this
pub async fn update_password(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(login): Path<String>,
    payload: Result<Json<PasswordPayload>, JsonRejection>,
) -> ApiResult<()> {
    let Json(payload) = payload?;
    if is_blank(&payload.password) {
        return Err(ServiceError::invalid_field("password", "This field is required").into());
    }
    let password = payload.password.unwrap_or_default();
    state.users.update_password(&identity, &login, &password).await?;
    Ok(ApiResponse::no_content())
}
