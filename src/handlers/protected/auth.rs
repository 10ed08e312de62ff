use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult};
use crate::security::Identity;

/// GET /api/auth/whoami - The caller's login and current role
pub async fn whoami(Extension(identity): Extension<Identity>) -> ApiResult<Identity> {
    Ok(ApiResponse::success(identity))
}
