//! Access Token 갱신 endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// 갱신 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// 갱신 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    /// 새 Access Token
    pub token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// 만료 시간 (초)
    pub expires_in: i64,
}

/// Refresh Token으로 새 Access Token 발급.
///
/// 역할은 토큰이 아닌 저장소에서 다시 조회하므로 발급 이후의 역할 변경이 반영됩니다.
/// Refresh Token 자체는 교체하지 않습니다.
/// POST /refresh
#[utoipa::path(
    post,
    path = "/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Access Token 발급", body = RefreshResponse),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 401, description = "유효하지 않거나 만료된 토큰", body = ApiErrorResponse),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    tag = "account"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let now = Utc::now();
    let claims = state.tokens.verify_refresh(&request.refresh_token, now)?;

    if state
        .store
        .get_user_by_username(&claims.username)
        .await?
        .is_none()
    {
        warn!(username = %claims.username, "refresh token for unknown user");
        return Err(ApiError::Unauthorized);
    }

    let roles = state.store.get_roles_by_username(&claims.username).await?;
    let token = state
        .tokens
        .issue_access_token(&claims.username, roles, now)?;

    debug!(username = %claims.username, "access token refreshed");
    Ok(Json(RefreshResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.access_ttl_secs(),
    }))
}
