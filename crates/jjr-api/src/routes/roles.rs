//! 역할 endpoint.
//!
//! - `POST /protected/roles_register`: 역할 생성
//! - `POST /protected/roles`: 사용자에게 역할 할당
//! - `GET /protected/roles`: 사용자 역할 목록

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::JwtAuth;
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{OptionalJson, ValidatedJson};
use crate::routes::account::UsernameRequest;
use crate::state::AppState;

/// 역할 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRoleRequest {
    #[validate(length(min = 1))]
    pub role_name: String,
}

/// 역할 할당 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignRoleRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub role_name: String,
}

/// 역할 생성.
///
/// POST /protected/roles_register
#[utoipa::path(
    post,
    path = "/protected/roles_register",
    request_body = RegisterRoleRequest,
    responses(
        (status = 201, description = "생성 완료", body = String),
        (status = 400, description = "잘못된 요청 또는 중복 역할명", body = ApiErrorResponse),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "roles"
)]
pub async fn register_role(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    state.store.create_role(&request.role_name).await?;

    info!(role_name = %request.role_name, "role registered");
    Ok((StatusCode::CREATED, "Role registered successfully"))
}

/// 사용자에게 역할 할당.
///
/// 이미 할당된 역할이면 그대로 201입니다.
/// POST /protected/roles
#[utoipa::path(
    post,
    path = "/protected/roles",
    request_body = AssignRoleRequest,
    responses(
        (status = 201, description = "할당 완료", body = String),
        (status = 400, description = "잘못된 요청 또는 사용자/역할 없음", body = ApiErrorResponse),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "roles"
)]
pub async fn assign_role(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AssignRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .store
        .assign_role_to_user(&request.username, &request.role_name)
        .await?;

    info!(username = %request.username, role_name = %request.role_name, "role assigned");
    Ok((StatusCode::CREATED, "Role assigned successfully"))
}

/// 사용자 역할 목록 (오름차순).
///
/// 사용자가 없거나 역할이 하나도 없으면 401입니다. 두 경우는 로그로만 구분됩니다.
/// GET /protected/roles
#[utoipa::path(
    get,
    path = "/protected/roles",
    request_body(content = UsernameRequest, description = "생략 시 인증된 사용자"),
    responses(
        (status = 200, description = "역할 이름 목록", body = Vec<String>),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 401, description = "인증 실패 또는 역할 없음", body = ApiErrorResponse),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "roles"
)]
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    OptionalJson(request): OptionalJson<UsernameRequest>,
) -> ApiResult<Json<Vec<String>>> {
    let username = request.map_or(claims.username, |r| r.username);

    if state.store.get_user_by_username(&username).await?.is_none() {
        warn!(username = %username, "role lookup for unknown user");
        return Err(ApiError::Unauthorized);
    }

    let roles = state.store.get_roles_by_username(&username).await?;
    if roles.is_empty() {
        warn!(username = %username, "user has no roles");
        return Err(ApiError::Unauthorized);
    }

    Ok(Json(roles))
}
