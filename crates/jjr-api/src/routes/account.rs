//! 계정 endpoint.
//!
//! - `POST /account`: 로그인 후 토큰 쌍 발급
//! - `GET /protected/account`: 계정 정보 조회
//! - `POST /protected/account_register`: 사용자 등록

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use jjr_core::{NewUser, User};

use crate::auth::{JwtAuth, TokenPair};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{OptionalJson, ValidatedJson};
use crate::state::AppState;

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// 사용자명 지정 요청 (GET 본문).
///
/// 본문이 없으면 인증된 사용자 자신을 대상으로 합니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UsernameRequest {
    #[validate(length(min = 1))]
    pub username: String,
}

/// 사용자 등록 요청.
#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterAccountRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl std::fmt::Debug for RegisterAccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterAccountRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// 로그인 후 Access/Refresh Token 발급.
///
/// 사용자 없음과 비밀번호 불일치는 구분하지 않고 모두 401입니다.
/// POST /account
#[utoipa::path(
    post,
    path = "/account",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "토큰 발급", body = TokenPair),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 401, description = "자격증명 불일치", body = ApiErrorResponse),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    tag = "account"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let Some(user) = state
        .store
        .verify_credentials(&request.username, &request.password)
        .await?
    else {
        warn!(username = %request.username, "login rejected");
        return Err(ApiError::Unauthorized);
    };

    let roles = state.store.get_roles_by_username(&user.username).await?;
    let pair = state
        .tokens
        .issue_token_pair(&user.username, roles, Utc::now())?;

    info!(username = %user.username, "tokens issued");
    Ok(Json(pair))
}

/// 계정 정보 조회.
///
/// GET /protected/account
#[utoipa::path(
    get,
    path = "/protected/account",
    request_body(content = UsernameRequest, description = "생략 시 인증된 사용자"),
    responses(
        (status = 200, description = "계정 정보", body = User),
        (status = 400, description = "잘못된 요청 또는 사용자 없음", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    OptionalJson(request): OptionalJson<UsernameRequest>,
) -> ApiResult<Json<User>> {
    let username = request.map_or(claims.username, |r| r.username);

    let user = state
        .store
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("찾을 수 없음: user {}", username)))?;

    Ok(Json(user))
}

/// 사용자 등록.
///
/// POST /protected/account_register
#[utoipa::path(
    post,
    path = "/protected/account_register",
    request_body = RegisterAccountRequest,
    responses(
        (status = 201, description = "등록 완료", body = String),
        (status = 400, description = "잘못된 요청 또는 중복 사용자명", body = ApiErrorResponse),
        (status = 500, description = "서버 오류", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
pub async fn register_account(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ValidatedJson(request): ValidatedJson<RegisterAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = request.username.clone();
    state
        .store
        .create_user(NewUser::new(request.username, request.email, request.password))
        .await?;

    info!(username = %username, registered_by = %claims.username, "user registered");
    Ok((StatusCode::CREATED, "User registered successfully"))
}
