//! Axum용 JWT 인증 게이트.
//!
//! `/protected` 하위 라우트는 [`require_auth`]를 `route_layer`로 거칩니다.
//! 게이트는 저장소를 조회하지 않으며, 통과한 요청에는 검증된
//! [`AccessClaims`]가 extension으로 첨부됩니다.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{AccessClaims, TokenService};
use crate::error::ApiError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authorization 헤더에서 토큰 추출.
///
/// `Bearer ` 접두사는 있으면 제거합니다. 헤더가 없거나 비어 있으면 `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// 요청 헤더를 검증하여 Access Token 페이로드를 반환.
///
/// 토큰이 없으면 Token Service를 호출하지 않습니다.
/// 실패 사유는 로그에만 남고 응답은 항상 `ApiError::Unauthorized`입니다.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
    now: DateTime<Utc>,
) -> Result<AccessClaims, ApiError> {
    let Some(token) = bearer_token(headers) else {
        debug!("missing bearer token");
        return Err(ApiError::Unauthorized);
    };

    tokens.verify_access(token, now).map_err(ApiError::from)
}

/// 보호된 라우트용 인증 미들웨어.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(request.headers(), &state.tokens, Utc::now())?;
    debug!(username = %claims.username, "request admitted");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// JWT 인증 추출기.
///
/// 게이트가 첨부한 페이로드를 꺼냅니다. 게이트 밖에서 사용되면 헤더를 직접 검증합니다.
///
/// ```rust,ignore
/// async fn handler(JwtAuth(claims): JwtAuth) -> String {
///     claims.username
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub AccessClaims);

impl FromRequestParts<Arc<AppState>> for JwtAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<AccessClaims>() {
            return Ok(JwtAuth(claims.clone()));
        }

        authenticate(&parts.headers, &state.tokens, Utc::now()).map(JwtAuth)
    }
}
