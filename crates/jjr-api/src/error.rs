//! 통합 API 에러 응답 타입.
//!
//! 모든 핸들러는 [`ApiError`]를 반환하며, 응답 본문은 항상
//! `{"code": ..., "message": ...}` 형식입니다. 내부 에러 상세는 로그로만 남고
//! 클라이언트에는 전달되지 않습니다.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use jjr_core::StoreError;

use crate::auth::TokenError;

/// 인증 실패 시 클라이언트에 전달하는 유일한 메시지.
pub const UNAUTHORIZED_MESSAGE: &str = "인증 정보가 유효하지 않거나 만료되었습니다";

/// API 에러 응답 본문.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "찾을 수 없음: role editor"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_INPUT", "UNAUTHORIZED", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 핸들러 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 요청 본문 누락/형식 오류
    #[error("{0}")]
    Validation(String),

    /// 자격증명 불일치, 토큰 누락/위조/만료
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    /// 중복 사용자명/역할명
    #[error("{0}")]
    Conflict(String),

    /// 역할 할당 대상 누락
    #[error("{0}")]
    NotFound(String),

    /// 호출자 책임이 아닌 실패
    #[error("서버 내부 오류가 발생했습니다")]
    Internal,
}

impl ApiError {
    /// HTTP 상태 코드와 에러 코드.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Conflict(_) => (StatusCode::BAD_REQUEST, "ALREADY_EXISTS"),
            ApiError::NotFound(_) => (StatusCode::BAD_REQUEST, "NOT_FOUND"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        (status, Json(ApiErrorResponse::new(code, self.to_string()))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ApiError::Conflict(err.to_string()),
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            StoreError::Unavailable(detail) => {
                error!(error = %detail, "credential store failure");
                ApiError::Internal
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encoding(detail) => {
                error!(error = %detail, "token signing failed");
                ApiError::Internal
            }
            other => {
                warn!(reason = %other, "token rejected");
                ApiError::Unauthorized
            }
        }
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, ApiErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (status, body) = body_of(ApiError::Validation("username: 필수".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_INPUT");

        let (status, body) = body_of(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.message, UNAUTHORIZED_MESSAGE);

        let (status, body) = body_of(ApiError::Internal).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_store_error_never_leaks_detail() {
        let err = ApiError::from(StoreError::Unavailable(
            "connection refused: postgres://user:pw@db".into(),
        ));
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.message.contains("postgres"));
    }

    #[tokio::test]
    async fn test_client_store_errors_are_400() {
        let (status, body) = body_of(StoreError::Conflict("role admin".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "ALREADY_EXISTS");

        let (status, body) = body_of(StoreError::NotFound("user bob".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[test]
    fn test_token_errors_are_undifferentiated() {
        for err in [TokenError::BadSignature, TokenError::Malformed, TokenError::Expired] {
            let api: ApiError = err.into();
            assert!(matches!(api, ApiError::Unauthorized));
            assert_eq!(api.to_string(), UNAUTHORIZED_MESSAGE);
        }

        let api: ApiError = TokenError::Encoding("boom".into()).into();
        assert!(matches!(api, ApiError::Internal));
    }
}
