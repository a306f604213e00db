//! 요청 본문 추출기.
//!
//! 본문 파싱/검증 실패는 모두 400 `INVALID_INPUT`으로 응답합니다.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// JSON 본문을 역직렬화하고 `validator` 규칙을 적용합니다.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        value.validate().map_err(invalid_fields)?;
        Ok(Self(value))
    }
}

/// 비어 있을 수 있는 JSON 본문.
///
/// 본문이 없거나 공백뿐이면 `None`입니다. `Content-Type`은 확인하지 않습니다.
#[derive(Debug, Clone)]
pub struct OptionalJson<T>(pub Option<T>);

impl<S, T> FromRequest<S> for OptionalJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Validation(format!("잘못된 JSON 본문: {}", e)))?;
        value.validate().map_err(invalid_fields)?;

        Ok(Self(Some(value)))
    }
}

/// 검증 실패 필드 목록을 메시지로 변환.
fn invalid_fields(errors: ValidationErrors) -> ApiError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();

    ApiError::Validation(format!("필수 항목이 비어 있습니다: {}", fields.join(", ")))
}
