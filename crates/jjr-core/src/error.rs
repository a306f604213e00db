//! 인증 백엔드의 에러 타입.
//!
//! 자격증명 저장소와 설정 로딩에서 발생하는 에러를 정의합니다.
//! HTTP 상태 코드로의 변환은 API 계층에서 담당합니다.

use thiserror::Error;

/// 자격증명 저장소 에러.
///
/// 호출자가 원인을 구분할 수 있도록 충돌, 미존재, 저장소 장애를 분리합니다.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 고유 키 충돌 (중복 사용자명, 중복 역할명)
    #[error("이미 존재합니다: {0}")]
    Conflict(String),

    /// 참조 대상 없음 (역할 할당 시 사용자 또는 역할)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 저장소 장애 (호출자 책임이 아닌 실패)
    #[error("저장소 에러: {0}")]
    Unavailable(String),
}

/// 저장소 작업을 위한 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

/// 설정 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 설정 소스 로딩/역직렬화 실패
    #[error("설정 로딩 실패: {0}")]
    Load(#[from] config::ConfigError),

    /// 필수 값 누락 또는 잘못된 값
    #[error("잘못된 설정: {0}")]
    Invalid(String),
}
