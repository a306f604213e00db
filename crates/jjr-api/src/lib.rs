//! # JJR API
//!
//! 계정 등록, 로그인, JWT 발급/갱신, 역할 기반 접근 제어를 제공하는 REST API 서버.
//!
//! # 모듈
//!
//! - [`auth`]: Token Service 및 인증 게이트
//! - [`routes`]: HTTP 핸들러와 라우터
//! - [`repository`]: PostgreSQL 자격증명 저장소
//! - [`openapi`]: OpenAPI 문서
//! - [`error`]: 통합 에러 응답
//! - [`state`]: 공유 애플리케이션 상태

pub mod auth;
pub mod error;
pub mod extract;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{AccessClaims, JwtAuth, RefreshClaims, TokenError, TokenPair, TokenService};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use repository::PgCredentialStore;
pub use routes::create_api_router;
pub use state::AppState;
