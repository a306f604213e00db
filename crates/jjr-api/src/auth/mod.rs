//! 인증 및 권한 부여.
//!
//! JWT 기반 인증을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenService`]: Access/Refresh Token 발급 및 검증
//! - [`AccessClaims`], [`RefreshClaims`]: JWT 페이로드 구조체
//! - [`require_auth`]: 보호된 라우트용 인증 게이트
//! - [`JwtAuth`]: 검증된 페이로드 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(JwtAuth(claims): JwtAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.username)
//! }
//! ```

mod jwt;
mod middleware;

pub use jwt::{AccessClaims, RefreshClaims, TokenError, TokenKind, TokenPair, TokenService};
pub use middleware::{authenticate, bearer_token, require_auth, JwtAuth};
