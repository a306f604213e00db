//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! 스펙은 `/api-docs/openapi.json`에서 제공되며 `--export-openapi`로 내보낼 수 있습니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use jjr_core::User;

use crate::auth::TokenPair;
use crate::error::ApiErrorResponse;
use crate::routes::{
    account, health, refresh, roles, AssignRoleRequest, BannerResponse, ComponentStatus,
    HealthResponse, LoginRequest, RefreshRequest, RefreshResponse, RegisterAccountRequest,
    RegisterRoleRequest, UsernameRequest,
};

/// JJR API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "JJR Backend API",
        description = r#"
# JJR 인증 백엔드 REST API

사용자 등록, 로그인, JWT 발급/갱신, 역할 기반 접근 제어를 제공합니다.

## 인증

`/protected` 하위 엔드포인트는 JWT Bearer 토큰 인증이 필요합니다.
`Authorization: Bearer <token>` 헤더를 포함하세요.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "account", description = "계정 - 로그인, 토큰 갱신, 사용자 등록/조회"),
        (name = "roles", description = "역할 - 역할 생성, 할당, 조회")
    ),
    components(
        schemas(
            // ===== Health =====
            BannerResponse,
            HealthResponse,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,

            // ===== Account =====
            LoginRequest,
            TokenPair,
            UsernameRequest,
            RegisterAccountRequest,
            User,
            RefreshRequest,
            RefreshResponse,

            // ===== Roles =====
            RegisterRoleRequest,
            AssignRoleRequest,
        )
    ),
    paths(
        // ===== Health =====
        health::banner,
        health::health_check,
        health::health_ready,

        // ===== Account =====
        account::login,
        account::get_account,
        account::register_account,
        refresh::refresh,

        // ===== Roles =====
        roles::register_role,
        roles::assign_role,
        roles::list_roles,
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Bearer 인증 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI JSON 스펙.
///
/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        // 기본 정보 확인
        assert!(json.contains("JJR Backend API"));

        // 태그 확인
        assert!(json.contains("health"));
        assert!(json.contains("account"));
        assert!(json.contains("roles"));

        // 경로 확인
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/account"));
        assert!(json.contains("/refresh"));
        assert!(json.contains("/protected/account_register"));
        assert!(json.contains("/protected/roles_register"));
        assert!(json.contains("/protected/roles"));
    }

    #[test]
    fn test_openapi_contains_schemas_and_security() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("TokenPair"));
        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("RefreshResponse"));
        assert!(json.contains("bearer_auth"));
    }
}
