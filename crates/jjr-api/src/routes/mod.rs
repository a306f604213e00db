//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 서비스 배너
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `POST /account` - 로그인 (토큰 발급)
//! - `POST /refresh` - Access Token 갱신
//! - `/api-docs/openapi.json` - OpenAPI 스펙
//! - `/protected/*` - Bearer 토큰 필요
//!   - `GET /protected/account` - 계정 조회
//!   - `POST /protected/account_register` - 사용자 등록
//!   - `POST /protected/roles_register` - 역할 생성
//!   - `POST /protected/roles` - 역할 할당
//!   - `GET /protected/roles` - 역할 목록

pub mod account;
pub mod health;
pub mod refresh;
pub mod roles;

pub use account::{LoginRequest, RegisterAccountRequest, UsernameRequest};
pub use health::{BannerResponse, ComponentStatus, HealthResponse};
pub use refresh::{RefreshRequest, RefreshResponse};
pub use roles::{AssignRoleRequest, RegisterRoleRequest};

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_auth;
use crate::openapi::openapi_json;
use crate::state::AppState;

/// 인증이 필요한 라우트.
///
/// 게이트는 `route_layer`로 적용되므로 매칭된 라우트에만 실행됩니다.
fn protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/account", get(account::get_account))
        .route("/account_register", post(account::register_account))
        .route("/roles_register", post(roles::register_role))
        .route("/roles", get(roles::list_roles).post(roles::assign_role))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// 전체 API 라우터 생성.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::health_ready))
        .route("/account", post(account::login))
        .route("/refresh", post(refresh::refresh))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/protected", protected_router(state.clone()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Method, Request, StatusCode},
    };
    use chrono::Utc;
    use jjr_core::{MemoryCredentialStore, NewUser, UserStore};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use crate::auth::TokenService;

    async fn test_state() -> Arc<AppState> {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .create_user(NewUser::new("alice", "alice@example.com", "secret"))
            .await
            .unwrap();
        let tokens =
            TokenService::new(&SecretString::from("route-secret".to_string()), 60, 3600).unwrap();
        Arc::new(AppState::new(store, tokens))
    }

    fn bearer(state: &AppState) -> String {
        let token = state
            .tokens
            .issue_access_token("alice", vec![], Utc::now())
            .unwrap();
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn test_banner_and_health() {
        let app = create_api_router(test_state().await);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let banner: BannerResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(banner.message, "JJR Backend");

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.store.backend, "memory");
    }

    #[tokio::test]
    async fn test_every_protected_route_requires_token() {
        let app = create_api_router(test_state().await);
        let routes = [
            (Method::GET, "/protected/account"),
            (Method::POST, "/protected/account_register"),
            (Method::POST, "/protected/roles_register"),
            (Method::POST, "/protected/roles"),
            (Method::GET, "/protected/roles"),
        ];

        for (method, uri) in routes {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method.clone())
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_get_account_defaults_to_principal() {
        let state = test_state().await;
        let auth = bearer(&state);
        let app = create_api_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected/account")
                    .header(AUTHORIZATION, auth)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["email"], "alice@example.com");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_account_is_400() {
        let state = test_state().await;
        let auth = bearer(&state);
        let app = create_api_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/protected/account_register")
                    .header(AUTHORIZATION, auth)
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"username":"alice","email":"a@example.com","password":"x"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_openapi_json_is_served() {
        let app = create_api_router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
