//! 헬스 체크 endpoint.
//!
//! 로드밸런서나 오케스트레이션 시스템(Kubernetes 등)에서 사용됩니다.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use jjr_core::check_store_health;

use crate::state::AppState;

/// 서비스 배너 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BannerResponse {
    pub message: String,
}

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "unhealthy")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 저장소 상태
    pub store: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down")
    pub status: String,

    /// 백엔드 이름 ("postgres" | "memory")
    pub backend: String,

    /// 추가 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// 정상 상태.
    pub fn up(backend: &str) -> Self {
        Self {
            status: "up".to_string(),
            backend: backend.to_string(),
            message: None,
        }
    }

    /// 비정상 상태.
    pub fn down(backend: &str, message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            backend: backend.to_string(),
            message: Some(message.into()),
        }
    }
}

/// 서비스 배너.
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "서비스 이름", body = BannerResponse)),
    tag = "health"
)]
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "JJR Backend".to_string(),
    })
}

/// 간단한 헬스 체크 (liveness probe용).
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "서버 응답 가능", body = String)),
    tag = "health"
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 상세 헬스 체크 (readiness probe용).
///
/// 저장소 ping이 제한 시간 내 성공해야 200입니다.
/// GET /health/ready
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "저장소 연결 정상", body = HealthResponse),
        (status = 503, description = "저장소 연결 실패", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let backend = state.store.backend_name();

    let (status_code, overall, store) =
        match check_store_health(state.store.as_ref(), state.health_timeout).await {
            Ok(()) => (StatusCode::OK, "healthy", ComponentStatus::up(backend)),
            Err(e) => {
                warn!(backend, error = %e, "store health check failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unhealthy",
                    ComponentStatus::down(backend, "연결 실패"),
                )
            }
        };

    let response = HealthResponse {
        status: overall.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        store,
    };

    (status_code, Json(response))
}
