//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 시작 시 한 번 구성되어 `Arc<AppState>`로 모든 요청에 주입됩니다.
//! 서명 키와 저장소 핸들은 전역 변수가 아닌 이 구조체를 통해서만 접근합니다.

use std::sync::Arc;
use std::time::Duration;

use jjr_core::CredentialStore;

use crate::auth::TokenService;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 자격증명 저장소 (PostgreSQL 또는 메모리)
    pub store: Arc<dyn CredentialStore>,

    /// 토큰 발급/검증 서비스
    pub tokens: Arc<TokenService>,

    /// 저장소 ping 제한 시간
    pub health_timeout: Duration,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenService) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            health_timeout: Duration::from_millis(1000),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 저장소 ping 제한 시간 설정.
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_name())
            .field("tokens", &self.tokens)
            .field("version", &self.version)
            .finish()
    }
}
