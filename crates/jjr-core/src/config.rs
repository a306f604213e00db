//! 설정 관리.
//!
//! 설정은 다음 순서로 병합됩니다 (뒤가 우선):
//!
//! 1. 내장 기본값
//! 2. `config/default.toml` (있는 경우)
//! 3. `JJR__` 접두사 환경 변수 (예: `JJR__SERVER__PORT=8080`)
//! 4. 기존 배포 호환 환경 변수: `JWT_KEY`, `DATABASE_URL`, `API_HOST`, `API_PORT`

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ConfigError;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Access Token 기본 수명 (초).
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 60;

/// Refresh Token 기본 수명 (초, 7일).
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 토큰 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 전체 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL (없으면 메모리 저장소 사용)
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
    /// 헬스 체크 ping 타임아웃 (밀리초)
    pub health_timeout_ms: u64,
}

/// 토큰 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 서명 비밀 키 (HS256)
    #[serde(default)]
    jwt_secret: SecretString,
    /// Access Token 수명 (초)
    pub access_ttl_secs: i64,
    /// Refresh Token 수명 (초)
    pub refresh_ttl_secs: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            jwt_secret: SecretString::from(jwt_secret.into()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// 서명 비밀 키.
    pub fn jwt_secret(&self) -> &SecretString {
        &self.jwt_secret
    }

    /// 토큰 발급 전 필수 조건 검증.
    ///
    /// 비밀 키가 비어 있거나 수명이 0 이하이면 에러입니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid(
                "JWT 서명 키가 설정되지 않았습니다 (JWT_KEY 또는 JJR__AUTH__JWT_SECRET)".to_string(),
            ));
        }
        if self.access_ttl_secs <= 0 {
            return Err(ConfigError::Invalid(format!(
                "access_ttl_secs는 양수여야 합니다: {}",
                self.access_ttl_secs
            )));
        }
        if self.refresh_ttl_secs <= 0 {
            return Err(ConfigError::Invalid(format!(
                "refresh_ttl_secs는 양수여야 합니다: {}",
                self.refresh_ttl_secs
            )));
        }
        Ok(())
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨 필터
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 에러가 아닙니다. 로드 후 [`AuthConfig::validate`]를 수행합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.connect_timeout_secs", 10)?
            .set_default("database.health_timeout_ms", 1000)?
            .set_default("auth.access_ttl_secs", DEFAULT_ACCESS_TTL_SECS)?
            .set_default("auth.refresh_ttl_secs", DEFAULT_REFRESH_TTL_SECS)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("JJR")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("auth.jwt_secret", std::env::var("JWT_KEY").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("server.host", std::env::var("API_HOST").ok())?
            .set_override_option(
                "server.port",
                std::env::var("API_PORT").ok().and_then(|p| p.parse::<i64>().ok()),
            )?;

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.auth.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(DEFAULT_CONFIG_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_rejects_empty_secret() {
        let auth = AuthConfig::new("", 60, 3600);
        assert!(matches!(auth.validate(), Err(ConfigError::Invalid(_))));

        let blank = AuthConfig::new("   ", 60, 3600);
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_auth_config_rejects_non_positive_ttl() {
        assert!(AuthConfig::new("secret", 0, 3600).validate().is_err());
        assert!(AuthConfig::new("secret", 60, -1).validate().is_err());
        assert!(AuthConfig::new("secret", 60, 3600).validate().is_ok());
    }

    #[test]
    fn test_auth_config_debug_redacts_secret() {
        let auth = AuthConfig::new("super-secret-value", 60, 3600);
        let debug = format!("{:?}", auth);

        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("REDACTED"));
        assert_eq!(auth.jwt_secret().expose_secret(), "super-secret-value");
    }

    #[test]
    fn test_bind_address() {
        let server = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            request_timeout_secs: 30,
        };
        assert_eq!(server.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_default_ttls() {
        assert_eq!(DEFAULT_ACCESS_TTL_SECS, 60);
        assert_eq!(DEFAULT_REFRESH_TTL_SECS, 604_800);
    }
}
