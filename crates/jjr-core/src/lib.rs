//! # JJR Core
//!
//! 인증 백엔드의 핵심 도메인 모델과 저장소 계약을 제공합니다.
//!
//! - 사용자/역할 도메인 모델
//! - 자격증명 저장소 trait 및 메모리 구현
//! - Argon2 비밀번호 해싱
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod password;
pub mod store;

pub use config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig};
pub use domain::*;
pub use error::*;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use store::{
    check_store_health, CredentialStore, MemoryCredentialStore, RoleStore, UserStore,
};
