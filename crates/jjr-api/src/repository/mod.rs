//! PostgreSQL 자격증명 저장소.
//!
//! - [`users`]: 사용자 생성, 조회, 자격증명 확인
//! - [`roles`]: 역할 생성, 할당, 조회
//!
//! 고유 제약 위반은 `StoreError::Conflict`로, 그 외 DB 에러는
//! `StoreError::Unavailable`로 변환됩니다.

mod roles;
mod users;

use async_trait::async_trait;
use sqlx::PgPool;

use jjr_core::{CredentialStore, StoreError, StoreResult};

/// 스키마 생성 SQL.
const SCHEMA_SQL: &str = include_str!("../../migrations/0001_create_auth_tables.sql");

/// PostgreSQL 기반 [`CredentialStore`].
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 테이블이 없으면 생성합니다.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// 고유 제약 위반이면 `Conflict`, 아니면 `Unavailable`.
fn conflict_or_unavailable(err: sqlx::Error, what: impl FnOnce() -> String) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(what());
        }
    }
    unavailable(err)
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}
