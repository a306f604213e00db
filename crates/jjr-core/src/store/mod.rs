//! 자격증명 저장소 추상화.
//!
//! 사용자, 역할, 사용자-역할 할당을 영속화하고 조회하는 인터페이스입니다.
//! 핸들러는 구체 구현이 아닌 [`CredentialStore`] trait 객체만 사용합니다.
//!
//! # 구현체
//!
//! - [`MemoryCredentialStore`]: 프로세스 내 저장소 (개발/테스트)
//! - `PgCredentialStore` (jjr-api): PostgreSQL 저장소
//!
//! # 동시성
//!
//! 충돌하는 키로 동시에 `create_user`/`create_role`/`assign_role_to_user`를
//! 호출하면 정확히 하나만 성공하고 나머지는 `Conflict`/`NotFound`로 실패해야 합니다.
//! 이 보장은 각 구현체가 책임집니다.

mod memory;

pub use memory::MemoryCredentialStore;

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{NewUser, User};
use crate::error::{StoreError, StoreResult};

/// 사용자 저장소.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자 생성.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict`: 사용자명이 이미 존재
    /// - `StoreError::Unavailable`: 저장소 장애
    async fn create_user(&self, user: NewUser) -> StoreResult<()>;

    /// 사용자명으로 조회.
    ///
    /// 일치하는 사용자가 없으면 에러가 아닌 `Ok(None)`을 반환합니다.
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// 자격증명 확인.
    ///
    /// 사용자가 존재하고 비밀번호가 일치할 때만 `Some(user)`를 반환합니다.
    /// 사용자 없음과 비밀번호 불일치는 모두 `Ok(None)`입니다.
    async fn verify_credentials(&self, username: &str, password: &str)
        -> StoreResult<Option<User>>;
}

/// 역할 저장소.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// 역할 생성.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict`: 역할명이 이미 존재
    async fn create_role(&self, role_name: &str) -> StoreResult<()>;

    /// 사용자에게 역할 할당.
    ///
    /// 이미 할당된 역할을 다시 할당하면 중복 없이 성공합니다 (멱등).
    /// 누락된 쪽을 암묵적으로 생성하지 않습니다.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound`: 사용자 또는 역할이 존재하지 않음
    async fn assign_role_to_user(&self, username: &str, role_name: &str) -> StoreResult<()>;

    /// 사용자의 역할 이름 목록 (오름차순).
    ///
    /// 역할이 없거나 사용자가 존재하지 않으면 빈 목록을 반환합니다.
    /// 두 경우를 구분하려면 [`UserStore::get_user_by_username`]을 함께 사용하세요.
    async fn get_roles_by_username(&self, username: &str) -> StoreResult<Vec<String>>;
}

/// 사용자 + 역할 저장소.
#[async_trait]
pub trait CredentialStore: UserStore + RoleStore {
    /// 저장소 연결 상태 확인.
    async fn ping(&self) -> StoreResult<()>;

    /// 로깅용 백엔드 이름.
    fn backend_name(&self) -> &'static str;
}

/// 제한 시간 내 저장소 연결 확인.
///
/// 시간 초과는 `StoreError::Unavailable`로 보고됩니다.
pub async fn check_store_health(store: &dyn CredentialStore, timeout: Duration) -> StoreResult<()> {
    match tokio::time::timeout(timeout, store.ping()).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Unavailable(format!(
            "{} ping timed out after {}ms",
            store.backend_name(),
            timeout.as_millis()
        ))),
    }
}
