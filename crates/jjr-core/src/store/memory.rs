//! 프로세스 내 자격증명 저장소.
//!
//! 모든 테이블을 하나의 잠금으로 보호하므로 충돌하는 동시 쓰기는
//! 잠금 획득 순서대로 결정적으로 처리됩니다.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{CredentialStore, RoleStore, UserStore};
use crate::domain::{NewUser, Role, User, UserRole};
use crate::error::{StoreError, StoreResult};
use crate::password::{hash_password_blocking, password_matches_blocking};

/// 저장된 사용자 행 (해시 포함).
#[derive(Debug, Clone)]
struct UserRow {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, UserRow>,
    roles: HashMap<String, Role>,
    user_roles: HashSet<UserRole>,
    next_user_id: i64,
    next_role_id: i64,
}

impl Tables {
    fn role_names_for(&self, user_id: i64) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .roles
            .values()
            .filter(|role| {
                self.user_roles.contains(&UserRole {
                    user_id,
                    role_id: role.id,
                })
            })
            .map(|role| role.role_name.as_str())
            .collect();

        names.into_iter().map(str::to_string).collect()
    }
}

/// 메모리 기반 [`CredentialStore`].
///
/// DB 없이 서버를 띄우거나 테스트할 때 사용합니다. 프로세스 종료 시 데이터는 사라집니다.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    tables: RwLock<Tables>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryCredentialStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<()> {
        // 해싱은 잠금 밖에서 수행
        let password_hash = hash_password_blocking(user.password).await?;

        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.username) {
            return Err(StoreError::Conflict(format!("username {}", user.username)));
        }

        tables.next_user_id += 1;
        let record = User {
            id: tables.next_user_id,
            username: user.username.clone(),
            email: user.email,
            created_at: Utc::now(),
        };
        debug!(user_id = record.id, username = %record.username, "user created");
        tables.users.insert(
            user.username,
            UserRow {
                user: record,
                password_hash,
            },
        );

        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(username).map(|row| row.user.clone()))
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> StoreResult<Option<User>> {
        let row = {
            let tables = self.tables.read().await;
            tables.users.get(username).cloned()
        };

        let Some(row) = row else {
            return Ok(None);
        };

        if password_matches_blocking(password.to_string(), row.password_hash).await? {
            Ok(Some(row.user))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl RoleStore for MemoryCredentialStore {
    async fn create_role(&self, role_name: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.roles.contains_key(role_name) {
            return Err(StoreError::Conflict(format!("role {}", role_name)));
        }

        tables.next_role_id += 1;
        let role = Role {
            id: tables.next_role_id,
            role_name: role_name.to_string(),
        };
        tables.roles.insert(role_name.to_string(), role);

        Ok(())
    }

    async fn assign_role_to_user(&self, username: &str, role_name: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let user_id = tables
            .users
            .get(username)
            .map(|row| row.user.id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", username)))?;
        let role_id = tables
            .roles
            .get(role_name)
            .map(|role| role.id)
            .ok_or_else(|| StoreError::NotFound(format!("role {}", role_name)))?;

        if !tables.user_roles.insert(UserRole { user_id, role_id }) {
            debug!(username, role_name, "role already assigned");
        }

        Ok(())
    }

    async fn get_roles_by_username(&self, username: &str) -> StoreResult<Vec<String>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .get(username)
            .map(|row| tables.role_names_for(row.user.id))
            .unwrap_or_default())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
