//! 사용자 테이블 접근.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use jjr_core::password::{hash_password_blocking, password_matches_blocking};
use jjr_core::{NewUser, StoreResult, User, UserStore};

use super::{conflict_or_unavailable, unavailable, PgCredentialStore};

/// users 테이블 행 (비밀번호 해시 제외).
#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: i64,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            username: record.username,
            email: record.email,
            created_at: record.created_at,
        }
    }
}

/// 자격증명 확인용 행.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRecord {
    #[sqlx(flatten)]
    user: UserRecord,
    password_hash: String,
}

#[async_trait]
impl UserStore for PgCredentialStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<()> {
        let password_hash = hash_password_blocking(user.password).await?;

        sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_unavailable(e, || format!("username {}", user.username)))?;

        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(record.map(User::from))
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> StoreResult<Option<User>> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            r#"
            SELECT id, username, email, created_at, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        let Some(record) = record else {
            return Ok(None);
        };

        if password_matches_blocking(password.to_string(), record.password_hash).await? {
            Ok(Some(record.user.into()))
        } else {
            Ok(None)
        }
    }
}
