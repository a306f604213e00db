//! 역할 및 사용자-역할 할당 테이블 접근.

use async_trait::async_trait;
use tracing::debug;

use jjr_core::{RoleStore, StoreError, StoreResult};

use super::{conflict_or_unavailable, unavailable, PgCredentialStore};

#[async_trait]
impl RoleStore for PgCredentialStore {
    async fn create_role(&self, role_name: &str) -> StoreResult<()> {
        sqlx::query("INSERT INTO roles (role_name) VALUES ($1)")
            .bind(role_name)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or_unavailable(e, || format!("role {}", role_name)))?;

        Ok(())
    }

    async fn assign_role_to_user(&self, username: &str, role_name: &str) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        // 행 잠금으로 할당 도중 삭제를 막음
        let user_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE username = $1 FOR SHARE")
                .bind(username)
                .fetch_optional(&mut *tx)
                .await
                .map_err(unavailable)?;
        let user_id = user_id.ok_or_else(|| StoreError::NotFound(format!("user {}", username)))?;

        let role_id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM roles WHERE role_name = $1 FOR SHARE")
                .bind(role_name)
                .fetch_optional(&mut *tx)
                .await
                .map_err(unavailable)?;
        let role_id =
            role_id.ok_or_else(|| StoreError::NotFound(format!("role {}", role_name)))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&mut *tx)
        .await
        .map_err(unavailable)?;

        tx.commit().await.map_err(unavailable)?;

        if inserted.rows_affected() == 0 {
            debug!(username, role_name, "role already assigned");
        }
        Ok(())
    }

    async fn get_roles_by_username(&self, username: &str) -> StoreResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.role_name
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            JOIN users u ON u.id = ur.user_id
            WHERE u.username = $1
            ORDER BY r.role_name
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)
    }
}
