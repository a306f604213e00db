//! 사용자 계정 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 저장된 사용자 계정.
///
/// 비밀번호(해시)는 저장소 내부에만 존재하며 이 타입에는 포함되지 않습니다.
/// 따라서 그대로 직렬화해도 자격증명이 노출되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct User {
    /// 저장소가 부여한 고유 ID
    pub id: i64,
    /// 사용자 이름 (고유, 대소문자 구분)
    pub username: String,
    /// 이메일
    pub email: String,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
}

/// 신규 사용자 입력.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// 평문 비밀번호 (저장 시 해싱됨)
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_debug_redacts_password() {
        let user = NewUser::new("alice", "alice@example.com", "secret");
        let debug = format!("{:?}", user);

        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_user_serialization_has_no_password() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["username"], "alice");
        assert!(json.get("password").is_none());
        assert!(json.get("created_at").is_some());
    }
}
