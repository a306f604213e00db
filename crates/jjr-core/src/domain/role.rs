//! 역할 및 사용자-역할 할당 모델.

use serde::{Deserialize, Serialize};

/// 이름이 붙은 권한 그룹.
///
/// 사용자에게 할당되기 전까지는 어떤 사용자와도 독립적입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// 저장소가 부여한 고유 ID
    pub id: i64,
    /// 역할 이름 (고유)
    pub role_name: String,
}

/// 사용자-역할 연결 (다대다).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserRole {
    pub user_id: i64,
    pub role_id: i64,
}
