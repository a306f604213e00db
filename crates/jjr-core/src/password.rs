//! 비밀번호 해싱 유틸리티.
//!
//! 저장소는 평문 비밀번호를 보관하지 않습니다. 사용자 생성 시 Argon2id로
//! 해싱하고, 자격증명 확인 시 저장된 PHC 문자열과 대조합니다.
//!
//! Argon2는 CPU-intensive 작업이므로 저장소 구현은 async 버전
//! ([`hash_password_blocking`], [`password_matches_blocking`])을 사용하여
//! Tokio worker thread를 블로킹하지 않습니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{StoreError, StoreResult};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 불일치")]
    Mismatch,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

impl From<PasswordError> for StoreError {
    fn from(err: PasswordError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// 비밀번호 해싱.
///
/// 솔트는 호출마다 새로 생성되므로 같은 비밀번호라도 해시가 다릅니다.
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (예: `$argon2id$v=19$m=19456,t=2,p=1$...`)
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 일치하면 `Ok(())`, 불일치하면 `Err(PasswordError::Mismatch)`.
/// 저장된 해시가 손상된 경우 `InvalidHashFormat`을 반환합니다.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::Mismatch)
}

/// 저장소용 비밀번호 대조.
///
/// 불일치는 `Ok(false)`로, 해시 손상은 저장소 에러로 구분합니다.
pub fn password_matches(password: &str, hash: &str) -> Result<bool, StoreError> {
    match verify_password(password, hash) {
        Ok(()) => Ok(true),
        Err(PasswordError::Mismatch) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// [`hash_password`]를 blocking thread pool에서 실행.
pub async fn hash_password_blocking(password: String) -> StoreResult<String> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| StoreError::Unavailable(format!("해싱 태스크 실행 실패: {}", e)))??;

    Ok(hash)
}

/// [`password_matches`]를 blocking thread pool에서 실행.
pub async fn password_matches_blocking(password: String, hash: String) -> StoreResult<bool> {
    tokio::task::spawn_blocking(move || password_matches(&password, &hash))
        .await
        .map_err(|e| StoreError::Unavailable(format!("검증 태스크 실행 실패: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("secret").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret", &hash).is_ok());
        assert!(matches!(
            verify_password("Secret", &hash),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let hash1 = hash_password("secret").unwrap();
        let hash2 = hash_password("secret").unwrap();

        // 솔트가 다르므로 해시도 다름
        assert_ne!(hash1, hash2);
        assert!(verify_password("secret", &hash1).is_ok());
        assert!(verify_password("secret", &hash2).is_ok());
    }

    #[test]
    fn test_password_matches_classifies_errors() {
        let hash = hash_password("secret").unwrap();

        assert!(password_matches("secret", &hash).unwrap());
        assert!(!password_matches("wrong", &hash).unwrap());
        assert!(matches!(
            password_matches("secret", "not-a-valid-hash"),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_blocking_variants_match_sync_behavior() {
        let hash = hash_password_blocking("secret".to_string()).await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(password_matches_blocking("secret".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!password_matches_blocking("wrong".to_string(), hash)
            .await
            .unwrap());
        assert!(matches!(
            password_matches_blocking("secret".to_string(), "broken".to_string()).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
