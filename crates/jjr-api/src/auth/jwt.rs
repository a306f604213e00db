//! JWT 토큰 처리.
//!
//! Access Token 및 Refresh Token 생성/검증 로직.
//! 만료 판정은 라이브러리가 아닌 호출자가 넘긴 `now`를 기준으로 수행하므로
//! 동일한 입력에 대해 항상 같은 결과를 냅니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use jjr_core::{AuthConfig, ConfigError};

/// 토큰 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Access Token 페이로드.
///
/// 사용자 이름과 발급 시점의 역할 목록을 포함합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// 사용자 이름
    pub username: String,
    /// 사용자 역할
    pub roles: Vec<String>,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// 토큰 종류 (항상 access)
    pub token_type: TokenKind,
    /// JWT ID - 토큰 고유 식별자
    pub jti: String,
}

/// Refresh Token 페이로드.
///
/// 역할을 담지 않습니다. 갱신 시 저장소에서 역할을 다시 조회합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// 사용자 이름
    pub username: String,
    /// Issued At
    pub iat: i64,
    /// Expiration
    pub exp: i64,
    /// 토큰 종류 (항상 refresh)
    pub token_type: TokenKind,
    /// JWT ID
    pub jti: String,
}

/// 검증 대상 페이로드 공통 속성.
trait TokenClaims: DeserializeOwned {
    const KIND: TokenKind;

    fn kind(&self) -> TokenKind;
    fn expires_at(&self) -> i64;
}

impl TokenClaims for AccessClaims {
    const KIND: TokenKind = TokenKind::Access;

    fn kind(&self) -> TokenKind {
        self.token_type
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl TokenClaims for RefreshClaims {
    const KIND: TokenKind = TokenKind::Refresh;

    fn kind(&self) -> TokenKind {
        self.token_type
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Access Token + Refresh Token 페어.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    /// Access Token
    pub access_token: String,
    /// Refresh Token
    pub refresh_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// Access Token 만료 시간 (초)
    pub expires_in: i64,
}

/// JWT 토큰 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("서명이 일치하지 않습니다")]
    BadSignature,
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(String),
}

/// 토큰 발급/검증 서비스.
///
/// 서명 키는 생성 시 한 번만 만들어지고 이후 변경되지 않습니다.
/// 상태가 없으므로 여러 요청에서 동시에 사용해도 안전합니다.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// 비밀 키와 수명(초)으로 서비스 생성.
    ///
    /// # Errors
    ///
    /// 비밀 키가 비어 있거나 수명이 0 이하이면 `ConfigError::Invalid`.
    pub fn new(
        secret: &SecretString,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Result<Self, ConfigError> {
        let secret = secret.expose_secret();
        if secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT 서명 키가 비어 있습니다".to_string()));
        }
        if access_ttl_secs <= 0 || refresh_ttl_secs <= 0 {
            return Err(ConfigError::Invalid(format!(
                "토큰 수명은 양수여야 합니다: access={}, refresh={}",
                access_ttl_secs, refresh_ttl_secs
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 호출자의 now 기준으로 직접 판정
        validation.validate_exp = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        })
    }

    /// 토큰 설정에서 생성.
    pub fn from_config(auth: &AuthConfig) -> Result<Self, ConfigError> {
        auth.validate()?;
        Self::new(auth.jwt_secret(), auth.access_ttl_secs, auth.refresh_ttl_secs)
    }

    /// Access Token 수명 (초).
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Access Token 페이로드 생성 (`iat = now`, `exp = now + accessTTL`).
    pub fn access_claims(
        &self,
        username: &str,
        roles: Vec<String>,
        now: DateTime<Utc>,
    ) -> AccessClaims {
        AccessClaims {
            username: username.to_string(),
            roles,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
            token_type: TokenKind::Access,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Refresh Token 페이로드 생성 (`iat = now`, `exp = now + refreshTTL`).
    pub fn refresh_claims(&self, username: &str, now: DateTime<Utc>) -> RefreshClaims {
        RefreshClaims {
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
            token_type: TokenKind::Refresh,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 페이로드를 HS256으로 서명.
    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Access Token 발급.
    pub fn issue_access_token(
        &self,
        username: &str,
        roles: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.sign(&self.access_claims(username, roles, now))
    }

    /// Refresh Token 발급.
    pub fn issue_refresh_token(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.sign(&self.refresh_claims(username, now))
    }

    /// Access Token + Refresh Token 쌍 발급.
    pub fn issue_token_pair(
        &self,
        username: &str,
        roles: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(username, roles, now)?,
            refresh_token: self.issue_refresh_token(username, now)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl_secs(),
        })
    }

    /// Access Token 검증.
    ///
    /// # Errors
    ///
    /// - `BadSignature`: 다른 키로 서명되었거나 변조됨
    /// - `Malformed`: 디코딩 불가, 필수 필드 누락, Refresh Token을 넘긴 경우
    /// - `Expired`: `now >= exp`
    pub fn verify_access(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        self.verify(token, now)
    }

    /// Refresh Token 검증.
    pub fn verify_refresh(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshClaims, TokenError> {
        self.verify(token, now)
    }

    fn verify<C: TokenClaims>(&self, token: &str, now: DateTime<Utc>) -> Result<C, TokenError> {
        let data = decode::<C>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                _ => TokenError::Malformed,
            }
        })?;

        let claims = data.claims;
        if claims.kind() != C::KIND {
            return Err(TokenError::Malformed);
        }
        if now.timestamp() >= claims.expires_at() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl_secs", &self.access_ttl.num_seconds())
            .field("refresh_ttl_secs", &self.refresh_ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::from(secret.to_string()), 60, 7 * 24 * 3600).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_rejects_empty_secret() {
        let result = TokenService::new(&SecretString::from(String::new()), 60, 3600);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        assert!(TokenService::new(&SecretString::from("k".to_string()), 0, 3600).is_err());
        assert!(TokenService::new(&SecretString::from("k".to_string()), 60, -5).is_err());
    }

    #[test]
    fn test_from_config() {
        let auth = AuthConfig::new("config-secret", 120, 3600);
        let tokens = TokenService::from_config(&auth).unwrap();
        assert_eq!(tokens.access_ttl_secs(), 120);

        assert!(TokenService::from_config(&AuthConfig::new("", 120, 3600)).is_err());
    }

    #[test]
    fn test_access_roundtrip_returns_same_claims() {
        let tokens = service("secret");
        let now = fixed_now();
        let claims = tokens.access_claims("alice", vec!["admin".to_string()], now);

        assert!(claims.iat <= claims.exp);
        assert_eq!(claims.exp - claims.iat, 60);

        let token = tokens.sign(&claims).unwrap();
        let verified = tokens.verify_access(&token, now).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn test_refresh_roundtrip_has_no_roles() {
        let tokens = service("secret");
        let now = fixed_now();
        let token = tokens.issue_refresh_token("alice", now).unwrap();

        let claims = tokens.verify_refresh(&token, now).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
        assert_eq!(claims.token_type, TokenKind::Refresh);
    }

    #[test]
    fn test_expiry_boundary() {
        let tokens = service("secret");
        let now = fixed_now();
        let token = tokens.issue_access_token("alice", vec![], now).unwrap();

        let just_before = now + Duration::seconds(59);
        assert!(tokens.verify_access(&token, just_before).is_ok());

        let at_exp = now + Duration::seconds(60);
        assert_eq!(tokens.verify_access(&token, at_exp), Err(TokenError::Expired));

        let after = now + Duration::seconds(61);
        assert_eq!(tokens.verify_access(&token, after), Err(TokenError::Expired));
    }

    #[test]
    fn test_refresh_expiry_boundary() {
        let tokens = service("secret");
        let now = fixed_now();
        let token = tokens.issue_refresh_token("alice", now).unwrap();
        let ttl = Duration::days(7);

        let just_before = now + ttl - Duration::seconds(1);
        assert!(tokens.verify_refresh(&token, just_before).is_ok());

        let at_exp = now + ttl;
        assert_eq!(
            tokens.verify_refresh(&token, at_exp).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_wrong_secret_is_bad_signature_even_when_expired() {
        let issuer = service("secret-a");
        let verifier = service("secret-b");
        let now = fixed_now();
        let token = issuer.issue_access_token("alice", vec![], now).unwrap();

        let long_after = now + Duration::days(30);
        assert_eq!(
            verifier.verify_access(&token, long_after),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let tokens = service("secret");
        let now = fixed_now();
        let token = tokens
            .issue_access_token("alice", vec!["viewer".to_string()], now)
            .unwrap();
        let forged_claims = tokens.access_claims("alice", vec!["admin".to_string()], now);
        let forged = tokens.sign(&forged_claims).unwrap();

        // 원본 헤더/서명 + 위조된 페이로드
        let original: Vec<&str> = token.split('.').collect();
        let forged: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", original[0], forged[1], original[2]);

        assert_eq!(
            tokens.verify_access(&spliced, now),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tokens = service("secret");
        for token in ["", "abc", "a.b.c", "not-a-jwt.at.all"] {
            assert_eq!(
                tokens.verify_access(token, fixed_now()),
                Err(TokenError::Malformed),
                "token: {token:?}"
            );
        }
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let tokens = service("secret");
        let partial = serde_json::json!({ "username": "alice", "exp": 4_000_000_000i64 });
        let token = tokens.sign(&partial).unwrap();

        assert_eq!(
            tokens.verify_access(&token, fixed_now()),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let tokens = service("secret");
        let now = fixed_now();
        let pair = tokens
            .issue_token_pair("alice", vec!["admin".to_string()], now)
            .unwrap();

        assert_eq!(
            tokens.verify_access(&pair.refresh_token, now),
            Err(TokenError::Malformed)
        );
        assert_eq!(
            tokens.verify_refresh(&pair.access_token, now),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_token_pair_shape() {
        let tokens = service("secret");
        let pair = tokens.issue_token_pair("alice", vec![], fixed_now()).unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 60);
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", service("very-secret-key"));
        assert!(!debug.contains("very-secret-key"));
    }

    proptest! {
        #[test]
        fn prop_issue_then_verify_before_exp(
            username in "[a-zA-Z0-9_]{1,24}",
            roles in proptest::collection::vec("[a-z]{1,12}", 0..5),
            offset in 0i64..60,
        ) {
            let tokens = service("prop-secret");
            let now = fixed_now();
            let claims = tokens.access_claims(&username, roles, now);
            let token = tokens.sign(&claims).unwrap();

            let verified = tokens.verify_access(&token, now + Duration::seconds(offset)).unwrap();
            prop_assert_eq!(verified, claims);
        }

        #[test]
        fn prop_foreign_secret_always_bad_signature(
            secret_a in "[a-z]{8,16}",
            secret_b in "[A-Z]{8,16}",
            offset in -100_000i64..100_000,
        ) {
            let issuer = service(&secret_a);
            let verifier = service(&secret_b);
            let now = fixed_now();
            let token = issuer.issue_access_token("alice", vec![], now).unwrap();

            prop_assert_eq!(
                verifier.verify_access(&token, now + Duration::seconds(offset)),
                Err(TokenError::BadSignature)
            );
        }
    }
}
