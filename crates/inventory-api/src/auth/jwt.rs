//! JWT 토큰 검증.
//!
//! 토큰은 외부 인증 서비스가 HS256으로 서명해 발급합니다.
//! 이 서비스는 검증만 수행하며, [`create_token`]은 테스트와 운영 도구용입니다.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::Role;

/// JWT 페이로드 (호출자 신원).
///
/// 요청 하나의 범위에서만 유효하며 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// 발급 서비스의 사용자 ID
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// 사용자 이메일
    pub email: String,
    /// 사용자 역할
    pub role: Role,
    /// 사용자 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued At (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `email` - 사용자 이메일
    /// * `role` - 사용자 역할
    /// * `expires_in_minutes` - 만료 시간 (분, 음수면 이미 만료된 토큰)
    pub fn new(email: impl Into<String>, role: Role, expires_in_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id: None,
            email: email.into(),
            role,
            name: None,
            iat: Some(now.timestamp()),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
        }
    }
}

/// 인증 실패.
///
/// 각 변형은 고정된 기계 판독용 코드에 대응합니다 ([`AuthError::code`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("인증 토큰이 필요합니다")]
    MissingCredential,
    #[error("토큰이 만료되었습니다")]
    ExpiredCredential,
    #[error("토큰 서명이 유효하지 않습니다")]
    InvalidSignature,
    #[error("유효하지 않은 토큰입니다")]
    MalformedCredential,
    #[error("관리자 권한이 필요합니다")]
    InsufficientRole,
}

impl AuthError {
    /// 기계 판독용 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "MISSING_TOKEN",
            AuthError::ExpiredCredential => "TOKEN_EXPIRED",
            AuthError::InvalidSignature => "INVALID_SIGNATURE",
            AuthError::MalformedCredential => "INVALID_TOKEN",
            AuthError::InsufficientRole => "INSUFFICIENT_ROLE",
        }
    }

    /// 인가(권한) 실패인지 여부. 인증 실패와 구분됩니다.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, AuthError::InsufficientRole)
    }
}

/// JWT 토큰 생성 에러.
#[derive(Debug, thiserror::Error)]
#[error("토큰 인코딩 실패: {0}")]
pub struct JwtEncodeError(#[from] jsonwebtoken::errors::Error);

/// HS256 Access Token 생성.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtEncodeError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtEncodeError::from)
}

/// 토큰 검증기.
///
/// 공유 비밀 키로 만든 `DecodingKey`와 HS256 전용 검증 규칙을 보관합니다.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl JwtVerifier {
    /// 공유 비밀 키로 검증기 생성.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// 토큰 디코딩 및 검증.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedCredential,
            })
    }

    /// Authorization 헤더 값을 검증하여 Claims 반환.
    ///
    /// `Bearer ` 접두사는 선택이며, 헤더가 없거나 비어 있으면 `MissingCredential`입니다.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = extract_token(header).ok_or(AuthError::MissingCredential)?;
        self.decode(token)
    }
}

/// Authorization 헤더에서 토큰 부분만 추출.
pub fn extract_token(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(TEST_SECRET)
    }

    #[test]
    fn test_create_and_decode_token() {
        let claims = Claims::new("ana@example.com", Role::Seller, 60);
        let token = create_token(&claims, TEST_SECRET).unwrap();

        let decoded = verifier().decode(&token).unwrap();
        assert_eq!(decoded.email, "ana@example.com");
        assert_eq!(decoded.role, Role::Seller);
    }

    #[test]
    fn test_bearer_prefix_optional() {
        let token = create_token(&Claims::new("a@b.c", Role::Administrator, 60), TEST_SECRET)
            .unwrap();

        let with_prefix = format!("Bearer {token}");
        let lowercase = format!("bearer {token}");
        assert!(verifier().authenticate(Some(&with_prefix)).is_ok());
        assert!(verifier().authenticate(Some(&lowercase)).is_ok());
        assert!(verifier().authenticate(Some(&token)).is_ok());
    }

    #[test]
    fn test_missing_credential() {
        assert_eq!(verifier().authenticate(None), Err(AuthError::MissingCredential));
        assert_eq!(verifier().authenticate(Some("")), Err(AuthError::MissingCredential));
        assert_eq!(verifier().authenticate(Some("Bearer ")), Err(AuthError::MissingCredential));
        assert_eq!(verifier().authenticate(Some("Bearer")), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_expired_token() {
        let claims = Claims::new("a@b.c", Role::Seller, -120);
        let token = create_token(&claims, TEST_SECRET).unwrap();
        assert_eq!(verifier().decode(&token), Err(AuthError::ExpiredCredential));
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let claims = Claims::new("a@b.c", Role::Seller, 60);
        let token =
            create_token(&claims, "wrong-secret-key-for-testing-minimum-32-chars").unwrap();
        assert_eq!(verifier().decode(&token), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert_eq!(
            verifier().decode("invalid.token.here"),
            Err(AuthError::MalformedCredential)
        );
        assert_eq!(verifier().decode("abc"), Err(AuthError::MalformedCredential));
    }

    #[test]
    fn test_other_algorithm_is_malformed() {
        let claims = Claims::new("a@b.c", Role::Administrator, 60);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(verifier().decode(&token), Err(AuthError::MalformedCredential));
    }

    #[test]
    fn test_unknown_role_is_malformed() {
        let payload = serde_json::json!({
            "email": "a@b.c",
            "role": "Superuser",
            "exp": Utc::now().timestamp() + 3600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(verifier().decode(&token), Err(AuthError::MalformedCredential));
    }

    #[test]
    fn test_missing_exp_is_malformed() {
        let payload = serde_json::json!({ "email": "a@b.c", "role": "Vendedor" });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(verifier().decode(&token), Err(AuthError::MalformedCredential));
    }

    #[test]
    fn test_issuer_payload_shape_accepted() {
        let payload = serde_json::json!({
            "userId": "65f1c0ffee",
            "email": "juan@ventas.com",
            "role": "Vendedor",
            "name": "Juan",
            "iat": Utc::now().timestamp(),
            "exp": Utc::now().timestamp() + 3600,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let claims = verifier().decode(&token).unwrap();
        assert_eq!(claims.user_id.as_deref(), Some("65f1c0ffee"));
        assert_eq!(claims.role, Role::Seller);
        assert_eq!(claims.name.as_deref(), Some("Juan"));
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            AuthError::MissingCredential,
            AuthError::ExpiredCredential,
            AuthError::InvalidSignature,
            AuthError::MalformedCredential,
            AuthError::InsufficientRole,
        ]
        .map(|e| e.code());
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
