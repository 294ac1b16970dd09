//! Axum용 JWT 인증 추출기.
//!
//! 검증기는 애플리케이션 상태에서 가져오며, 환경 변수나 기본 키로 대체하지 않습니다.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use super::{AuthError, Claims, JwtVerifier, Permission};
use crate::metrics::record_auth_failure;

/// 유효한 토큰을 요구하는 추출기.
///
/// 역할과 무관하게 인증만 확인합니다.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    JwtVerifier: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = JwtVerifier::from_ref(state);

        // 비 UTF-8 헤더는 형식 오류로 취급
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                reject(parts, AuthError::MalformedCredential)
            })?),
            None => None,
        };

        match verifier.authenticate(header) {
            Ok(claims) => {
                debug!(email = %claims.email, role = %claims.role, "토큰 인증 성공");
                Ok(Authenticated(claims))
            }
            Err(e) => Err(reject(parts, e)),
        }
    }
}

/// 관리자 역할을 요구하는 추출기.
///
/// 인증 실패는 401, 역할 부족은 403으로 구분됩니다.
#[derive(Debug, Clone)]
pub struct AdminOnly(pub Claims);

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
    JwtVerifier: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Authenticated(claims) = Authenticated::from_request_parts(parts, state).await?;
        require_admin(&claims).map_err(|e| reject(parts, e))?;
        Ok(AdminOnly(claims))
    }
}

/// 관리자 역할 확인.
pub fn require_admin(claims: &Claims) -> Result<(), AuthError> {
    require_permission(Permission::ManageProducts, claims)
}

/// 권한 확인.
///
/// # Returns
///
/// 역할이 권한을 가지면 Ok(()), 아니면 `InsufficientRole`
pub fn require_permission(permission: Permission, claims: &Claims) -> Result<(), AuthError> {
    if claims.role.has_permission(permission) {
        Ok(())
    } else {
        debug!(
            email = %claims.email,
            role = %claims.role,
            permission = permission.description(),
            "권한 부족"
        );
        Err(AuthError::InsufficientRole)
    }
}

fn reject(parts: &Parts, error: AuthError) -> AuthError {
    warn!(
        method = %parts.method,
        path = %parts.uri.path(),
        code = error.code(),
        "인증 거부"
    );
    record_auth_failure(error.code());
    error
}
