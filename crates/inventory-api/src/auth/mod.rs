//! 인증 및 권한 부여.
//!
//! 외부 인증 서비스가 발급한 HS256 JWT를 검증하고,
//! 역할에 따라 관리자 전용 작업을 구분합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`Role`]: 사용자 역할 (Administrador, Vendedor, Consultor)
//! - [`Authenticated`]: 유효한 토큰을 요구하는 추출기
//! - [`AdminOnly`]: 관리자 역할을 요구하는 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     Authenticated(claims): Authenticated,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.email)
//! }
//! ```

mod jwt;
mod middleware;
mod roles;

pub use jwt::{create_token, extract_token, AuthError, Claims, JwtEncodeError, JwtVerifier};
pub use middleware::{require_admin, require_permission, AdminOnly, Authenticated};
pub use roles::{Permission, Role};
