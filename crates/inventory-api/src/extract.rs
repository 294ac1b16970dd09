//! JSON 에러 응답을 보장하는 추출기.
//!
//! axum 기본 추출기의 거부 응답은 평문이므로 [`ApiError`]로 변환합니다.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `axum::Json` 대체 추출기. 파싱 실패는 `MALFORMED_REQUEST`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` 대체 추출기. 파싱 실패는 `MALFORMED_REQUEST`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// 본문이 없어도 되는 JSON 추출기.
///
/// 본문 버퍼링 실패(크기 제한 초과 포함)도 JSON 에러 응답으로 변환합니다.
#[derive(Debug)]
pub struct OptionalJson<T>(pub T);

impl<S, T> FromRequest<S> for OptionalJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await?;
        parse_optional_json(&body).map(OptionalJson)
    }
}

/// 선택적 JSON 본문 파싱.
///
/// 빈 본문은 `{}`로 취급해 필드 누락을 검증 단계에서 보고하게 합니다.
/// Content-Type은 확인하지 않습니다.
fn parse_optional_json<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedRequest(e.to_string()))
}
