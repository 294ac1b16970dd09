//! 통합 API 에러 응답 타입.
//!
//! 모든 실패 응답은 같은 JSON 형식을 가집니다.
//!
//! ```json
//! {
//!   "success": false,
//!   "code": "INSUFFICIENT_STOCK",
//!   "message": "재고가 부족합니다. 가용: 3, 요청: 5",
//!   "details": { "available": 3, "requested": 5 },
//!   "timestamp": 1738300800
//! }
//! ```

use axum::{
    extract::rejection::{BytesRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inventory_core::{FieldErrors, InventoryError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::auth::AuthError;

/// 통합 API 에러 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 항상 false
    pub success: bool,
    /// 에러 코드 (예: "VALIDATION_ERROR", "NOT_FOUND", "DB_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 필드별 검증 에러 (VALIDATION_ERROR 전용)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// 추가 에러 상세 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
            errors: None,
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 추가.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// 필드별 에러 추가.
    #[must_use]
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// API 핸들러 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 인증/인가 실패
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// 도메인 규칙 위반
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// 파싱할 수 없는 요청. 원인은 로그에만 남깁니다.
    #[error("요청 형식이 올바르지 않습니다")]
    MalformedRequest(String),

    /// 본문 크기 제한 초과
    #[error("요청 본문이 너무 큽니다")]
    PayloadTooLarge,

    /// 요청 처리 시간 초과
    #[error("요청 처리 시간이 초과되었습니다")]
    Timeout,

    /// 분류되지 않은 내부 실패. 원인은 로그에만 남깁니다.
    #[error("서버 내부 오류가 발생했습니다")]
    Internal(String),

    /// 존재하지 않는 경로
    #[error("요청한 경로를 찾을 수 없습니다")]
    RouteNotFound,

    /// 허용되지 않은 메서드
    #[error("허용되지 않은 메서드입니다")]
    MethodNotAllowed,

    /// 저장소 실패
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP 상태 코드와 응답 본문으로 변환.
    pub fn to_response(&self) -> (StatusCode, ApiErrorResponse) {
        match self {
            ApiError::Auth(e) => {
                let status = if e.is_authorization_failure() {
                    StatusCode::FORBIDDEN
                } else {
                    StatusCode::UNAUTHORIZED
                };
                (status, ApiErrorResponse::new(e.code(), e.to_string()))
            }
            ApiError::Inventory(e) => inventory_response(e),
            ApiError::MalformedRequest(_) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new("MALFORMED_REQUEST", self.to_string()),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiErrorResponse::new("PAYLOAD_TOO_LARGE", self.to_string()),
            ),
            ApiError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                ApiErrorResponse::new("REQUEST_TIMEOUT", self.to_string()),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorResponse::new("INTERNAL_ERROR", self.to_string()),
            ),
            ApiError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                ApiErrorResponse::new("NOT_FOUND", self.to_string()),
            ),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ApiErrorResponse::new("METHOD_NOT_ALLOWED", self.to_string()),
            ),
            // 내부 에러 내용은 로그에만 남김
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorResponse::new("DB_ERROR", "데이터베이스 작업 중 오류가 발생했습니다"),
            ),
        }
    }
}

fn inventory_response(err: &InventoryError) -> (StatusCode, ApiErrorResponse) {
    match err {
        InventoryError::Validation(fields) => (
            StatusCode::BAD_REQUEST,
            ApiErrorResponse::new("VALIDATION_ERROR", err.to_string()).with_errors(fields.clone()),
        ),
        InventoryError::EmptyUpdate => (
            StatusCode::BAD_REQUEST,
            ApiErrorResponse::new("MALFORMED_REQUEST", err.to_string()),
        ),
        InventoryError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            ApiErrorResponse::new("NOT_FOUND", err.to_string()).with_details(json!({ "id": id })),
        ),
        InventoryError::InsufficientStock {
            available,
            requested,
        } => (
            StatusCode::BAD_REQUEST,
            ApiErrorResponse::new("INSUFFICIENT_STOCK", err.to_string()).with_details(json!({
                "available": available,
                "requested": requested,
            })),
        ),
        InventoryError::Config(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorResponse::new("INTERNAL_ERROR", "서버 설정 오류가 발생했습니다"),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => error!(error = %e, "데이터베이스 작업 실패"),
            ApiError::Inventory(InventoryError::Config(msg)) => error!(error = %msg, "설정 오류"),
            ApiError::Internal(reason) => error!(error = %reason, "요청 처리 실패"),
            ApiError::MalformedRequest(reason) => warn!(reason = %reason, "잘못된 요청"),
            ApiError::Timeout => warn!("요청 처리 시간 초과"),
            _ => {}
        }

        let (status, body) = self.to_response();
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_status_codes() {
        let (status, body) = ApiError::from(AuthError::MissingCredential).to_response();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.code, "MISSING_TOKEN");
        assert!(!body.success);

        let (status, body) = ApiError::from(AuthError::InsufficientRole).to_response();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.code, "INSUFFICIENT_ROLE");
    }

    #[test]
    fn test_validation_includes_field_errors() {
        let err = ApiError::from(InventoryError::field("name", "이름은 필수입니다"));
        let (status, body) = err.to_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "VALIDATION_ERROR");
        let errors = body.errors.unwrap();
        assert_eq!(errors["name"], vec!["이름은 필수입니다".to_string()]);
    }

    #[test]
    fn test_insufficient_stock_details() {
        let err = ApiError::from(InventoryError::InsufficientStock {
            available: 3,
            requested: 5,
        });
        let (status, body) = err.to_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INSUFFICIENT_STOCK");
        assert_eq!(body.details, Some(json!({ "available": 3, "requested": 5 })));
        assert!(body.message.contains('3') && body.message.contains('5'));
    }

    #[test]
    fn test_not_found_and_empty_update() {
        let (status, body) = ApiError::from(InventoryError::NotFound(7)).to_response();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");

        let (status, body) = ApiError::from(InventoryError::EmptyUpdate).to_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "MALFORMED_REQUEST");
    }

    #[test]
    fn test_malformed_request_hides_parser_detail() {
        let err = ApiError::MalformedRequest("expected i32 at line 1 column 106".to_string());
        let (status, body) = err.to_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "MALFORMED_REQUEST");
        assert!(!body.message.contains("line 1"));
        assert!(body.details.is_none());
    }

    #[test]
    fn test_transport_failures_are_json_codes() {
        let (status, body) = ApiError::PayloadTooLarge.to_response();
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body.code, "PAYLOAD_TOO_LARGE");

        let (status, body) = ApiError::Timeout.to_response();
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body.code, "REQUEST_TIMEOUT");

        let (status, body) = ApiError::Internal("boom".to_string()).to_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(!body.message.contains("boom"));
    }

    #[test]
    fn test_database_error_hides_details() {
        let err = ApiError::from(sqlx::Error::PoolTimedOut);
        let (status, body) = err.to_response();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "DB_ERROR");
        assert!(!body.message.to_lowercase().contains("pool"));
    }

    #[test]
    fn test_error_serialization_skips_empty_fields() {
        let body = ApiErrorResponse::new("NOT_FOUND", "없음");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["success"], false);
        assert!(json.get("errors").is_none());
        assert!(json.get("details").is_none());
    }
}
