//! 재고 서비스의 에러 타입.
//!
//! 도메인 규칙 위반과 설정 오류를 표현합니다. HTTP 매핑은 API 크레이트가 담당합니다.

use std::collections::BTreeMap;

use thiserror::Error;
use validator::ValidationErrors;

/// 필드별 검증 에러 메시지 맵.
///
/// 키는 필드명, 값은 해당 필드의 에러 메시지 목록입니다.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// 핵심 재고 에러.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// 필드 검증 실패
    #[error("입력값이 유효하지 않습니다")]
    Validation(FieldErrors),

    /// 수정할 필드가 하나도 없는 업데이트 요청
    #[error("수정할 필드가 제공되지 않았습니다")]
    EmptyUpdate,

    /// 상품 없음
    #[error("상품을 찾을 수 없습니다: {0}")]
    NotFound(i32),

    /// 재고 부족
    #[error("재고가 부족합니다. 가용: {available}, 요청: {requested}")]
    InsufficientStock { available: i32, requested: i32 },

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 재고 작업을 위한 Result 타입.
pub type InventoryResult<T> = Result<T, InventoryError>;

impl InventoryError {
    /// 단일 필드 검증 에러 생성.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        InventoryError::Validation(errors)
    }
}

/// validator 에러를 필드별 메시지 맵으로 변환합니다.
pub(crate) fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut fields = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("유효하지 않은 값 ({})", e.code))
            })
            .collect();
        fields.insert(field.to_string(), messages);
    }
    fields
}

impl From<ValidationErrors> for InventoryError {
    fn from(errors: ValidationErrors) -> Self {
        InventoryError::Validation(collect_field_errors(&errors))
    }
}

impl From<config::ConfigError> for InventoryError {
    fn from(err: config::ConfigError) -> Self {
        InventoryError::Config(err.to_string())
    }
}
