//! 재고 차감 요청.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{InventoryError, InventoryResult};

const QUANTITY_MESSAGE: &str = "수량은 양의 정수여야 합니다";

/// 재고 차감 요청 본문.
///
/// 잘못된 타입(문자열, 소수 등)도 검증 에러로 보고하기 위해 원시 JSON 값으로 받습니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct DecreaseStockRequest {
    /// 차감할 수량 (양의 정수)
    #[serde(default)]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = i32, example = 7))]
    pub quantity: Option<Value>,
}

impl DecreaseStockRequest {
    /// 수량을 검증하여 반환합니다.
    pub fn quantity(&self) -> InventoryResult<i32> {
        parse_quantity(self.quantity.as_ref())
    }
}

/// 차감 수량 파싱.
///
/// JSON 정수이면서 `1..=i32::MAX` 범위인 값만 허용합니다.
/// 누락, 0 이하, 소수, 문자열, 불리언은 모두 `quantity` 필드 검증 에러입니다.
pub fn parse_quantity(raw: Option<&Value>) -> InventoryResult<i32> {
    let invalid = || InventoryError::field("quantity", QUANTITY_MESSAGE);

    let Some(Value::Number(number)) = raw else {
        return Err(invalid());
    };

    number
        .as_i64()
        .filter(|q| *q > 0)
        .and_then(|q| i32::try_from(q).ok())
        .ok_or_else(invalid)
}

/// 차감 성공 메시지.
pub fn decrease_message(quantity: i32, new_stock: i32) -> String {
    format!("재고가 {}개 차감되었습니다. 현재 재고: {}", quantity, new_stock)
}
