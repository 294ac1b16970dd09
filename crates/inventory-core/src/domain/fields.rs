//! JSON 본문 필드 읽기.
//!
//! 필드 타입이 맞지 않아도 본문 전체를 거부하지 않고 해당 필드의 에러로 모읍니다.
//! `null`은 필드 누락과 같게 취급합니다.

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::error::{FieldErrors, InventoryError, InventoryResult};

const NOT_A_STRING: &str = "문자열이어야 합니다";
const NOT_AN_INTEGER: &str = "정수여야 합니다";
const INTEGER_OUT_OF_RANGE: &str = "정수 범위(-2147483648 ~ 2147483647)를 벗어났습니다";
const NOT_A_NUMBER: &str = "숫자여야 합니다";

/// 필드별 타입 변환기.
pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    /// 본문이 JSON 객체가 아니면 `body` 필드 에러입니다.
    pub(crate) fn new(body: &'a Value) -> InventoryResult<Self> {
        match body {
            Value::Object(object) => Ok(Self {
                object,
                errors: FieldErrors::new(),
            }),
            _ => Err(InventoryError::field("body", "JSON 객체여야 합니다")),
        }
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|value| !value.is_null())
    }

    fn reject(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// 문자열 필드.
    pub(crate) fn text(&mut self, field: &str) -> Option<String> {
        match self.present(field)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.reject(field, NOT_A_STRING);
                None
            }
        }
    }

    /// 32비트 정수 필드. 소수점이 있는 숫자(`10.0` 포함)는 거부합니다.
    pub(crate) fn integer(&mut self, field: &str) -> Option<i32> {
        let Value::Number(number) = self.present(field)? else {
            self.reject(field, NOT_AN_INTEGER);
            return None;
        };
        if !(number.is_i64() || number.is_u64()) {
            self.reject(field, NOT_AN_INTEGER);
            return None;
        }
        match number.as_i64().and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                self.reject(field, INTEGER_OUT_OF_RANGE);
                None
            }
        }
    }

    /// 고정 소수점 숫자 필드. 문자열 숫자는 허용하지 않습니다.
    pub(crate) fn decimal(&mut self, field: &str) -> Option<Decimal> {
        let parsed = match self.present(field)? {
            Value::Number(number) => number_to_decimal(number),
            _ => None,
        };
        if parsed.is_none() {
            self.reject(field, NOT_A_NUMBER);
        }
        parsed
    }

    /// 타입 변환 중 모인 필드 에러.
    pub(crate) fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

fn number_to_decimal(number: &Number) -> Option<Decimal> {
    let repr = number.to_string();
    repr.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&repr))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_non_object_body_rejected() {
        for body in [json!([1, 2]), json!("text"), json!(5), Value::Null] {
            match FieldReader::new(&body) {
                Err(InventoryError::Validation(fields)) => assert!(fields.contains_key("body")),
                _ => panic!("expected body error for {body}"),
            }
        }
    }

    #[test]
    fn test_null_and_missing_are_absent() {
        let body = json!({ "name": null });
        let mut reader = FieldReader::new(&body).unwrap();
        assert_eq!(reader.text("name"), None);
        assert_eq!(reader.integer("stock"), None);
        assert!(reader.into_errors().is_empty());
    }

    #[test]
    fn test_wrong_types_become_field_errors() {
        let body = json!({
            "name": 5,
            "stock": "ten",
            "count": 10.5,
            "whole": 10.0,
            "price": "abc"
        });
        let mut reader = FieldReader::new(&body).unwrap();
        assert_eq!(reader.text("name"), None);
        assert_eq!(reader.integer("stock"), None);
        assert_eq!(reader.integer("count"), None);
        assert_eq!(reader.integer("whole"), None);
        assert_eq!(reader.decimal("price"), None);

        let errors = reader.into_errors();
        assert_eq!(errors["name"], vec![NOT_A_STRING.to_string()]);
        assert_eq!(errors["stock"], vec![NOT_AN_INTEGER.to_string()]);
        assert_eq!(errors["count"], vec![NOT_AN_INTEGER.to_string()]);
        assert_eq!(errors["whole"], vec![NOT_AN_INTEGER.to_string()]);
        assert_eq!(errors["price"], vec![NOT_A_NUMBER.to_string()]);
    }

    #[test]
    fn test_integer_out_of_range() {
        let body = json!({ "stock": 3_000_000_000i64 });
        let mut reader = FieldReader::new(&body).unwrap();
        assert_eq!(reader.integer("stock"), None);
        assert_eq!(reader.into_errors()["stock"], vec![INTEGER_OUT_OF_RANGE.to_string()]);
    }

    #[test]
    fn test_decimal_from_json_numbers() {
        let body = json!({ "a": 9.99, "b": 10, "c": -1.5, "d": 1e3 });
        let mut reader = FieldReader::new(&body).unwrap();
        assert_eq!(reader.decimal("a"), Some(dec!(9.99)));
        assert_eq!(reader.decimal("b"), Some(dec!(10)));
        assert_eq!(reader.decimal("c"), Some(dec!(-1.5)));
        assert_eq!(reader.decimal("d"), Some(dec!(1000)));
        assert!(reader.into_errors().is_empty());
    }
}
