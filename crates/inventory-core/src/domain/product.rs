//! 상품 도메인 모델 및 입력 검증.
//!
//! - [`Product`]: 저장된 상품 레코드
//! - [`NewProduct`]: 생성 요청 본문 (모든 필드 필수)
//! - [`ProductPatch`]: 수정 요청 본문 (필드별 선택, 허용 컬럼만 반영)
//!
//! 요청 본문은 필드 단위로 읽기 때문에 타입이 틀린 필드도 필드별 검증 에러로 보고됩니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use super::fields::FieldReader;
use crate::error::{collect_field_errors, FieldErrors, InventoryError, InventoryResult};

/// `NUMERIC(10, 2)` 컬럼이 담을 수 있는 가격 상한 (배타적).
const PRICE_UPPER_BOUND: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// 가격 소수점 자릿수 상한.
const PRICE_MAX_SCALE: u32 = 2;

// ==================== 커스텀 검증 함수 ====================

/// 가격 검증 (0 이상, 소수점 2자리 이하, 1억 미만)
/// 참고: Option<Decimal> 필드에 사용 시 validator가 Some일 때만 호출하므로 &Decimal을 받음
fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("price_negative")
            .with_message("가격은 0 이상이어야 합니다".into()));
    }
    if value.normalize().scale() > PRICE_MAX_SCALE {
        return Err(ValidationError::new("price_scale")
            .with_message("가격은 소수점 2자리까지만 허용됩니다".into()));
    }
    if *value >= PRICE_UPPER_BOUND {
        return Err(ValidationError::new("price_too_large")
            .with_message("가격은 100,000,000 미만이어야 합니다".into()));
    }
    Ok(())
}

/// 공백만 있는 문자열 거부
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("빈 값은 허용되지 않습니다".into()));
    }
    Ok(())
}

// ==================== 저장 레코드 ====================

/// 상품 레코드.
///
/// `products` 테이블의 한 행을 그대로 표현합니다.
/// 가격은 고정 소수점(`Decimal`)으로 저장되고 JSON에서는 숫자로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Product {
    /// 상품 ID (시스템 할당)
    pub id: i32,
    /// 상품명
    pub name: String,
    /// 가격
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = f64, example = 9.99))]
    pub price: Decimal,
    /// 재고 수량 (항상 0 이상)
    pub stock: i32,
    /// 설명
    pub description: String,
    /// 카테고리
    pub category: String,
    /// 이미지 URL
    pub image_url: String,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
    /// 마지막 수정 시각
    pub updated_at: DateTime<Utc>,
}

// ==================== 생성 입력 ====================

/// 상품 생성 요청.
///
/// 누락 필드도 필드별 에러로 보고하기 위해 모든 필드를 `Option`으로 받고
/// `required` 검증으로 강제합니다. JSON 본문은 [`NewProduct::parse`]로 읽습니다.
#[derive(Debug, Clone, Default, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewProduct {
    /// 상품명 (2자 이상 255자 이하)
    #[validate(
        required(message = "필수 항목입니다"),
        length(min = 2, max = 255, message = "상품명은 2자 이상 255자 이하여야 합니다"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    /// 가격 (0 이상)
    #[validate(
        required(message = "필수 항목입니다"),
        custom(function = "validate_price")
    )]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = Option<f64>, example = 9.99))]
    pub price: Option<Decimal>,
    /// 재고 (0 이상)
    #[validate(
        required(message = "필수 항목입니다"),
        range(min = 0, message = "재고는 0 이상이어야 합니다")
    )]
    pub stock: Option<i32>,
    /// 설명
    #[validate(
        required(message = "필수 항목입니다"),
        custom(function = "validate_not_blank")
    )]
    pub description: Option<String>,
    /// 카테고리 (100자 이하)
    #[validate(
        required(message = "필수 항목입니다"),
        length(max = 100, message = "카테고리는 100자 이하여야 합니다"),
        custom(function = "validate_not_blank")
    )]
    pub category: Option<String>,
    /// 이미지 URL (500자 이하)
    #[validate(
        required(message = "필수 항목입니다"),
        length(max = 500, message = "이미지 URL은 500자 이하여야 합니다"),
        url(message = "유효한 URL이어야 합니다")
    )]
    pub image_url: Option<String>,
}

/// 검증을 통과한 생성 입력.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub description: String,
    pub category: String,
    pub image_url: String,
}

impl NewProduct {
    /// JSON 본문을 읽어 검증된 [`ProductDraft`]로 변환합니다.
    ///
    /// 타입 에러와 규칙 위반은 하나의 필드 에러 맵으로 합쳐집니다.
    pub fn parse(body: &Value) -> InventoryResult<ProductDraft> {
        let mut reader = FieldReader::new(body)?;
        let input = NewProduct {
            name: reader.text("name"),
            price: reader.decimal("price"),
            stock: reader.integer("stock"),
            description: reader.text("description"),
            category: reader.text("category"),
            image_url: reader.text("image_url"),
        };
        input.validated_with(reader.into_errors())
    }

    /// 모든 필드를 검증하고 저장 가능한 [`ProductDraft`]로 변환합니다.
    pub fn validated(self) -> InventoryResult<ProductDraft> {
        self.validated_with(FieldErrors::new())
    }

    fn validated_with(self, type_errors: FieldErrors) -> InventoryResult<ProductDraft> {
        check_fields(&self, type_errors)?;

        let (
            Some(name),
            Some(price),
            Some(stock),
            Some(description),
            Some(category),
            Some(image_url),
        ) = (
            self.name,
            self.price,
            self.stock,
            self.description,
            self.category,
            self.image_url,
        )
        else {
            // required 검증을 통과했다면 도달하지 않음
            return Err(InventoryError::field("body", "필수 항목이 누락되었습니다"));
        };

        Ok(ProductDraft {
            name,
            price,
            stock,
            description,
            category,
            image_url,
        })
    }
}

// ==================== 수정 입력 ====================

/// 수정 가능한 컬럼 허용 목록.
///
/// UPDATE 문의 SET 절은 이 목록에 있는 컬럼만으로 구성됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductColumn {
    Name,
    Price,
    Stock,
    Description,
    Category,
    ImageUrl,
}

impl ProductColumn {
    /// 허용된 모든 컬럼.
    pub const ALL: [ProductColumn; 6] = [
        ProductColumn::Name,
        ProductColumn::Price,
        ProductColumn::Stock,
        ProductColumn::Description,
        ProductColumn::Category,
        ProductColumn::ImageUrl,
    ];

    /// 테이블 컬럼명.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductColumn::Name => "name",
            ProductColumn::Price => "price",
            ProductColumn::Stock => "stock",
            ProductColumn::Description => "description",
            ProductColumn::Category => "category",
            ProductColumn::ImageUrl => "image_url",
        }
    }
}

/// 컬럼에 바인딩할 값.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue<'a> {
    Text(&'a str),
    Decimal(Decimal),
    Integer(i32),
}

/// 상품 수정 요청.
///
/// 필드별 검증 규칙은 [`NewProduct`]와 동일하지만 모든 필드가 선택입니다.
#[derive(Debug, Clone, Default, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct ProductPatch {
    #[validate(
        length(min = 2, max = 255, message = "상품명은 2자 이상 255자 이하여야 합니다"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = Option<f64>, example = 9.99))]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "재고는 0 이상이어야 합니다"))]
    pub stock: Option<i32>,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,
    #[validate(
        length(max = 100, message = "카테고리는 100자 이하여야 합니다"),
        custom(function = "validate_not_blank")
    )]
    pub category: Option<String>,
    #[validate(
        length(max = 500, message = "이미지 URL은 500자 이하여야 합니다"),
        url(message = "유효한 URL이어야 합니다")
    )]
    pub image_url: Option<String>,
}

impl ProductPatch {
    /// JSON 본문을 읽어 검증된 수정 요청으로 변환합니다.
    ///
    /// 허용 목록에 없는 키는 무시합니다.
    pub fn parse(body: &Value) -> InventoryResult<Self> {
        let mut reader = FieldReader::new(body)?;
        let patch = ProductPatch {
            name: reader.text("name"),
            price: reader.decimal("price"),
            stock: reader.integer("stock"),
            description: reader.text("description"),
            category: reader.text("category"),
            image_url: reader.text("image_url"),
        };
        patch.validated_with(reader.into_errors())
    }

    /// 변경할 필드가 하나도 없는지 확인.
    pub fn is_empty(&self) -> bool {
        self.changes().is_empty()
    }

    /// 필드를 검증하고, 변경 사항이 없으면 [`InventoryError::EmptyUpdate`]를 반환합니다.
    pub fn validated(self) -> InventoryResult<Self> {
        self.validated_with(FieldErrors::new())
    }

    fn validated_with(self, type_errors: FieldErrors) -> InventoryResult<Self> {
        check_fields(&self, type_errors)?;
        if self.is_empty() {
            return Err(InventoryError::EmptyUpdate);
        }
        Ok(self)
    }

    /// 요청에 포함된 (컬럼, 값) 목록. 순서는 [`ProductColumn::ALL`]을 따릅니다.
    pub fn changes(&self) -> Vec<(ProductColumn, PatchValue<'_>)> {
        ProductColumn::ALL
            .iter()
            .filter_map(|column| {
                let value = match column {
                    ProductColumn::Name => self.name.as_deref().map(PatchValue::Text),
                    ProductColumn::Price => self.price.map(PatchValue::Decimal),
                    ProductColumn::Stock => self.stock.map(PatchValue::Integer),
                    ProductColumn::Description => {
                        self.description.as_deref().map(PatchValue::Text)
                    }
                    ProductColumn::Category => self.category.as_deref().map(PatchValue::Text),
                    ProductColumn::ImageUrl => self.image_url.as_deref().map(PatchValue::Text),
                };
                value.map(|v| (*column, v))
            })
            .collect()
    }
}

/// 규칙 검증 결과를 타입 에러와 합칩니다. 타입 에러가 있는 필드는 타입 에러만 보고합니다.
fn check_fields(input: &impl Validate, mut errors: FieldErrors) -> InventoryResult<()> {
    if let Err(rule_errors) = input.validate() {
        for (field, messages) in collect_field_errors(&rule_errors) {
            errors.entry(field).or_insert(messages);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(InventoryError::Validation(errors))
    }
}
