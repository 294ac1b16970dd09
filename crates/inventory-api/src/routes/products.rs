//! 상품 관리 API.
//!
//! 조회는 공개, 생성/수정/삭제는 관리자 전용, 재고 차감은 인증된 모든 역할에 허용됩니다.
//!
//! # 엔드포인트
//!
//! - `GET /products` - 전체 상품 목록
//! - `POST /products` - 상품 생성 (관리자)
//! - `GET /products/{id}` - 상품 상세
//! - `PUT /products/{id}` - 상품 부분 수정 (관리자)
//! - `DELETE /products/{id}` - 상품 삭제 (관리자)
//! - `PATCH /products/{id}/decrease-stock` - 재고 차감 (인증)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use inventory_core::{
    decrease_message, DecreaseStockRequest, InventoryError, NewProduct, Product, ProductPatch,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::auth::{AdminOnly, Authenticated};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extract::{AppJson, AppPath, OptionalJson};
use crate::metrics::record_stock_decrement;
use crate::repository::{ProductRepository, StockDecrease};
use crate::state::AppState;

// ==================== 응답 타입 ====================

/// 상품 목록 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub data: Vec<Product>,
    /// 상품 수
    pub count: usize,
}

/// 단일 상품 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Product,
}

impl ProductResponse {
    fn new(data: Product) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    fn with_message(data: Product, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// 메시지만 담는 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ==================== 핸들러 ====================

/// 전체 상품 목록 조회 (최신 생성 순).
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses(
        (status = 200, description = "상품 목록", body = ProductListResponse),
        (status = 500, description = "데이터베이스 오류", body = ApiErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ProductListResponse>> {
    let products = ProductRepository::list(&state.db_pool).await?;
    debug!(count = products.len(), "상품 목록 조회");

    Ok(Json(ProductListResponse {
        success: true,
        count: products.len(),
        data: products,
    }))
}

/// 상품 상세 조회.
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "상품 ID")),
    responses(
        (status = 200, description = "상품 상세", body = ProductResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i32>,
) -> ApiResult<Json<ProductResponse>> {
    let product = ProductRepository::find_by_id(&state.db_pool, id)
        .await?
        .ok_or(InventoryError::NotFound(id))?;

    Ok(Json(ProductResponse::new(product)))
}

/// 상품 생성 (관리자).
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = NewProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "생성됨", body = ProductResponse),
        (status = 400, description = "검증 실패", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    AdminOnly(claims): AdminOnly,
    AppJson(body): AppJson<Value>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let draft = NewProduct::parse(&body)?;
    let product = ProductRepository::create(&state.db_pool, &draft).await?;

    info!(
        product_id = product.id,
        name = %product.name,
        email = %claims.email,
        "상품 생성"
    );

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::with_message(product, "상품이 생성되었습니다")),
    ))
}

/// 상품 부분 수정 (관리자).
///
/// 본문에 포함된 필드만 갱신합니다. 필드가 하나도 없으면 400입니다.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "상품 ID")),
    request_body = ProductPatch,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정됨", body = ProductResponse),
        (status = 400, description = "검증 실패 또는 빈 요청", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    AdminOnly(claims): AdminOnly,
    AppPath(id): AppPath<i32>,
    AppJson(body): AppJson<Value>,
) -> ApiResult<Json<ProductResponse>> {
    let patch = ProductPatch::parse(&body)?;
    let product = ProductRepository::update(&state.db_pool, id, &patch)
        .await?
        .ok_or(InventoryError::NotFound(id))?;

    info!(
        product_id = id,
        fields = patch.changes().len(),
        email = %claims.email,
        "상품 수정"
    );

    Ok(Json(ProductResponse::with_message(
        product,
        "상품이 수정되었습니다",
    )))
}

/// 상품 삭제 (관리자).
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "상품 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제됨", body = MessageResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    AdminOnly(claims): AdminOnly,
    AppPath(id): AppPath<i32>,
) -> ApiResult<Json<MessageResponse>> {
    if !ProductRepository::delete(&state.db_pool, id).await? {
        return Err(InventoryError::NotFound(id).into());
    }

    info!(product_id = id, email = %claims.email, "상품 삭제");

    Ok(Json(MessageResponse {
        success: true,
        message: "상품이 삭제되었습니다".to_string(),
    }))
}

/// 재고 차감 (인증된 모든 역할).
///
/// 재고가 요청 수량 이상일 때만 원자적으로 차감합니다.
#[utoipa::path(
    patch,
    path = "/products/{id}/decrease-stock",
    tag = "products",
    params(("id" = i32, Path, description = "상품 ID")),
    request_body = DecreaseStockRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "차감됨", body = ProductResponse),
        (status = 400, description = "수량 오류 또는 재고 부족", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse),
        (status = 413, description = "본문 크기 초과", body = ApiErrorResponse)
    )
)]
pub async fn decrease_stock(
    State(state): State<Arc<AppState>>,
    Authenticated(claims): Authenticated,
    AppPath(id): AppPath<i32>,
    OptionalJson(request): OptionalJson<DecreaseStockRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let quantity = request.quantity()?;

    let outcome = ProductRepository::decrease_stock(&state.db_pool, id, quantity).await?;
    record_stock_decrement(outcome.outcome());

    match outcome {
        StockDecrease::Decreased(product) => {
            info!(
                product_id = id,
                quantity,
                remaining = product.stock,
                email = %claims.email,
                role = %claims.role,
                "재고 차감"
            );
            let message = decrease_message(quantity, product.stock);
            Ok(Json(ProductResponse::with_message(product, message)))
        }
        StockDecrease::Insufficient { available } => {
            debug!(product_id = id, quantity, available, "재고 부족");
            Err(InventoryError::InsufficientStock {
                available,
                requested: quantity,
            }
            .into())
        }
        StockDecrease::NotFound => Err(InventoryError::NotFound(id).into()),
    }
}

/// 상품 라우터 생성.
pub fn products_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/decrease-stock", patch(decrease_stock))
}
