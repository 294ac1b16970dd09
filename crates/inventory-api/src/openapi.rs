//! OpenAPI 문서화 설정.
//!
//! utoipa로 OpenAPI 3 문서를 생성하고 `/swagger-ui`에서 Swagger UI를 제공합니다.
//! 새 엔드포인트를 추가하면 `paths(...)`와 `components(schemas(...))`에 함께 등록합니다.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use inventory_core::{DecreaseStockRequest, NewProduct, Product, ProductPatch};

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, LivenessResponse, MessageResponse, ProductListResponse,
    ProductResponse, ReadinessResponse,
};

/// 재고 API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        description = r#"
# 상품 재고 REST API

상품 조회/관리와 동시성 안전한 재고 차감을 제공합니다.

## 인증

외부 인증 서비스가 발급한 HS256 JWT를 `Authorization: Bearer <token>` 헤더로 전달합니다.
생성/수정/삭제는 `Administrador` 역할이 필요하고, 재고 차감은 모든 인증 사용자에게 허용됩니다.
"#
    ),
    tags(
        (name = "health", description = "서버 상태 확인"),
        (name = "products", description = "상품 및 재고 관리")
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::products::list_products,
        crate::routes::products::get_product,
        crate::routes::products::create_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,
        crate::routes::products::decrease_stock,
    ),
    components(schemas(
        Product,
        NewProduct,
        ProductPatch,
        DecreaseStockRequest,
        ProductResponse,
        ProductListResponse,
        MessageResponse,
        ApiErrorResponse,
        LivenessResponse,
        ReadinessResponse,
        ComponentHealth,
        ComponentStatus,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Bearer JWT 보안 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Swagger UI 라우터.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
