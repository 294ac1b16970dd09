//! REST API 라우트.
//!
//! 모든 엔드포인트는 JSON으로 응답하며, 존재하지 않는 경로와 허용되지 않은 메서드도
//! JSON 에러 본문을 반환합니다.

pub mod health;
pub mod products;

use std::sync::Arc;

use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

pub use health::{
    health_router, ComponentHealth, ComponentStatus, LivenessResponse, ReadinessResponse,
};
pub use products::{products_router, MessageResponse, ProductListResponse, ProductResponse};

/// API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .merge(products_router())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
