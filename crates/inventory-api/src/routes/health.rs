//! 헬스 체크 endpoint.
//!
//! 로드밸런서나 오케스트레이션 시스템에서 사용하는 liveness/readiness 엔드포인트입니다.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// Liveness 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    pub success: bool,
    /// 항상 "OK"
    pub status: String,
    pub message: String,
    /// API 버전
    pub version: String,
    /// 현재 시간 (ISO 8601)
    pub timestamp: String,
}

/// Readiness 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    pub success: bool,
    /// 전체 서비스 상태 ("healthy" | "unhealthy")
    pub status: String,
    pub version: String,
    /// 서버 업타임(초)
    pub uptime_secs: i64,
    pub timestamp: String,
    /// 개별 컴포넌트 상태
    pub components: ComponentHealth,
}

/// 개별 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    /// 데이터베이스 연결 상태
    pub database: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down")
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }
}

/// 간단한 헬스 체크 (liveness probe용).
///
/// 서버가 응답 가능한 상태인지만 확인합니다.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "서버 동작 중", body = LivenessResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        success: true,
        status: "OK".to_string(),
        message: "재고 API 서버가 동작 중입니다".to_string(),
        version: state.version.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// 상세 헬스 체크 (readiness probe용).
///
/// 데이터베이스에 `SELECT 1`을 보내 확인하며, 실패하면 503을 반환합니다.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "요청 처리 가능", body = ReadinessResponse),
        (status = 503, description = "데이터베이스 연결 불가", body = ReadinessResponse)
    )
)]
pub async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status_code, overall, database) = if state.is_db_healthy().await {
        (StatusCode::OK, "healthy", ComponentStatus::up())
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "unhealthy",
            ComponentStatus::down("연결 실패"),
        )
    };

    let response = ReadinessResponse {
        success: status_code.is_success(),
        status: overall.to_string(),
        version: state.version.to_string(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth { database },
    };

    (status_code, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(health_ready))
}
