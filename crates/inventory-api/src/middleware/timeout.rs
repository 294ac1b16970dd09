//! 요청 처리 시간 제한.
//!
//! 시간 초과도 다른 실패와 같은 JSON 에러 본문(`REQUEST_TIMEOUT`)으로 응답합니다.

use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, BoxError, Router};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};

use crate::error::ApiError;

/// 라우터 전체에 처리 시간 제한을 적용합니다.
pub fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}

async fn handle_timeout_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}
