//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 인증/재고 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// HTTP 요청 지속 시간 히스토그램 버킷 (초)
const DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

/// Prometheus 레코더를 전역으로 설치하고 렌더링 핸들을 반환합니다.
///
/// # Errors
///
/// 레코더가 이미 설치되어 있으면 `BuildError`를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            DURATION_BUCKETS,
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 도메인 메트릭
// ============================================================================

/// 인증/인가 거부 카운터 증가 (에러 코드별).
pub fn record_auth_failure(code: &'static str) {
    counter!("inventory_auth_failures_total", "code" => code).increment(1);
}

/// 재고 차감 결과 카운터 증가 (decreased, insufficient, not_found).
pub fn record_stock_decrement(outcome: &'static str) {
    counter!("inventory_stock_decrements_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// 경로 정규화
// ============================================================================

/// 라우트 템플릿을 알 수 없을 때 숫자 세그먼트를 `{id}`로 치환합니다.
///
/// 예: `/products/42/decrease-stock` → `/products/{id}/decrease-stock`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let numeric = segment
                .strip_prefix('-')
                .unwrap_or(segment)
                .chars()
                .all(|c| c.is_ascii_digit());
            if !segment.is_empty() && segment != "-" && numeric {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
