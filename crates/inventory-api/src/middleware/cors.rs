//! CORS 레이어 구성.

use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use inventory_core::{CorsConfig, InventoryError, InventoryResult};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// 설정된 허용 origin으로 CORS 레이어를 만듭니다.
///
/// 허용 목록이 비어 있으면 모든 origin을 허용하고(개발 모드) 자격 증명은 허용하지 않습니다.
/// 잘못된 origin은 경고 후 제외하며, 설정된 origin이 모두 잘못되었으면 에러입니다.
pub fn cors_layer(config: &CorsConfig) -> InventoryResult<CorsLayer> {
    let mut origins = Vec::with_capacity(config.allowed_origins.len());
    for raw in &config.allowed_origins {
        match parse_origin(raw) {
            Some(origin) => origins.push(origin),
            None => warn!(origin = %raw.escape_debug(), "잘못된 CORS origin 무시"),
        }
    }

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(Duration::from_secs(3600));

    if config.allowed_origins.is_empty() {
        warn!("CORS 허용 origin이 없어 모든 origin을 허용합니다 (개발 모드)");
        return Ok(layer.allow_origin(AllowOrigin::any()));
    }

    if origins.is_empty() {
        return Err(InventoryError::Config(format!(
            "유효한 CORS origin이 없습니다: {:?}",
            config.allowed_origins
        )));
    }

    info!(count = origins.len(), "CORS 허용 origin 설정");
    Ok(layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}

/// `scheme://host[:port]` 형태의 origin만 허용합니다.
fn parse_origin(raw: &str) -> Option<HeaderValue> {
    let (scheme, host) = raw.split_once("://")?;
    if !matches!(scheme, "http" | "https") || host.is_empty() || host.contains('/') {
        return None;
    }
    HeaderValue::from_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_origin() {
        assert!(parse_origin("http://localhost:5173").is_some());
        assert!(parse_origin("https://shop.example.com").is_some());
        assert!(parse_origin("shop.example.com").is_none());
        assert!(parse_origin("ftp://shop.example.com").is_none());
        assert!(parse_origin("https://shop.example.com/path").is_none());
        assert!(parse_origin("https://bad\u{1}host").is_none());
    }

    #[test]
    fn test_empty_list_allows_any() {
        assert!(cors_layer(&config(&[])).is_ok());
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        assert!(cors_layer(&config(&["https://shop.example.com", "not an origin"])).is_ok());
    }

    #[test]
    fn test_all_invalid_entries_fail_closed() {
        let err = cors_layer(&config(&["not an origin", "ftp://x"])).unwrap_err();
        assert!(matches!(err, InventoryError::Config(_)));
    }
}
