//! 재고 API 서버 진입점.
//!
//! 설정 로드 → 로깅 → 메트릭 → DB 연결 및 스키마 준비 → HTTP 서버 순으로 기동합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use inventory_api::auth::JwtVerifier;
use inventory_api::middleware::{cors_layer, with_request_timeout};
use inventory_api::repository::ProductRepository;
use inventory_api::{create_api_router, metrics_layer, openapi, setup_metrics_recorder, AppState};
use inventory_core::{init_logging, sample_products, AppConfig, LogConfig};

/// `--export-openapi` 또는 `EXPORT_OPENAPI=1`이면 OpenAPI JSON을 출력하고 종료합니다.
fn handle_export_openapi() -> anyhow::Result<()> {
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let json = serde_json::to_string_pretty(&openapi::ApiDoc::openapi())?;
        println!("{json}");
        std::process::exit(0);
    }

    Ok(())
}

/// 전체 라우터 구성.
fn create_router(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    cors: CorsLayer,
    request_timeout: Duration,
) -> Router {
    let metrics_router = Router::new().route(
        "/metrics",
        get(move || {
            let handle = metrics_handle.clone();
            async move { handle.render() }
        }),
    );

    let app = create_api_router()
        .route_layer(middleware::from_fn(metrics_layer))
        .with_state(state)
        .merge(openapi::swagger_ui_router())
        .merge(metrics_router)
        .layer(TraceLayer::new_for_http());

    with_request_timeout(app, request_timeout).layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    handle_export_openapi()?;

    // 필수 설정(JWT_SECRET, DATABASE_URL)이 없으면 여기서 종료
    let config = AppConfig::load_default().context("설정 로드 실패")?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    info!(version = env!("CARGO_PKG_VERSION"), "재고 API 서버 시작");

    let metrics_handle = setup_metrics_recorder().context("메트릭 레코더 설치 실패")?;
    let cors = cors_layer(&config.cors).context("CORS 설정 실패")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .connect(&config.database.url)
        .await
        .context("데이터베이스 연결 실패")?;
    info!(
        max_connections = config.database.max_connections,
        "데이터베이스 연결 완료"
    );

    ProductRepository::ensure_schema(&pool)
        .await
        .context("products 스키마 준비 실패")?;

    if config.database.seed_sample_data {
        match ProductRepository::seed_if_empty(&pool, &sample_products()).await {
            Ok(0) => info!("기존 상품이 있어 샘플 데이터를 건너뜁니다"),
            Ok(count) => info!(count, "샘플 상품 삽입"),
            Err(e) => error!(error = %e, "샘플 데이터 삽입 실패"),
        }
    }

    let verifier = JwtVerifier::new(config.auth.secret()?);
    let state = Arc::new(AppState::new(pool, verifier));
    let app = create_router(
        state,
        metrics_handle,
        cors,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.server.socket_addr().context("잘못된 서버 주소")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("{addr} 바인딩 실패"))?;
    info!(%addr, "HTTP 서버 리스닝");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("서버 종료");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C 핸들러 설치 실패");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM 핸들러 설치 실패");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Ctrl+C 수신, 종료 시작"),
        _ = terminate => warn!("SIGTERM 수신, 종료 시작"),
    }
}
