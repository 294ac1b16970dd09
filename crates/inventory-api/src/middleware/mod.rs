//! API 서버용 HTTP middleware.

mod cors;
mod metrics;
mod timeout;

pub use cors::cors_layer;
pub use metrics::metrics_layer;
pub use timeout::with_request_timeout;
