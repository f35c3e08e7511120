use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Logs one summary line per HTTP request. Rejected credentials additionally
/// surface at warn level so auth failures stand out in the default filter.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status().as_u16();

    info!(
        method = %method,
        path = %path,
        status,
        duration_ms = started_at.elapsed().as_millis(),
        "http request"
    );

    if status == 401 {
        warn!(method = %method, path = %path, "bearer authentication rejected");
    }

    response
}
