use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod nws;

use auth::TokenVerifier;
use nws::WeatherProvider;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub weather: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { verifier, weather }
    }
}

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ));

    // Wide-open CORS (any origin, credentials allowed) is a development
    // posture, matching the server's intended local-tooling use.
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .merge(protected)
        .layer(CorsLayer::very_permissive())
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
