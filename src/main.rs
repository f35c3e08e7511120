use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use weather_mcp::{
    auth::GoogleTokenVerifier,
    build_app,
    config::{Config, GOOGLE_ISSUER},
    logging,
    nws::NwsClient,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::parse();
    let bind_socket = config.bind_socket()?;

    let jwks_http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let verifier = Arc::new(GoogleTokenVerifier::new(jwks_http));
    let weather = Arc::new(NwsClient::new()?);

    let state = AppState::new(verifier, weather);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        host = %config.host,
        port = config.port,
        issuer = GOOGLE_ISSUER,
        "weather mcp server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
