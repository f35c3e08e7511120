use std::net::SocketAddr;

use clap::Parser;
use thiserror::Error;

/// JWKS endpoint holding Google's current token-signing public keys.
pub const GOOGLE_JWKS_URI: &str = "https://www.googleapis.com/oauth2/v3/certs";
/// Issuer required in every accepted bearer token.
pub const GOOGLE_ISSUER: &str = "https://accounts.google.com";

#[derive(Parser, Debug, Clone)]
#[command(name = "weather-mcp")]
#[command(about = "Weather MCP server with Google OAuth bearer authentication", long_about = None)]
pub struct Config {
    /// Port to listen on
    #[arg(long, default_value_t = 8123)]
    pub port: u16,

    /// Host to bind to (use 0.0.0.0 for Docker)
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let config = Config::try_parse_from(["weather-mcp"]).expect("config should parse");
        assert_eq!(config.port, 8123);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(
            config.bind_socket().expect("valid socket").to_string(),
            "0.0.0.0:8123"
        );
    }

    #[test]
    fn parse_overrides() {
        let config = Config::try_parse_from(["weather-mcp", "--port", "9000", "--host", "127.0.0.1"])
            .expect("config should parse");
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn invalid_host_fails_socket_parse() {
        let config = Config::try_parse_from(["weather-mcp", "--host", "not a host"])
            .expect("config should parse");
        let err = config.bind_socket().expect_err("expected invalid socket");
        assert!(matches!(err, ConfigError::InvalidSocket));
    }
}
