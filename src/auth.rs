//! Bearer-token gate for the MCP endpoint
//!
//! Tokens are Google-issued RS256 JWTs, verified against the JWKS published
//! at Google's well-known certs endpoint. Verification happens before any
//! JSON-RPC or tool code runs; failures are plain 401 responses, never
//! redirects.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::{
    config::{GOOGLE_ISSUER, GOOGLE_JWKS_URI},
    errors::AppError,
    AppState,
};

/// Identity extracted from a verified bearer token. Lives for one request
/// and is used only for logging.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub client_id: String,
    pub subject: String,
}

#[derive(Debug, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    #[serde(default)]
    pub azp: Option<String>,
    #[serde(default)]
    pub aud: Option<String>,
    pub exp: u64,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AccessToken, AppError>;
}

/// Verifies Google OAuth bearer tokens. The key set is fetched per
/// verification; no token or key material is cached across requests.
pub struct GoogleTokenVerifier {
    http: reqwest::Client,
    jwks_uri: String,
    issuer: String,
}

impl GoogleTokenVerifier {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            jwks_uri: GOOGLE_JWKS_URI.to_string(),
            issuer: GOOGLE_ISSUER.to_string(),
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AppError> {
        let response = self
            .http
            .get(&self.jwks_uri)
            .send()
            .await
            .map_err(|err| AppError::internal(format!("failed to fetch jwks: {err}")))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "jwks endpoint returned status {}",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|err| AppError::internal(format!("failed to parse jwks: {err}")))
    }
}

#[async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AccessToken, AppError> {
        let header = decode_header(token)
            .map_err(|_| AppError::unauthorized("invalid_token", "malformed bearer token"))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::unauthorized("invalid_token", "token is missing a key id"))?;

        let jwks = self.fetch_jwks().await?;
        let jwk = jwks.find(&kid).ok_or_else(|| {
            AppError::unauthorized("invalid_token", "token signed by unknown key")
        })?;
        let decoding_key = DecodingKey::from_jwk(jwk)
            .map_err(|err| AppError::internal(format!("unusable jwk in key set: {err}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.validate_aud = false;

        let decoded = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(map_jwt_error)?;

        Ok(claims_to_access_token(decoded.claims))
    }
}

pub fn claims_to_access_token(claims: Claims) -> AccessToken {
    let client_id = claims
        .azp
        .or(claims.aud)
        .unwrap_or_else(|| claims.sub.clone());
    AccessToken {
        client_id,
        subject: claims.sub,
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AppError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => {
            AppError::unauthorized("expired_token", "bearer token is expired")
        }
        ErrorKind::InvalidIssuer => {
            AppError::unauthorized("invalid_issuer", "bearer token issuer is not accepted")
        }
        _ => AppError::unauthorized("invalid_token", "bearer token failed verification"),
    }
}

pub async fn require_bearer_token(
    State(state): State<AppState>,
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(TypedHeader(auth)) = auth_header else {
        return Err(AppError::unauthorized(
            "missing_token",
            "missing authorization header",
        ));
    };

    let access_token = state.verifier.verify(auth.token()).await?;
    request.extensions_mut().insert(access_token);
    Ok(next.run(request).await)
}
