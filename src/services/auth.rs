//! Authentication guard for Auth0-issued bearer tokens.
//!
//! Tokens are verified against the tenant's JSON Web Key Set. The key set is
//! fetched on first use and refetched when a token names a key id that is not
//! in the cached set, at most once per [`JWKS_MIN_REFRESH_INTERVAL`].

use crate::{config::AuthenticationConfig, models::Claims};
use jsonwebtoken::{
    Algorithm, DecodingKey, Validation, decode, decode_header,
    jwk::{Jwk, JwkSet},
};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Minimum time between two key set fetches
pub const JWKS_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Reasons a request fails authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use the Bearer scheme")]
    InvalidScheme,

    #[error("Token header has no key id")]
    MissingKeyId,

    #[error("Token signing key {0} is not published by the tenant")]
    UnknownKey(String),

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to fetch signing keys: {0}")]
    Jwks(#[from] reqwest::Error),
}

/// Cached key set and the time of the last fetch attempt
#[derive(Default)]
struct KeyCache {
    keys: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.as_ref().and_then(|set| set.find(kid))
    }

    fn may_refresh(&self, interval: Duration) -> bool {
        self.fetched_at.is_none_or(|at| at.elapsed() >= interval)
    }
}

/// Verifies bearer tokens when Auth0 is enabled
pub struct Auth0Guard {
    config: AuthenticationConfig,
    http: Client,
    jwks: RwLock<KeyCache>,
    refresh_interval: Duration,
}

impl Auth0Guard {
    pub fn new(config: AuthenticationConfig) -> Result<Self, AuthError> {
        let http = Client::builder().build()?;

        tracing::info!(
            enabled = config.auth0_enabled,
            domain = %config.host(),
            audience = %config.audience,
            "Authentication guard configured"
        );

        Ok(Self {
            config,
            http,
            jwks: RwLock::new(KeyCache::default()),
            refresh_interval: JWKS_MIN_REFRESH_INTERVAL,
        })
    }

    /// Override the minimum time between key set fetches.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn config(&self) -> &AuthenticationConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.auth0_enabled
    }

    /// Authenticate the raw `Authorization` header value.
    ///
    /// Returns `Ok(None)` when the guard is disabled, the verified claims otherwise.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Option<Claims>, AuthError> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let token = bearer_token(authorization)?;
        let claims = self.verify(token).await?;

        tracing::debug!(subject = %claims.sub, "Bearer token verified");
        Ok(Some(claims))
    }

    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[self.config.issuer()]);

        let data = decode::<Claims>(token, &key, &validation)?;
        Ok(data.claims)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(jwk) = self.jwks.read().await.find(kid) {
            return Ok(DecodingKey::from_jwk(jwk)?);
        }

        // Held across the fetch so concurrent misses wait for one request.
        let mut cache = self.jwks.write().await;
        if let Some(jwk) = cache.find(kid) {
            return Ok(DecodingKey::from_jwk(jwk)?);
        }
        if !cache.may_refresh(self.refresh_interval) {
            tracing::debug!(kid = %kid, "Signing key refresh throttled");
            return Err(AuthError::UnknownKey(kid.to_string()));
        }

        cache.fetched_at = Some(Instant::now());
        cache.keys = Some(self.fetch_jwks().await?);

        match cache.find(kid) {
            Some(jwk) => Ok(DecodingKey::from_jwk(jwk)?),
            None => Err(AuthError::UnknownKey(kid.to_string())),
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = self.config.jwks_url();
        tracing::debug!(url = %url, "Fetching signing keys");

        let jwks = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        Ok(jwks)
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let value = authorization.ok_or(AuthError::MissingToken)?.trim();
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidScheme)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::InvalidScheme);
    }
    Ok(token)
}
