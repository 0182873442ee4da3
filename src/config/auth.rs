//! Authentication guard configuration.

use crate::config::ApplicationConfig;

/// Settings for bearer-token verification against an Auth0 tenant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticationConfig {
    pub domain: String,
    pub audience: String,
    pub auth0_enabled: bool,
    /// Tenant base URL with a trailing slash. Doubles as the expected issuer.
    pub tenant_url: String,
}

impl AuthenticationConfig {
    pub fn new(domain: impl Into<String>, audience: impl Into<String>, auth0_enabled: bool) -> Self {
        let domain = domain.into();
        let tenant_url = tenant_url(&domain);
        Self {
            domain,
            audience: audience.into(),
            auth0_enabled,
            tenant_url,
        }
    }

    pub fn from_config(config: &ApplicationConfig) -> Self {
        Self::new(
            config.auth0_domain.clone(),
            config.auth0_audience.clone(),
            config.auth0_enabled,
        )
    }

    /// Tenant host without scheme or trailing slash
    pub fn host(&self) -> &str {
        let domain = self.domain.trim_end_matches('/');
        domain
            .strip_prefix("https://")
            .or_else(|| domain.strip_prefix("http://"))
            .unwrap_or(domain)
    }

    /// Expected `iss` claim of tokens issued by the tenant
    pub fn issuer(&self) -> &str {
        &self.tenant_url
    }

    pub fn jwks_url(&self) -> String {
        format!("{}.well-known/jwks.json", self.tenant_url)
    }
}

/// A bare domain is served over https; an explicit scheme is kept.
fn tenant_url(domain: &str) -> String {
    let domain = domain.trim_end_matches('/');
    if domain.starts_with("https://") || domain.starts_with("http://") {
        format!("{domain}/")
    } else {
        format!("https://{domain}/")
    }
}
