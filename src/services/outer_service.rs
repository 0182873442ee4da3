//! Outer service client scoped to a configurable base URL.
//!
//! The service is registered either with static options or through an async
//! factory that derives the options from [`ApplicationConfig`]. Failures of the
//! outbound call are logged with full detail and then collapsed into
//! [`OuterServiceError::FetchFailed`].

use crate::config::ApplicationConfig;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use url::Url;

/// Path of the upstream resource, relative to the base URL.
pub const OBJECTS_PATH: &str = "objects";

/// Registration options for the outer service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OuterModuleOptions {
    pub base_url: String,
}

/// Errors produced by the outer service
#[derive(Debug, thiserror::Error)]
pub enum OuterServiceError {
    #[error("Invalid outer service base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Outer service request failed")]
    FetchFailed,
}

/// HTTP client bound to the outer service's base URL
#[derive(Clone, Debug)]
pub struct OuterService {
    client: Client,
    base_url: Url,
}

impl OuterService {
    /// Register with static options.
    pub fn register(options: OuterModuleOptions) -> Result<Self, OuterServiceError> {
        let base_url = Url::parse(&options.base_url).map_err(|source| {
            OuterServiceError::InvalidBaseUrl {
                url: options.base_url.clone(),
                source,
            }
        })?;
        let client = Client::builder().build()?;

        tracing::info!(base_url = %base_url, "Outer service registered");
        Ok(Self { client, base_url })
    }

    /// Register with options derived from the application configuration.
    pub async fn register_async<'a, F, Fut>(
        config: &'a ApplicationConfig,
        factory: F,
    ) -> Result<Self, OuterServiceError>
    where
        F: FnOnce(&'a ApplicationConfig) -> Fut,
        Fut: Future<Output = OuterModuleOptions>,
    {
        let options = factory(config).await;
        Self::register(options)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the upstream objects resource and return its JSON payload untouched.
    pub async fn fetch_data(&self) -> Result<Value, OuterServiceError> {
        let url = endpoint_url(&self.base_url, OBJECTS_PATH).map_err(|e| {
            tracing::error!(base_url = %self.base_url, error = %e, "Invalid outer service URL");
            OuterServiceError::FetchFailed
        })?;

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Outer service request failed");
            OuterServiceError::FetchFailed
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(url = %url, status = status.as_u16(), "Outer service returned error status");
            return Err(OuterServiceError::FetchFailed);
        }

        let data = response.json::<Value>().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to decode outer service response");
            OuterServiceError::FetchFailed
        })?;

        tracing::debug!(url = %url, status = status.as_u16(), "Data received from outer service");
        Ok(data)
    }
}

/// Append `path` to the base URL's path, keeping any prefix the base carries.
fn endpoint_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
}
