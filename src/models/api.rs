//! API response models for standard endpoints.

use actix_web::http::StatusCode;
use chrono::Utc;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the liveness endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response model for the build information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct InfoResponse {
    /// Service name
    pub service: String,
    /// CI build number, omitted when not configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    /// Released version, omitted when not configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Structured body returned for every failed request
#[derive(Clone, Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct ErrorResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }
}
