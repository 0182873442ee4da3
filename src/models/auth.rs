//! Authentication-related data models.

use crate::{error::ApiError, services::Auth0Guard};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use paperclip::actix::Apiv2Security;
use serde::{Deserialize, Serialize};
use std::{future::Future, pin::Pin};

/// Claims carried by a verified access token
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Caller identity resolved by the authentication guard
///
/// Handlers take this extractor to require authentication. When the guard is
/// disabled (or not registered) every request resolves to an anonymous user.
#[derive(Apiv2Security, Clone, Debug, Deserialize)]
#[openapi(
    apiKey,
    in = "header",
    name = "Authorization",
    description = "Enter your bearer token in the format 'Bearer <token>'"
)]
pub struct AuthenticatedUser {
    pub claims: Option<Claims>,
}

impl AuthenticatedUser {
    pub fn anonymous() -> Self {
        Self { claims: None }
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.sub.as_str())
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let guard = req.app_data::<web::Data<Auth0Guard>>().cloned();
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let path = req.path().to_string();

        Box::pin(async move {
            let Some(guard) = guard else {
                return Ok(Self::anonymous());
            };

            match guard.authenticate(authorization.as_deref()).await {
                Ok(claims) => Ok(Self { claims }),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Rejected unauthenticated request");
                    Err(ApiError::Unauthorized)
                }
            }
        })
    }
}
