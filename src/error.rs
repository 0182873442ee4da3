//! HTTP-facing error type.

use crate::models::ErrorResponse;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use paperclip::actix::api_v2_errors;

/// Errors returned by request handlers and extractors
///
/// Server errors never carry detail; the cause is logged where it happens.
#[api_v2_errors(
    code = 401,
    description = "Unauthorized - Missing or invalid bearer token",
    code = 404,
    description = "Not Found",
    code = 500,
    description = "Internal Server Error"
)]
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("Internal Server Error")]
    InternalServerError,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.status_code(), self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("Cannot GET /x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InternalServerError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_message_is_generic() {
        assert_eq!(ApiError::InternalServerError.to_string(), "Internal Server Error");
    }
}
