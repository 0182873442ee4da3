//! Liveness endpoint handler.

use crate::models::HealthResponse;
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

/// Liveness endpoint
///
/// Answers `ok` for as long as the process is able to serve requests. It does
/// not check the upstream service.
#[api_v2_operation(
    summary = "Liveness Probe",
    description = "Returns the liveness status of the service in JSON format.",
    tags("Service Utilities"),
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn healthz() -> Result<web::Json<HealthResponse>, Error> {
    Ok(web::Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
