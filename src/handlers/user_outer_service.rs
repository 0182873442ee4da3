//! Outer service proxy endpoint handler.

use crate::{error::ApiError, models::AuthenticatedUser, services::OuterService};
use actix_web::{HttpResponse, web};
use paperclip::actix::api_v2_operation;

/// Outer service proxy endpoint
///
/// Fetches the upstream `objects` resource and returns it verbatim. Any
/// upstream failure becomes a generic 500.
#[api_v2_operation(
    summary = "User Data",
    description = "Returns the objects resource of the outer service unchanged.",
    tags("Outer Service"),
    responses(
        (status = 200, description = "Upstream payload"),
        (status = 401, description = "Unauthorized - Missing or invalid bearer token"),
        (status = 500, description = "Internal Server Error - Outer service unavailable")
    )
)]
pub async fn get_user_data(
    user: AuthenticatedUser,
    outer_service: web::Data<OuterService>,
) -> Result<HttpResponse, ApiError> {
    match outer_service.fetch_data().await {
        Ok(data) => Ok(HttpResponse::Ok().json(data)),
        Err(e) => {
            tracing::error!(
                subject = ?user.subject(),
                error = %e,
                "Failed to fetch user data from outer service"
            );
            Err(ApiError::InternalServerError)
        }
    }
}
