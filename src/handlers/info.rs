//! Build information endpoint handler.

use crate::{config::BuildInfo, models::InfoResponse};
use actix_web::{Error, Result, web};
use paperclip::actix::api_v2_operation;

/// Build information endpoint
///
/// Returns the service name with the build number and version it was
/// deployed with. Unset values are omitted.
#[api_v2_operation(
    summary = "Build Information",
    description = "Returns the service name, build number and build version.",
    tags("Service Utilities"),
    responses(
        (status = 200, description = "Successful response", body = InfoResponse)
    )
)]
pub async fn info(build: web::Data<BuildInfo>) -> Result<web::Json<InfoResponse>, Error> {
    Ok(web::Json(InfoResponse {
        service: build.service.clone(),
        build: build.build_number.clone(),
        version: build.build_version.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    async fn call_info(build: BuildInfo) -> serde_json::Value {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(build))
                .route("/info", web::get().to(info)),
        )
        .await;

        let req = test::TestRequest::get().uri("/info").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        test::read_body_json(resp).await
    }

    #[actix_web::test]
    async fn test_info_with_build_details() {
        let body = call_info(BuildInfo {
            service: "svc".to_string(),
            build_number: Some("42".to_string()),
            build_version: Some("1.2.3".to_string()),
        })
        .await;

        assert_eq!(body, serde_json::json!({ "service": "svc", "build": "42", "version": "1.2.3" }));
    }

    #[actix_web::test]
    async fn test_info_omits_unset_values() {
        let body = call_info(BuildInfo {
            service: "svc".to_string(),
            build_number: None,
            build_version: None,
        })
        .await;

        assert_eq!(body, serde_json::json!({ "service": "svc" }));
    }
}
