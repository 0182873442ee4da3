mod common;

use actix_web::{http::StatusCode, test};
use configurable_module_example::{
    AppModule, BugsnagClient, create_app,
    config::{BugsnagConfig, ReleaseStage},
    services::{Delivery, ErrorEvent},
};
use common::{spawn_recorder, spawn_upstream, test_config, wait_for_requests};
use std::time::Duration;

/// A 5xx in an enabled release stage posts exactly one v5 event.
#[actix_web::test]
async fn test_server_error_is_reported_in_enabled_stage() {
    let (endpoint, received) = spawn_recorder();
    let base_url = spawn_upstream("", 503, r#"{"error":"down"}"#);

    let mut config = test_config(&base_url);
    config.bugsnag_release_stage = ReleaseStage::StagingExternalEcs;
    config.bugsnag_endpoint = Some(endpoint);
    config.build_version = Some("3.1.4".to_string());
    let module = AppModule::bootstrap(config).await.unwrap();
    let app = test::init_service(create_app(&module)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let requests = wait_for_requests(&received, 1).await;
    actix_web::rt::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(received.lock().unwrap().len(), 1, "expected exactly one event");

    let request = &requests[0];
    assert_eq!(request.api_key.as_deref(), Some("test-bugsnag-key"));
    assert_eq!(request.payload_version.as_deref(), Some("5"));

    let event = &request.body["events"][0];
    assert_eq!(event["exceptions"][0]["errorClass"], "InternalServerError");
    assert_eq!(event["unhandled"], true);
    assert_eq!(event["context"], "GET /");
    assert_eq!(event["app"]["releaseStage"], "staging-external-ecs");
    assert_eq!(event["app"]["version"], "3.1.4");
}

#[actix_web::test]
async fn test_nothing_is_reported_in_test_stage() {
    let (endpoint, received) = spawn_recorder();
    let base_url = spawn_upstream("", 503, "{}");

    let mut config = test_config(&base_url);
    config.bugsnag_endpoint = Some(endpoint);
    let module = AppModule::bootstrap(config).await.unwrap();
    let app = test::init_service(create_app(&module)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    actix_web::rt::time::sleep(Duration::from_millis(200)).await;
    assert!(received.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_client_errors_are_not_reported() {
    let (endpoint, received) = spawn_recorder();

    let mut config = test_config(&common::closed_port_url());
    config.bugsnag_release_stage = ReleaseStage::ProductionExternalEcs;
    config.bugsnag_endpoint = Some(endpoint);
    let module = AppModule::bootstrap(config).await.unwrap();
    let app = test::init_service(create_app(&module)).await;

    let req = test::TestRequest::get().uri("/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    actix_web::rt::time::sleep(Duration::from_millis(200)).await;
    assert!(received.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_notify_delivers_redacted_message() {
    let (endpoint, received) = spawn_recorder();
    let client = BugsnagClient::new(BugsnagConfig {
        api_key: "key-123".to_string(),
        release_stage: ReleaseStage::ProductionExternalEcs,
        enabled_release_stages: vec![ReleaseStage::ProductionExternalEcs],
        app_version: "1.0.0".to_string(),
        auto_detect_errors: true,
        endpoint,
    })
    .unwrap();

    let event = ErrorEvent::new("UpstreamError", r#"failed for jane@example.com with {"token": "s3cr3t"}"#)
        .with_request("GET", "/");
    let delivery = client.notify(event).await.unwrap();
    assert_eq!(delivery, Delivery::Sent);

    let requests = wait_for_requests(&received, 1).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].api_key.as_deref(), Some("key-123"));

    let message = requests[0].body["events"][0]["exceptions"][0]["message"].as_str().unwrap();
    assert!(!message.contains("jane@example.com"));
    assert!(!message.contains("s3cr3t"));
    assert!(message.contains("[REDACTED]"));
    assert_eq!(requests[0].body["events"][0]["unhandled"], false);
}
