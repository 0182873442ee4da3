//! Global error-to-response translation.

use crate::{
    models::ErrorResponse,
    services::{BugsnagClient, ErrorEvent},
};
use actix_web::{
    Error, HttpResponse,
    body::{BodySize, BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::StatusCode,
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
};

/// Exception filter middleware factory
///
/// Every response that carries an error, or has an error status and no body,
/// is rewritten into an [`ErrorResponse`] body. Server errors lose their
/// message, are logged, and are reported to Bugsnag when automatic error
/// detection is on.
pub struct ExceptionsFilter;

impl<S, B> Transform<S, ServiceRequest> for ExceptionsFilter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ExceptionsFilterService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ExceptionsFilterService { service }))
    }
}

/// The actual exception filter service
pub struct ExceptionsFilterService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ExceptionsFilterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // The router needs sole ownership of the request, so only owned
        // details are kept across the inner call.
        let origin = RequestOrigin {
            method: req.method().to_string(),
            path: req.path().to_string(),
            bugsnag: req.app_data::<web::Data<BugsnagClient>>().cloned(),
        };
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let status = res.status();
                    let detail = match res.response().error() {
                        Some(error) => Some(error.to_string()),
                        None if is_bare_error(status, res.response().body().size()) => {
                            Some(canonical_reason(status).to_string())
                        }
                        None => None,
                    };
                    match detail {
                        Some(detail) => {
                            let response = translate(&origin, status, &detail);
                            Ok(res.into_response(response))
                        }
                        None => Ok(res.map_into_boxed_body()),
                    }
                }
                Err(error) => {
                    let status = error.as_response_error().status_code();
                    record(&origin, status, &error.to_string());
                    Err(error)
                }
            }
        })
    }
}

/// Owned request details needed after the inner service has run
struct RequestOrigin {
    method: String,
    path: String,
    bugsnag: Option<web::Data<BugsnagClient>>,
}

/// Error statuses produced without a body, e.g. the router's 405.
fn is_bare_error(status: StatusCode, size: BodySize) -> bool {
    (status.is_client_error() || status.is_server_error())
        && matches!(size, BodySize::None | BodySize::Sized(0))
}

fn canonical_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Error")
}

/// Render an error into the structured body.
fn translate(origin: &RequestOrigin, status: StatusCode, detail: &str) -> HttpResponse {
    let message = record(origin, status, detail);
    let body = ErrorResponse::new(status, message).with_path(&origin.path);
    HttpResponse::build(status).json(body)
}

/// Log the error, report server errors, and return the client-facing message.
fn record(origin: &RequestOrigin, status: StatusCode, detail: &str) -> String {
    if status.is_server_error() {
        tracing::error!(
            method = %origin.method,
            path = %origin.path,
            status = status.as_u16(),
            error = %detail,
            "Unhandled request error"
        );
        report(origin, status, detail);
        canonical_reason(status).to_string()
    } else {
        tracing::warn!(
            method = %origin.method,
            path = %origin.path,
            status = status.as_u16(),
            error = %detail,
            "Request failed"
        );
        detail.to_string()
    }
}

fn report(origin: &RequestOrigin, status: StatusCode, detail: &str) {
    let Some(bugsnag) = origin.bugsnag.clone() else {
        return;
    };
    if !bugsnag.is_enabled() || !bugsnag.config().auto_detect_errors {
        return;
    }

    let event = ErrorEvent::new(error_class(status), detail)
        .unhandled()
        .with_request(&origin.method, &origin.path);

    actix_web::rt::spawn(async move {
        if let Err(e) = bugsnag.notify(event).await {
            tracing::warn!(error = %e, "Failed to report error to Bugsnag");
        }
    });
}

/// `InternalServerError`, `BadGateway`, ...
fn error_class(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(|reason| reason.split_whitespace().collect::<String>())
        .unwrap_or_else(|| format!("HttpError{}", status.as_u16()))
}
