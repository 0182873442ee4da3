//! Application composition root.
//!
//! [`AppModule::bootstrap`] builds every shared service once from the
//! validated configuration; [`create_app`] mounts them into an actix `App`
//! for each server worker.

use crate::{
    config::{ApplicationConfig, AuthenticationConfig, BugsnagConfig, BuildInfo},
    error::ApiError,
    handlers::{SWAGGER_JSON_PATH, SWAGGER_PATH, create_openapi_spec, get_user_data, healthz, info},
    logging::LoggingError,
    middleware::{ExceptionsFilter, RequestIdMiddleware},
    services::{Auth0Guard, AuthError, BugsnagClient, BugsnagError, OuterModuleOptions, OuterService, OuterServiceError},
};
use actix_web::{
    App, HttpRequest, HttpResponse,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
};
use paperclip::actix::{OpenApiExt, web};

/// Service name reported by `/info` and used as the logger name
pub const APPLICATION_NAME: &str = "configurable-module-example-rest-api";

/// URL prefix for static assets
pub const STATIC_ROUTE: &str = "/static";

/// Directory static assets are served from, relative to the working directory
pub const STATIC_DIR: &str = "public";

/// Anything that stops the process before it starts serving
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    OuterService(#[from] OuterServiceError),

    #[error(transparent)]
    Bugsnag(#[from] BugsnagError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared services, built once and cloned into every worker
#[derive(Clone)]
pub struct AppModule {
    config: web::Data<ApplicationConfig>,
    build_info: web::Data<BuildInfo>,
    bugsnag: web::Data<BugsnagClient>,
    auth: web::Data<Auth0Guard>,
    outer_service: web::Data<OuterService>,
}

impl AppModule {
    pub async fn bootstrap(config: ApplicationConfig) -> Result<Self, StartupError> {
        let bugsnag = BugsnagClient::new(BugsnagConfig::from_config(&config))?;
        let auth = Auth0Guard::new(AuthenticationConfig::from_config(&config))?;
        let build_info = BuildInfo::from_config(APPLICATION_NAME, &config);
        let outer_service = OuterService::register_async(&config, |config| async move {
            OuterModuleOptions {
                base_url: config.base_url.clone(),
            }
        })
        .await?;

        Ok(Self {
            config: web::Data::new(config),
            build_info: web::Data::new(build_info),
            bugsnag: web::Data::new(bugsnag),
            auth: web::Data::new(auth),
            outer_service: web::Data::new(outer_service),
        })
    }

    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }
}

/// Build the actix application with middleware, routes and API docs.
pub fn create_app(
    module: &AppModule,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .wrap(ExceptionsFilter)
        .wrap(RequestIdMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(module.config.clone())
        .app_data(module.build_info.clone())
        .app_data(module.bugsnag.clone())
        .app_data(module.auth.clone())
        .app_data(module.outer_service.clone())
        .service(web::resource("/").route(web::get().to(get_user_data)))
        .service(web::resource("/healthz").route(web::get().to(healthz)))
        .service(web::resource("/info").route(web::get().to(info)))
        .with_json_spec_at(SWAGGER_JSON_PATH)
        .with_swagger_ui_at(SWAGGER_PATH)
        .build()
        .service(actix_files::Files::new(STATIC_ROUTE, STATIC_DIR))
        .default_service(actix_web::web::route().to(not_found))
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(format!("Cannot {} {}", req.method(), req.path())))
}
