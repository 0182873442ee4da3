//! Configurable Module Example - an Actix Web service demonstrating a
//! configurable upstream client module.
//!
//! The service validates its configuration at startup, then exposes:
//! - `GET /` - the upstream `objects` resource, proxied verbatim
//! - `GET /healthz` - liveness probe
//! - `GET /info` - build information
//! - `/swagger` - OpenAPI documentation
//!
//! ## Architecture
//!
//! - `config/` - Environment loading, validation and derived options
//! - `handlers/` - HTTP request handlers for each endpoint
//! - `middleware/` - Request IDs and error-to-response translation
//! - `models/` - Request/response models and the caller identity extractor
//! - `services/` - Outer service client, crash reporting and authentication
//! - `app` - Composition root
//!
//! ## Quick Start
//!
//! ```no_run
//! use configurable_module_example::{AppModule, ApplicationConfig, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::load()?;
//!     let module = AppModule::bootstrap(config).await?;
//!     let _app = create_app(&module);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

pub use app::{APPLICATION_NAME, AppModule, StartupError, create_app};
pub use config::{ApplicationConfig, ConfigError, LoggerOptions};
pub use error::ApiError;
pub use handlers::{create_openapi_spec, get_user_data, healthz, info};
pub use middleware::{ExceptionsFilter, RequestIdMiddleware};
pub use models::{AuthenticatedUser, ErrorResponse, HealthResponse, InfoResponse};
pub use services::{Auth0Guard, BugsnagClient, OuterModuleOptions, OuterService};
