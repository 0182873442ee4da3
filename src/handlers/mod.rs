//! HTTP request handlers for API endpoints.

pub mod health;
pub mod info;
pub mod openapi;
pub mod user_outer_service;

pub use health::*;
pub use info::*;
pub use openapi::*;
pub use user_outer_service::*;
