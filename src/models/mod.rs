//! Data models shared by handlers, services and middleware.

pub mod api;
pub mod auth;

pub use api::*;
pub use auth::*;
