//! Service layer: outbound integrations and request guards.
//!
//! This module contains the outer service client, the Bugsnag crash
//! reporter and the Auth0 authentication guard.

pub mod auth;
pub mod bugsnag;
pub mod outer_service;

pub use auth::*;
pub use bugsnag::*;
pub use outer_service::*;
