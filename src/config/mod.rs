//! Configuration structures and loading utilities.
//!
//! `ApplicationConfig` is validated once from the environment; every other
//! configuration structure here is derived from it at composition time.

pub mod application;
pub mod auth;
pub mod bugsnag;
pub mod build_info;
pub mod logging;

pub use application::*;
pub use auth::*;
pub use bugsnag::*;
pub use build_info::*;
pub use logging::*;
