//! Custom middleware implementations for the API.
//!
//! This module contains the global exception filter and the request ID
//! middleware used for request logging.

pub mod exceptions;
pub mod request_id;

pub use exceptions::*;
pub use request_id::*;
