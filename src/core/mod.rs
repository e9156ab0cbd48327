//! Core infrastructure: errors, endpoint configuration and message sanitizing.

mod endpoints;
mod error;
mod sanitize;

pub use endpoints::{
    clob_api_url, configured_endpoints, relayer_api_url, EndpointSet, CLOB_API_BASE,
    RELAYER_API_BASE,
};
pub use error::{AuthErrorKind, Error, ForkastError, Result};
pub use sanitize::{
    debug_errors_enabled, sanitize_message, DEBUG_ERRORS_ENV, GENERIC_FAILURE_MESSAGE,
    MAX_MESSAGE_CHARS, RATE_LIMITED_MESSAGE, REJECTED_CREDENTIALS_MESSAGE, UNAVAILABLE_MESSAGE,
};
