//! Error types for the Forkast SDK.
//!
//! Every fallible operation returns [`ForkastError`]. Per-endpoint failures
//! inside a fan-out are collected rather than propagated, so the variants
//! here double as the record of what each mirror did.

use std::time::Duration;
use thiserror::Error;

/// Main error type for the Forkast SDK.
#[derive(Error, Debug)]
pub enum ForkastError {
    /// Network-related errors (transport failures against one endpoint)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Non-2xx response from a Forkast endpoint. The message is already sanitized.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        endpoint: Option<String>,
    },

    /// A 2xx response whose payload did not have the expected shape
    #[error("{message}")]
    ResponseShape { message: String, keys: Vec<String> },

    /// Signing and credential errors. The message is shown to users as is.
    #[error("{message}")]
    Auth {
        message: String,
        kind: AuthErrorKind,
    },

    /// Configuration errors
    #[error("Config error: {message}")]
    Config { message: String },

    /// Input rejected before any network call
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Timeout errors
    #[error("Timeout: {operation} timed out after {duration:?}")]
    Timeout {
        duration: Duration,
        operation: String,
    },

    /// Internal errors (bugs)
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Authentication error subcategories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Secret could not be decoded or the MAC could not be computed
    SignatureError,
    /// The wallet declined to sign the attestation
    SignatureRejected,
    /// The wallet session expired before signing completed
    SessionExpired,
    /// A management call was attempted without issued credentials
    MissingCredentials,
}

impl ForkastError {
    /// Check if this error is retryable.
    ///
    /// The SDK never retries on its own; this is a hint for callers.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Api { status, .. } => *status == 429 || (*status >= 500 && *status < 600),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// True for 401/403 rejections, which mean the held credentials are dead.
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// HTTP status of a backend rejection, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Endpoint that produced this error, when it came from a fan-out call.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Api { endpoint, .. } => endpoint.as_deref(),
            _ => None,
        }
    }

    /// Short category label, used as a log field.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Api { .. } => "api",
            Self::ResponseShape { .. } => "response_shape",
            Self::Auth { .. } => "auth",
            Self::Config { .. } => "config",
            Self::Validation { .. } => "validation",
            Self::Timeout { .. } => "timeout",
            Self::Internal { .. } => "internal",
        }
    }

    /// Error text without the variant prefix, for user-facing notices.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Network { message, .. }
            | Self::Api { message, .. }
            | Self::ResponseShape { message, .. }
            | Self::Auth { message, .. }
            | Self::Config { message }
            | Self::Validation { message, .. }
            | Self::Internal { message, .. } => message.clone(),
            Self::Timeout { .. } => self.to_string(),
        }
    }
}

// Convenience constructors
impl ForkastError {
    /// Create a network error with source.
    pub fn network<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a network error without source.
    pub fn network_simple(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            endpoint: None,
        }
    }

    /// Create an API error attributed to an endpoint.
    pub fn api_at(status: u16, message: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a response shape error.
    pub fn response_shape(message: impl Into<String>, keys: Vec<String>) -> Self {
        Self::ResponseShape {
            message: message.into(),
            keys,
        }
    }

    /// Create a signing error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            kind: AuthErrorKind::SignatureError,
        }
    }

    /// Create an auth error of a given kind.
    pub fn auth_kind(message: impl Into<String>, kind: AuthErrorKind) -> Self {
        Self::Auth {
            message: message.into(),
            kind,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error for a named field.
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        Self::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with source.
    pub fn internal_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<reqwest::Error> for ForkastError {
    fn from(err: reqwest::Error) -> Self {
        // Timeouts carry their configured duration only at the transport
        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            Self::network("HTTP request failed", err)
        } else if err.is_builder() {
            Self::config(format!("Invalid HTTP request: {err}"))
        } else {
            Self::internal_with_source("Unexpected reqwest error", err)
        }
    }
}

impl From<url::ParseError> for ForkastError {
    fn from(err: url::ParseError) -> Self {
        Self::config(format!("Invalid URL: {err}"))
    }
}

// Sources are dropped on clone
impl Clone for ForkastError {
    fn clone(&self) -> Self {
        match self {
            Self::Network { message, .. } => Self::Network {
                message: message.clone(),
                source: None,
            },
            Self::Api {
                status,
                message,
                endpoint,
            } => Self::Api {
                status: *status,
                message: message.clone(),
                endpoint: endpoint.clone(),
            },
            Self::ResponseShape { message, keys } => Self::ResponseShape {
                message: message.clone(),
                keys: keys.clone(),
            },
            Self::Auth { message, kind } => Self::Auth {
                message: message.clone(),
                kind: kind.clone(),
            },
            Self::Config { message } => Self::Config {
                message: message.clone(),
            },
            Self::Validation { message, field } => Self::Validation {
                message: message.clone(),
                field: field.clone(),
            },
            Self::Timeout {
                duration,
                operation,
            } => Self::Timeout {
                duration: *duration,
                operation: operation.clone(),
            },
            Self::Internal { message, .. } => Self::Internal {
                message: message.clone(),
                source: None,
            },
        }
    }
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, ForkastError>;

/// Shorthand for [`ForkastError`].
pub type Error = ForkastError;
