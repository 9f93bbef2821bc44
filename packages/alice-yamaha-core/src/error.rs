//! Centralized error types for the Alice Yamaha core library.
//!
//! This module provides a unified error handling system that:
//! - Defines structured error types using `thiserror`
//! - Maps errors to appropriate HTTP status codes
//! - Implements `IntoResponse` for automatic JSON error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::capabilities::RegistryError;
use crate::receiver::discovery::DiscoveryError;
use crate::receiver::ync::YncError;
use crate::utils::ControlUrlError;

/// Trait for error types that provide machine-readable error codes.
///
/// Implement this trait to provide consistent error codes across different
/// error conversion paths.
pub trait ErrorCode {
    /// Returns a machine-readable error code for API responses.
    fn code(&self) -> &'static str;
}

impl ErrorCode for DiscoveryError {
    fn code(&self) -> &'static str {
        match self {
            Self::SocketBind(_) => "socket_bind_failed",
            Self::NoInterfaces => "no_network_interfaces",
            Self::Description(_) => "description_fetch_failed",
            Self::NotYamahaDevice(_) => "not_yamaha_device",
        }
    }
}

impl ErrorCode for YncError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::HttpStatus(_, _) => "http_error_status",
            Self::ResponseCode(_) => "ync_error_response",
            Self::Parse => "ync_parse_error",
        }
    }
}

impl ErrorCode for AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidToken => "invalid_token",
            Self::UserNotAllowed(_) => "user_not_allowed",
            Self::Http(_) => "identity_request_failed",
            Self::Provider(_) => "identity_provider_error",
        }
    }
}

/// Application-wide error type for the adapter.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum BridgeError {
    /// No credential, or the identity provider rejected it.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated user is not on the allow-list.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Action request names a capability kind the registry does not know.
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// Client sent an invalid or malformed request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Receiver I/O failed while serving a query or action.
    #[error("Receiver error: {0}")]
    Receiver(String),

    /// Receiver discovery failed.
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// Identity provider could not be reached or answered unexpectedly.
    #[error("Identity provider error: {0}")]
    Identity(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Server configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BridgeError {
    /// Returns a machine-readable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::UnknownCapability(_) => "unknown_capability",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Receiver(_) => "receiver_error",
            Self::Discovery(_) => "discovery_failed",
            Self::Identity(_) => "identity_provider_error",
            Self::Internal(_) => "internal_error",
            Self::Configuration(_) => "configuration_error",
        }
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::UnknownCapability(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Identity(_) => StatusCode::BAD_GATEWAY,
            Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

// Re-export Result type aliases from their defining modules
pub use crate::receiver::discovery::DiscoveryResult;
pub use crate::receiver::ync::YncResult;

/// Convenient Result alias for application-wide operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// JSON response body for error responses.
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    status: u16,
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("[API] {} ({})", self, self.code());
        }
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<YncError> for BridgeError {
    fn from(err: YncError) -> Self {
        Self::Receiver(format!("{} ({})", err, err.code()))
    }
}

impl From<DiscoveryError> for BridgeError {
    fn from(err: DiscoveryError) -> Self {
        Self::Discovery(format!("{} ({})", err, err.code()))
    }
}

impl From<RegistryError> for BridgeError {
    fn from(err: RegistryError) -> Self {
        Self::UnknownCapability(err.to_string())
    }
}

impl From<ControlUrlError> for BridgeError {
    fn from(err: ControlUrlError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<AuthError> for BridgeError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential | AuthError::InvalidToken => {
                Self::Unauthorized(err.to_string())
            }
            AuthError::UserNotAllowed(_) => Self::Forbidden(err.to_string()),
            AuthError::Http(_) | AuthError::Provider(_) => Self::Identity(err.to_string()),
        }
    }
}
