//! Error types returned by typed handlers.
//!
//! [`HandlerError`] is what a typed handler returns on failure. It maps to an
//! HTTP status code and renders as the JSON error envelope:
//!
//! ```json
//! {"error": {"code": "NOT_FOUND", "message": "Not found: item 7"}, "request_id": "..."}
//! ```

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::types::{Response, ResponseExt};

/// Result type alias using [`HandlerError`].
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Errors produced while binding or executing a typed handler.
///
/// # Example
///
/// ```
/// use routedoc_core::HandlerError;
///
/// fn find(id: u64) -> Result<String, HandlerError> {
///     if id == 0 {
///         return Err(HandlerError::not_found("item 0"));
///     }
///     Ok(format!("item {id}"))
/// }
///
/// assert_eq!(find(0).unwrap_err().status_code(), http::StatusCode::NOT_FOUND);
/// ```
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The request could not be bound to the handler's input type.
    #[error("Bind error: {message}")]
    Bind {
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// Conflict with the current state of a resource.
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message.
        message: String,
    },

    /// Any other status chosen by the handler.
    #[error("{message}")]
    Status {
        /// The status to respond with.
        status: StatusCode,
        /// Human-readable error message.
        message: String,
    },

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl HandlerError {
    /// Creates a bind error.
    #[must_use]
    pub fn bind(message: impl Into<String>) -> Self {
        Self::Bind {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an error with an arbitrary status code.
    #[must_use]
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping an underlying cause.
    #[must_use]
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Bind { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Status { status, .. } => *status,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Bind { .. } => "BIND_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Status { .. } => "ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    /// Renders this error as a JSON response.
    #[must_use]
    pub fn into_response(self, request_id: Option<&str>) -> Response {
        let envelope = self.to_envelope(request_id);
        match serde_json::to_vec(&envelope) {
            Ok(body) => Response::with_body(self.status_code(), "application/json", body),
            Err(_) => Response::json_error(self.status_code(), self.error_code(), &self.to_string()),
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::bind(err.to_string())
    }
}

/// The JSON error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request that failed, for log correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// The `error` object inside an [`ErrorEnvelope`].
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}
