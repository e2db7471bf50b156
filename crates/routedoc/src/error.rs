//! Error types for route registration and operation lookup.
//!
//! [`RegistrationError`] is a startup misconfiguration: the panicking
//! registration methods abort with its message. [`ContextError`] is an
//! ordinary negative result handlers are expected to match on.

use http::Method;
use routedoc_docs::DocsError;
use routedoc_router::RouteError;
use routedoc_server::ServerError;
use routedoc_telemetry::TelemetryError;
use thiserror::Error;

/// A route could not be registered.
///
/// Every variant names the method and resolved path of the offending call.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// More than one handler in the chain is a typed handler.
    #[error("multiple typed handlers used for operation {method} {path}")]
    MultipleTypedHandlers {
        /// HTTP method.
        method: Method,
        /// Resolved path.
        path: String,
        /// Names of the typed handlers found.
        handlers: Vec<String>,
    },

    /// Handlers follow the typed handler, which always ends the chain.
    #[error("handlers {trailing:?} after typed handler '{handler}' would never run on operation {method} {path}")]
    HandlersAfterTyped {
        /// HTTP method.
        method: Method,
        /// Resolved path.
        path: String,
        /// Name of the typed handler.
        handler: String,
        /// Names of the handlers placed after it.
        trailing: Vec<String>,
    },

    /// The document model rejected the operation.
    #[error("error while generating OpenAPI document on operation {method} {path}: {source}")]
    Docs {
        /// HTTP method.
        method: Method,
        /// Resolved path.
        path: String,
        /// The document error.
        #[source]
        source: DocsError,
    },

    /// The router rejected the path or method.
    #[error("failed to route operation {method} {path}: {source}")]
    Route {
        /// HTTP method.
        method: Method,
        /// Resolved path.
        path: String,
        /// The router error.
        #[source]
        source: RouteError,
    },
}

impl RegistrationError {
    /// Method of the offending route.
    #[must_use]
    pub fn method(&self) -> &Method {
        match self {
            Self::MultipleTypedHandlers { method, .. }
            | Self::HandlersAfterTyped { method, .. }
            | Self::Docs { method, .. }
            | Self::Route { method, .. } => method,
        }
    }

    /// Resolved path of the offending route.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MultipleTypedHandlers { path, .. }
            | Self::HandlersAfterTyped { path, .. }
            | Self::Docs { path, .. }
            | Self::Route { path, .. } => path,
        }
    }
}

/// Result type for route registration.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// No operation could be read from a request context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// Nothing was published for this request.
    #[error("operation not found")]
    NotFound,

    /// The stored value is not an operation.
    #[error("invalid type: not an operation")]
    InvalidType,
}

/// Errors from the [`ApiDoc`](crate::ApiDoc) facade.
#[derive(Debug, Error)]
pub enum ApiDocError {
    /// The document handler was asked for an unknown content type.
    #[error("invalid content type '{0}', use JSON or YAML")]
    InvalidContentType(String),

    /// Mounting the document route failed.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Logging could not be initialized.
    #[error("failed to initialize logging: {0}")]
    Telemetry(#[from] TelemetryError),

    /// The server failed to start.
    #[error(transparent)]
    Server(#[from] ServerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_typed_handlers_message() {
        let err = RegistrationError::MultipleTypedHandlers {
            method: Method::GET,
            path: "/items/:id".to_string(),
            handlers: vec!["getItem".to_string(), "getItemV2".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "multiple typed handlers used for operation GET /items/:id"
        );
        assert_eq!(err.method(), Method::GET);
        assert_eq!(err.path(), "/items/:id");
    }

    #[test]
    fn test_handlers_after_typed_message() {
        let err = RegistrationError::HandlersAfterTyped {
            method: Method::GET,
            path: "/items/:id".to_string(),
            handler: "getItem".to_string(),
            trailing: vec!["audit".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "handlers [\"audit\"] after typed handler 'getItem' would never run on operation GET /items/:id"
        );
        assert_eq!(err.path(), "/items/:id");
    }

    #[test]
    fn test_docs_error_message() {
        let err = RegistrationError::Docs {
            method: Method::POST,
            path: "/items".to_string(),
            source: DocsError::EmptyOperationId,
        };
        assert_eq!(
            err.to_string(),
            "error while generating OpenAPI document on operation POST /items: operation id must not be empty"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_route_error_message() {
        let err = RegistrationError::Route {
            method: Method::CONNECT,
            path: "/tunnel".to_string(),
            source: RouteError::UnsupportedMethod("CONNECT".to_string()),
        };
        assert!(err.to_string().starts_with("failed to route operation CONNECT /tunnel"));
    }

    #[test]
    fn test_context_error_messages() {
        assert_eq!(ContextError::NotFound.to_string(), "operation not found");
        assert_eq!(ContextError::InvalidType.to_string(), "invalid type: not an operation");
    }

    #[test]
    fn test_invalid_content_type_message() {
        let err = ApiDocError::InvalidContentType("xml".to_string());
        assert_eq!(err.to_string(), "invalid content type 'xml', use JSON or YAML");
    }
}
