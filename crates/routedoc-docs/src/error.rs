//! Error types for the document model.
//!
//! Every variant describes a registration that would leave the document
//! inconsistent. Callers on the registration path treat them as fatal.

use thiserror::Error;

/// Errors raised while building or serializing a document.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the document to JSON.
    #[error("Failed to serialize OpenAPI document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Failed to serialize the document to YAML.
    #[error("Failed to serialize OpenAPI document as YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// One component name would be bound to two different schemas.
    #[error("schema conflict for component '{name}': {reason}")]
    SchemaConflict {
        /// The component name.
        name: String,
        /// What differs.
        reason: String,
    },

    /// A different operation is already registered for the path and method.
    #[error("a different operation is already registered for {method} {path}")]
    OperationConflict {
        /// HTTP method.
        method: String,
        /// Route path.
        path: String,
    },

    /// The path routes to the same slot as an operation registered under
    /// another spelling, such as `/items/:id` and `/items/{id}`.
    #[error("{method} {path} is served by the same route as {method} {existing}")]
    RouteCollision {
        /// HTTP method.
        method: String,
        /// Route path.
        path: String,
        /// The path already registered for that route.
        existing: String,
    },

    /// The operation id is already used by another route.
    #[error("operation id '{operation_id}' is already used by {method} {path}")]
    DuplicateOperationId {
        /// The clashing id.
        operation_id: String,
        /// Method of the route that owns the id.
        method: String,
        /// Path of the route that owns the id.
        path: String,
    },

    /// The operation id is empty.
    #[error("operation id must not be empty")]
    EmptyOperationId,

    /// The same response code was declared twice on one operation.
    #[error("response '{code}' is declared more than once")]
    DuplicateResponse {
        /// The status code key.
        code: String,
    },

    /// A response key is neither `default` nor a status code.
    #[error("invalid response code '{code}'")]
    InvalidResponseCode {
        /// The rejected key.
        code: String,
    },

    /// The method has no slot in an OpenAPI path item.
    #[error("unsupported method '{0}'")]
    UnsupportedMethod(String),
}

/// Result type for document operations.
pub type DocsResult<T> = Result<T, DocsError>;
