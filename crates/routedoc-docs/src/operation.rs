//! The operation under construction.
//!
//! [`OperationInfo`] collects everything callers declare about a route before
//! it is turned into an OpenAPI [`Operation`](crate::Operation) by
//! [`Document::register_operation`](crate::Document::register_operation).

use http::StatusCode;
use indexmap::IndexMap;
use routedoc_core::TypeInfo;
use serde_json::Value;

use crate::openapi::{CodeSample, SecurityRequirement};

/// Declarative metadata for one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationInfo {
    /// Operation id. Must be non-empty once registered.
    pub id: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Whether the operation is deprecated.
    pub deprecated: bool,
    /// Status code of the default response.
    pub status_code: Option<StatusCode>,
    /// Description of the default response.
    pub status_description: Option<String>,
    /// Overrides the input type reported by the handler.
    pub input_model: Option<TypeInfo>,
    /// Additional responses, in declaration order.
    pub responses: Vec<OperationResponse>,
    /// Headers of the default response.
    pub headers: Vec<ResponseHeader>,
    /// Security requirements. `Some(vec![])` disables document-wide security.
    pub security: Option<Vec<SecurityRequirement>>,
    /// Request samples.
    pub code_samples: Vec<CodeSample>,
}

impl OperationInfo {
    /// Returns true when nothing has been declared.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An additional response declared on an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResponse {
    /// Status code, or `default`.
    pub code: String,
    /// Response description.
    pub description: String,
    /// Response body type.
    pub model: Option<TypeInfo>,
    /// Response headers.
    pub headers: Vec<ResponseHeader>,
    /// Single example.
    pub example: Option<Value>,
    /// Named examples.
    pub examples: IndexMap<String, Value>,
}

impl OperationResponse {
    /// Creates a response with only a code and description.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            model: None,
            headers: Vec::new(),
            example: None,
            examples: IndexMap::new(),
        }
    }
}

/// A response header.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseHeader {
    /// Header name.
    pub name: String,
    /// Header description.
    pub description: String,
    /// Header value type; string when absent.
    pub model: Option<TypeInfo>,
}

impl ResponseHeader {
    /// Creates a string-typed header.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            model: None,
        }
    }

    /// Sets the header value type.
    #[must_use]
    pub fn with_model(mut self, model: TypeInfo) -> Self {
        self.model = Some(model);
        self
    }
}
