//! # RouteDoc Docs
//!
//! The OpenAPI document model behind RouteDoc.
//!
//! This crate provides:
//! - **OpenAPI 3.1 types** with serde support
//! - **[`Document`]**: the shared registry of tags, operations and schema
//!   components that route groups write into while routes are registered
//! - **[`SchemaRegistry`]**: JSON Schema generation through `schemars`, with
//!   definitions promoted into `#/components/schemas`
//!
//! ## Quick Start
//!
//! ```
//! use http::Method;
//! use routedoc_core::TypeInfo;
//! use routedoc_docs::{Document, Info, OperationInfo, Tag};
//!
//! let mut doc = Document::with_info(Info::new("Items API", "1.0.0"));
//! doc.register_tag(Tag::new("items"));
//!
//! let info = OperationInfo {
//!     id: Some("getItemName".to_string()),
//!     summary: Some("Get the name of an item".to_string()),
//!     ..OperationInfo::default()
//! };
//! doc.register_operation(
//!     "/items/:id/name",
//!     &Method::GET,
//!     None,
//!     Some(&TypeInfo::of::<String>()),
//!     &["items".to_string()],
//!     &info,
//! )
//! .unwrap();
//!
//! let json = doc.to_json().unwrap();
//! assert!(json.contains("getItemName"));
//! ```

mod document;
mod error;
mod openapi;
mod operation;
mod schema;

pub use document::{Document, OPENAPI_VERSION};
pub use error::{DocsError, DocsResult};
pub use openapi::{
    CodeSample, Components, Contact, Example, ExternalDocumentation, Header, Info, License,
    MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem, RequestBody, Response, Schema,
    SecurityRequirement, SecurityScheme, Server, ServerVariable, Tag,
};
pub use operation::{OperationInfo, OperationResponse, ResponseHeader};
pub use schema::SchemaRegistry;
