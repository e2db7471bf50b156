//! Radix tree router and path utilities for RouteDoc.
//!
//! The router is generic over the value stored per `(method, path)`, so the
//! server can keep whole handler chains in it while tests can store plain
//! strings.
//!
//! # Features
//!
//! - **Radix Tree Matching**: O(k) path lookup
//! - **Path Parameters**: `/items/{id}` and `/items/:id` are equivalent
//! - **Wildcards**: catch-all routes (`/files/*path`)
//! - **Path Joining**: [`join_paths`] resolves a group base path against a
//!   route segment while keeping a trailing slash
//!
//! # Example
//!
//! ```rust
//! use routedoc_router::{join_paths, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! let path = join_paths("/items", ":id");
//! router.route(&Method::GET, &path, "getItem").unwrap();
//!
//! let found = router.match_route(&Method::GET, "/items/7").unwrap();
//! assert_eq!(*found.value, "getItem");
//! assert_eq!(found.params.get("id"), Some("7"));
//! ```

mod method_router;
mod node;
mod params;
mod path;
mod router;

pub use method_router::{MethodRouter, ROUTABLE_METHODS};
pub use node::{Node, SegmentKind};
pub use params::{Mark, Params};
pub use path::{clean_path, join_paths, pattern_key};
pub use router::Router;

/// A matched route with its value and extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the matched route and method
    pub value: &'a T,
    /// Extracted path parameters
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(value: &'a T, params: Params) -> Self {
        Self { value, params }
    }
}

/// Errors raised while inserting a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The method cannot be routed (e.g. CONNECT or an extension method).
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// A catch-all segment was followed by more segments.
    #[error("catch-all must be the last segment in path '{0}'")]
    WildcardNotLast(String),

    /// Two patterns declare different parameter names at the same position.
    #[error("parameter '{new}' in path '{path}' conflicts with existing '{existing}'")]
    ParamConflict {
        /// The pattern being inserted
        path: String,
        /// The segment already present in the tree
        existing: String,
        /// The conflicting segment from the new pattern
        new: String,
    },
}
