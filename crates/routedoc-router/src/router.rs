//! High-level router API.

use http::Method;

use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::{RouteError, RouteMatch};

/// A radix tree router mapping `(method, path pattern)` to values of `T`.
///
/// # Example
///
/// ```rust
/// use routedoc_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.route(&Method::GET, "/items", "listItems").unwrap();
/// router.route(&Method::GET, "/items/:id", "getItem").unwrap();
///
/// let found = router.match_route(&Method::GET, "/items/42").unwrap();
/// assert_eq!(*found.value, "getItem");
/// assert_eq!(found.params.get("id"), Some("42"));
/// ```
///
/// # Route Priority
///
/// 1. **Static segments** (e.g., `/items/latest`)
/// 2. **Parameter segments** (e.g., `/items/{id}` or `/items/:id`)
/// 3. **Wildcard segments** (e.g., `/files/*path`)
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers `value` for a single method on a path pattern.
    ///
    /// Returns the value previously registered for the same method and
    /// pattern, if any; the new value replaces it.
    pub fn route(&mut self, method: &Method, path: &str, value: T) -> Result<Option<T>, RouteError> {
        let replaced = self.root.insert(path, method, value)?;
        if replaced.is_none() {
            self.route_count += 1;
        }
        Ok(replaced)
    }

    /// Merges a method router into the route for `path`.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) -> Result<(), RouteError> {
        self.root.insert_methods(path, methods)?;
        self.route_count += 1;
        Ok(())
    }

    /// Matches a path and method against the router.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let (methods, params) = self.root.match_path(path)?;
        let value = methods.resolve(method)?;
        Some(RouteMatch::new(value, params))
    }

    /// Matches a path without regard to method.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        self.root.match_path(path)
    }

    /// Returns the methods registered on the route matching `path`.
    ///
    /// An empty list means the path itself is unknown.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.root
            .match_path(path)
            .map(|(methods, _)| methods.allowed_methods())
            .unwrap_or_default()
    }

    /// Returns the number of routes registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
