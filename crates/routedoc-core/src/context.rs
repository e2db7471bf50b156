//! Per-request context.
//!
//! A [`Context`] is created by the engine for every request and handed down
//! the handler chain. Besides the request parts it carries a small string-keyed
//! value store that middleware uses to pass data to later handlers.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use routedoc_router::Params;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps request ids sortable in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value stored in the context.
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// Per-request state that flows through the handler chain.
///
/// Cloning a context is cheap: the body is reference counted and stored
/// values are shared `Arc`s. A clone never leaks into another request.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use routedoc_core::Context;
///
/// let mut ctx = Context::builder().uri("/items?page=2").build();
/// ctx.set("tenant", Arc::new("acme".to_string()));
///
/// let tenant = ctx.get("tenant").and_then(|v| v.downcast::<String>().ok());
/// assert_eq!(tenant.as_deref().map(String::as_str), Some("acme"));
/// ```
#[derive(Clone)]
pub struct Context {
    request_id: RequestId,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
    values: HashMap<String, ContextValue>,
    started_at: Instant,
}

impl Context {
    /// Starts building a context.
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw request body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the path parameters extracted by the router.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns a single path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Decodes the query string into `T`.
    ///
    /// A missing query string decodes like an empty one.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(self.uri.query().unwrap_or(""))
    }

    /// Returns the query string as ordered key/value pairs.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query::<Vec<(String, String)>>().unwrap_or_default()
    }

    /// Stores a value under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: ContextValue) {
        self.values.insert(key.into(), value);
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ContextValue> {
        self.values.get(key).cloned()
    }

    /// Returns true if a value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Time since the request entered the engine.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("params", &self.params)
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Context`].
#[derive(Debug, Default)]
pub struct ContextBuilder {
    method: Method,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    params: Params,
}

impl ContextBuilder {
    /// Sets the request method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request URI. An unparsable URI falls back to `/`.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = uri.parse().ok();
        self
    }

    /// Sets an already parsed URI.
    #[must_use]
    pub fn parsed_uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the request headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the path parameters.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Builds the context with a fresh request id.
    #[must_use]
    pub fn build(self) -> Context {
        Context {
            request_id: RequestId::new(),
            method: self.method,
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            headers: self.headers,
            body: self.body,
            params: self.params,
            values: HashMap::new(),
            started_at: Instant::now(),
        }
    }
}
