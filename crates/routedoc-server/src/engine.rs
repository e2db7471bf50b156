//! The routing engine.
//!
//! An [`Engine`] owns the route table and turns a [`Request`] into a
//! [`Response`] by running the matching handler chain. It is cheap to clone;
//! all clones share the same table.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderValue, ALLOW};
use http::{Method, StatusCode};
use http_body_util::BodyExt;
use parking_lot::RwLock;
use routedoc_core::{BoxedHandler, Context, Next, Params, Request, Response, ResponseExt};
use routedoc_router::{RouteError, Router};

use crate::group::RouterGroup;

/// Header carrying the request id on every response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A registered handler chain.
pub type Chain = Arc<[BoxedHandler]>;

/// Routes requests to handler chains.
///
/// # Example
///
/// ```
/// use http::{Method, StatusCode};
/// use routedoc_core::{handler_fn, Response, ResponseExt};
/// use routedoc_server::Engine;
///
/// # tokio_test::block_on(async {
/// let engine = Engine::new();
/// engine
///     .root_group()
///     .handle(Method::GET, "/ping", vec![handler_fn("ping", |_ctx, _next| {
///         Box::pin(async { Response::with_body(StatusCode::OK, "text/plain", "pong") })
///     })])
///     .unwrap();
///
/// let request = http::Request::get("/ping")
///     .body(http_body_util::Full::new(bytes::Bytes::new()))
///     .unwrap();
/// let response = engine.dispatch(request).await;
/// assert_eq!(response.status(), StatusCode::OK);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

#[derive(Default)]
struct EngineInner {
    router: RwLock<Router<Chain>>,
    middleware: RwLock<Vec<BoxedHandler>>,
}

impl Engine {
    /// Creates an engine with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the group rooted at `/`.
    #[must_use]
    pub fn root_group(&self) -> RouterGroup {
        RouterGroup::new(self.clone())
    }

    /// Adds middleware that runs before every matched route, including
    /// routes registered earlier.
    pub fn use_middleware(&self, handlers: impl IntoIterator<Item = BoxedHandler>) {
        self.inner.middleware.write().extend(handlers);
    }

    /// Registers a handler chain for `method` on `path`.
    ///
    /// A chain already registered for the same method and pattern is
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] if the method cannot be routed or the pattern
    /// conflicts with an existing one.
    pub fn add_route(
        &self,
        method: &Method,
        path: &str,
        handlers: Vec<BoxedHandler>,
    ) -> Result<(), RouteError> {
        let handler_names: Vec<&str> = handlers.iter().map(|h| h.name()).collect();
        tracing::debug!(
            method = %method,
            path = %path,
            handlers = ?handler_names,
            "route added"
        );

        let replaced = self.inner.router.write().route(method, path, handlers.into())?;
        if replaced.is_some() {
            tracing::warn!(method = %method, path = %path, "route replaced");
        }
        Ok(())
    }

    /// Number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.inner.router.read().len()
    }

    /// Runs the chain matching `request`.
    ///
    /// Unknown paths get `404`, known paths without the method get `405`
    /// with an `Allow` header. Every response carries `x-request-id`.
    pub async fn dispatch(&self, request: Request) -> Response {
        let (parts, body) = request.into_parts();
        let body: Bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(never) => match never {},
        };

        let method = parts.method.clone();
        let path = parts.uri.path().to_string();

        let (chain, params) = {
            let router = self.inner.router.read();
            match router.match_route(&method, &path) {
                Some(found) => (Some(Arc::clone(found.value)), found.params),
                None => (None, Params::new()),
            }
        };

        let mut ctx = Context::builder()
            .method(parts.method)
            .parsed_uri(parts.uri)
            .headers(parts.headers)
            .body(body)
            .params(params)
            .build();
        let request_id = ctx.request_id();
        routedoc_telemetry::log_request_start!(request_id, method, path);

        let mut response = match chain {
            Some(chain) => {
                let handlers: Vec<BoxedHandler> = self
                    .inner
                    .middleware
                    .read()
                    .iter()
                    .cloned()
                    .chain(chain.iter().cloned())
                    .collect();
                Next::new(&handlers).run(&mut ctx).await
            }
            None => self.unmatched(&path, &method),
        };

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let status = response.status().as_u16();
        let duration_ms = ctx.elapsed().as_secs_f64() * 1000.0;
        if response.status().is_server_error() {
            routedoc_telemetry::log_request_error!(request_id, format!("status {status}"));
        }
        routedoc_telemetry::log_request_complete!(request_id, method, path, status, duration_ms);
        response
    }

    fn unmatched(&self, path: &str, method: &Method) -> Response {
        let allowed = self.inner.router.read().allowed_methods(path);
        if allowed.is_empty() {
            return Response::json_error(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                &format!("no route for {path}"),
            );
        }

        let mut response = Response::json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            &format!("{method} is not allowed on {path}"),
        );
        let allow = allowed
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if let Ok(value) = HeaderValue::from_str(&allow) {
            response.headers_mut().insert(ALLOW, value);
        }
        response
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("routes", &self.route_count())
            .field("middleware", &self.inner.middleware.read().len())
            .finish()
    }
}
