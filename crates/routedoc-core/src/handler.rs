//! Handler chain types.
//!
//! Every route owns an ordered chain of [`Handler`]s. Middleware and the final
//! endpoint share the same trait: each receives the request [`Context`] and a
//! [`Next`] for the rest of the chain. A handler that does not call
//! `next.run()` short-circuits the chain.
//!
//! # Example
//!
//! ```
//! use routedoc_core::{handler_fn, BoxedHandler};
//!
//! let logging: BoxedHandler = handler_fn("logging", |ctx, next| {
//!     Box::pin(async move {
//!         tracing::debug!(path = %ctx.path(), "before");
//!         next.run(ctx).await
//!     })
//! });
//! assert_eq!(logging.name(), "logging");
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::StatusCode;

use crate::context::Context;
use crate::meta::RouteMeta;
use crate::types::{Response, ResponseExt};

/// A boxed future that returns a response.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// One element of a route's handler chain.
pub trait Handler: Send + Sync + 'static {
    /// Returns the handler's display name, used in logs.
    fn name(&self) -> &str;

    /// Processes the request.
    ///
    /// Call `next.run(ctx)` to continue with the rest of the chain.
    fn call<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, Response>;

    /// Returns the route metadata when this handler was produced by
    /// [`typed`](crate::typed()).
    ///
    /// Plain middleware returns `None`.
    fn route_meta(&self) -> Option<&RouteMeta> {
        None
    }
}

impl fmt::Debug for dyn Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name())
            .field("typed", &self.route_meta().is_some())
            .finish()
    }
}

/// The remainder of a handler chain.
///
/// Consumed by [`Next::run`], so it can be invoked at most once.
pub struct Next<'a> {
    remaining: &'a [BoxedHandler],
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will run `chain` from its first handler.
    #[must_use]
    pub fn new(chain: &'a [BoxedHandler]) -> Self {
        Self { remaining: chain }
    }

    /// Number of handlers left to run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// Returns true when the chain is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Invokes the next handler in the chain.
    ///
    /// An exhausted chain answers `200 OK` with an empty body.
    pub fn run(self, ctx: &'a mut Context) -> BoxFuture<'a, Response> {
        match self.remaining.split_first() {
            Some((head, rest)) => head.call(ctx, Next { remaining: rest }),
            None => Box::pin(async { Response::empty(StatusCode::OK) }),
        }
    }
}

/// A handler built from a closure.
///
/// See [`handler_fn`].
pub struct FnHandler<F> {
    name: String,
    func: F,
}

impl<F> FnHandler<F> {
    /// Creates a new function-based handler.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Response> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, Response> {
        (self.func)(ctx, next)
    }
}

/// Wraps a closure as a shared handler.
pub fn handler_fn<F>(name: impl Into<String>, func: F) -> BoxedHandler
where
    F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Response> + Send + Sync + 'static,
{
    Arc::new(FnHandler::new(name, func))
}
