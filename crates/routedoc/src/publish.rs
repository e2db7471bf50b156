//! Publishing operations into the request context.
//!
//! [`PublishOperation`] stands in for the typed handler of a documented
//! route. It stores the route's [`Operation`] under
//! [`OPERATION_CONTEXT_KEY`] and then runs the typed handler unchanged, so
//! code later in the request can call [`operation_from_context`].

use std::sync::Arc;

use routedoc_core::{BoxFuture, BoxedHandler, Context, ContextValue, Handler, Next, Response, RouteMeta};
use routedoc_docs::Operation;

use crate::error::ContextError;

/// Context key the operation is stored under.
pub const OPERATION_CONTEXT_KEY: &str = "_ctx_openapi_operation";

/// Decorates a typed handler with its documented operation.
pub struct PublishOperation {
    inner: BoxedHandler,
    operation: Arc<Operation>,
}

impl PublishOperation {
    /// Wraps `inner` so every request it sees carries `operation`.
    #[must_use]
    pub fn new(inner: BoxedHandler, operation: Arc<Operation>) -> Self {
        Self { inner, operation }
    }

    /// The published operation.
    #[must_use]
    pub fn operation(&self) -> &Arc<Operation> {
        &self.operation
    }

    /// The wrapped handler.
    #[must_use]
    pub fn inner(&self) -> &BoxedHandler {
        &self.inner
    }
}

impl Handler for PublishOperation {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn call<'a>(&'a self, ctx: &'a mut Context, next: Next<'a>) -> BoxFuture<'a, Response> {
        let operation: ContextValue = Arc::clone(&self.operation) as ContextValue;
        ctx.set(OPERATION_CONTEXT_KEY, operation);
        self.inner.call(ctx, next)
    }

    fn route_meta(&self) -> Option<&RouteMeta> {
        self.inner.route_meta()
    }
}

/// Returns the operation published for the current request.
///
/// # Errors
///
/// [`ContextError::NotFound`] when the route has no typed handler, and
/// [`ContextError::InvalidType`] when something else was stored under
/// [`OPERATION_CONTEXT_KEY`].
pub fn operation_from_context(ctx: &Context) -> Result<Arc<Operation>, ContextError> {
    let value = ctx.get(OPERATION_CONTEXT_KEY).ok_or(ContextError::NotFound)?;
    value.downcast::<Operation>().map_err(|_| ContextError::InvalidType)
}
