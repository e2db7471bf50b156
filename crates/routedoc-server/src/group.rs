//! Router groups.
//!
//! A [`RouterGroup`] is a base path plus the middleware shared by every route
//! registered through it. Groups nest: a child joins its path onto the
//! parent's and runs the parent's middleware before its own.

use http::Method;
use routedoc_core::BoxedHandler;
use routedoc_router::{join_paths, RouteError};

use crate::engine::Engine;

/// A path prefix with shared middleware, bound to an [`Engine`].
#[derive(Clone, Debug)]
pub struct RouterGroup {
    base_path: String,
    handlers: Vec<BoxedHandler>,
    engine: Engine,
}

impl RouterGroup {
    pub(crate) fn new(engine: Engine) -> Self {
        Self {
            base_path: "/".to_string(),
            handlers: Vec::new(),
            engine,
        }
    }

    /// The group's absolute base path.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The engine routes are registered on.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Middleware that runs before every route of this group.
    #[must_use]
    pub fn handlers(&self) -> &[BoxedHandler] {
        &self.handlers
    }

    /// Resolves `relative` against the group's base path.
    #[must_use]
    pub fn calculate_absolute_path(&self, relative: &str) -> String {
        join_paths(&self.base_path, relative)
    }

    /// Creates a child group.
    ///
    /// The child inherits this group's middleware followed by `handlers`.
    #[must_use]
    pub fn group(&self, relative: &str, handlers: Vec<BoxedHandler>) -> RouterGroup {
        let mut combined = self.handlers.clone();
        combined.extend(handlers);
        RouterGroup {
            base_path: self.calculate_absolute_path(relative),
            handlers: combined,
            engine: self.engine.clone(),
        }
    }

    /// Appends middleware for routes registered on this group afterwards.
    pub fn use_middleware(&mut self, handlers: impl IntoIterator<Item = BoxedHandler>) -> &mut Self {
        self.handlers.extend(handlers);
        self
    }

    /// Registers `handlers` for `method` on the group-relative `relative`
    /// path. The group's middleware runs first.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] if the engine rejects the route.
    pub fn handle(
        &self,
        method: Method,
        relative: &str,
        handlers: Vec<BoxedHandler>,
    ) -> Result<&Self, RouteError> {
        let path = self.calculate_absolute_path(relative);
        let mut chain = self.handlers.clone();
        chain.extend(handlers);
        self.engine.add_route(&method, &path, chain)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::{BodyExt, Full};
    use routedoc_core::{handler_fn, Response, ResponseExt};
    use std::sync::Arc;

    fn tagger(tag: &'static str) -> BoxedHandler {
        handler_fn(tag, move |ctx, next| {
            Box::pin(async move {
                let mut seen = ctx
                    .get("seen")
                    .and_then(|v| v.downcast::<String>().ok())
                    .map(|v| (*v).clone())
                    .unwrap_or_default();
                seen.push_str(tag);
                ctx.set("seen", Arc::new(seen));
                next.run(ctx).await
            })
        })
    }

    fn reply() -> BoxedHandler {
        handler_fn("reply", |ctx, _next| {
            Box::pin(async move {
                let seen = ctx
                    .get("seen")
                    .and_then(|v| v.downcast::<String>().ok())
                    .map(|v| (*v).clone())
                    .unwrap_or_default();
                Response::with_body(StatusCode::OK, "text/plain", seen)
            })
        })
    }

    async fn get(engine: &Engine, uri: &str) -> (StatusCode, Bytes) {
        let request = http::Request::get(uri).body(Full::new(Bytes::new())).unwrap();
        let response = engine.dispatch(request).await;
        let status = response.status();
        (status, response.into_body().collect().await.unwrap().to_bytes())
    }

    #[test]
    fn test_nested_base_paths() {
        let engine = Engine::new();
        let root = engine.root_group();
        assert_eq!(root.base_path(), "/");

        let v1 = root.group("/v1", Vec::new());
        let items = v1.group("items", Vec::new());
        assert_eq!(v1.base_path(), "/v1");
        assert_eq!(items.base_path(), "/v1/items");
        assert_eq!(items.calculate_absolute_path("/"), "/v1/items/");
    }

    #[tokio::test]
    async fn test_group_middleware_order() {
        let engine = Engine::new();
        let mut api = engine.root_group().group("/api", vec![tagger("a")]);
        api.use_middleware([tagger("b")]);
        let nested = api.group("/nested", vec![tagger("c")]);

        nested.handle(Method::GET, "/x", vec![tagger("d"), reply()]).unwrap();

        let (status, body) = get(&engine, "/api/nested/x").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "abcd");
    }

    #[tokio::test]
    async fn test_sibling_groups_do_not_share_middleware() {
        let engine = Engine::new();
        let root = engine.root_group();
        let left = root.group("/left", vec![tagger("L")]);
        let right = root.group("/right", vec![tagger("R")]);

        left.handle(Method::GET, "/", vec![reply()])
            .unwrap()
            .handle(Method::GET, "/again", vec![reply()])
            .unwrap();
        right.handle(Method::GET, "/", vec![reply()]).unwrap();

        assert_eq!(get(&engine, "/left/").await.1, "L");
        assert_eq!(get(&engine, "/left/again").await.1, "L");
        assert_eq!(get(&engine, "/right/").await.1, "R");
        assert_eq!(get(&engine, "/right").await.0, StatusCode::NOT_FOUND);
        assert_eq!(root.handlers().len(), 0);
    }
}
