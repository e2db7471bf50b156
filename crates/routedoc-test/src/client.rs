//! In-process test client.

use bytes::Bytes;
use http::Method;
use routedoc_server::Engine;

use crate::error::TestError;
use crate::request::{TestRequest, TestRequestBuilder};
use crate::response::TestResponse;

/// Sends requests straight into an [`Engine`] without a socket.
///
/// Requests run through the engine's full dispatch: route matching, group
/// middleware and the 404/405 fallbacks.
///
/// ```
/// use http::{Method, StatusCode};
/// use routedoc_core::{handler_fn, Response, ResponseExt};
/// use routedoc_server::Engine;
/// use routedoc_test::TestClient;
///
/// # tokio_test::block_on(async {
/// let engine = Engine::new();
/// engine.add_route(&Method::GET, "/ping", vec![handler_fn("ping", |_ctx, _next| {
///     Box::pin(async { Response::with_body(StatusCode::OK, "text/plain", "pong") })
/// })]).unwrap();
///
/// let client = TestClient::new(engine);
/// let response = client.get("/ping").send().await;
/// assert_eq!(response.text().unwrap(), "pong");
/// # });
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TestClient {
    engine: Engine,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Creates a client for `engine`.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// The engine under test.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Starts a GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        let builder = self
            .default_headers
            .iter()
            .fold(TestRequestBuilder::new(method, uri), |builder, (name, value)| {
                builder.header(name, value)
            });
        TestClientRequest {
            client: self,
            builder,
        }
    }

    /// Dispatches a built request.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::BodyRead`] if the response body cannot be read.
    pub async fn execute(&self, request: TestRequest) -> Result<TestResponse, TestError> {
        let response = self.engine.dispatch(request.into_http_request()).await;
        TestResponse::from_http(response).await
    }
}

/// A request builder bound to a [`TestClient`].
#[must_use]
#[derive(Debug)]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl TestClientRequest<'_> {
    /// Sets a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_token(token);
        self
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the response cannot be read.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("test request failed: {e}"),
        }
    }

    /// Sends the request.
    ///
    /// # Errors
    ///
    /// Returns [`TestError`] if the request cannot be built or the response
    /// cannot be read.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        self.client.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use routedoc_core::{handler_fn, Response, ResponseExt};
    use serde_json::json;

    fn echo_engine() -> Engine {
        let engine = Engine::new();
        let echo = handler_fn("echo", |ctx, _next| {
            Box::pin(async move {
                let body = json!({
                    "method": ctx.method().as_str(),
                    "id": ctx.param("id"),
                    "query": ctx.uri().query(),
                    "auth": ctx.headers().get("authorization").and_then(|v| v.to_str().ok()),
                    "body": String::from_utf8_lossy(ctx.body()),
                });
                Response::with_body(StatusCode::OK, "application/json", body.to_string())
            })
        });
        engine
            .add_route(&Method::POST, "/items/:id", vec![echo.clone()])
            .unwrap();
        engine.add_route(&Method::GET, "/items/:id", vec![echo]).unwrap();
        engine
    }

    #[tokio::test]
    async fn test_request_reaches_engine() {
        let client = TestClient::new(echo_engine()).with_default_header("authorization", "Bearer t");
        let response = client
            .post("/items/5")
            .query("dry_run", "true")
            .json(&json!({"name": "lamp"}))
            .send()
            .await;

        response
            .assert_status(StatusCode::OK)
            .assert_json_field("method", &json!("POST"))
            .assert_json_field("id", &json!("5"))
            .assert_json_field("query", &json!("dry_run=true"))
            .assert_json_field("auth", &json!("Bearer t"))
            .assert_json_field("body", &json!(r#"{"name":"lamp"}"#));
        assert!(response.header("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let client = TestClient::new(echo_engine());
        client.get("/nope").send().await.assert_status(StatusCode::NOT_FOUND);
        client
            .delete("/items/1")
            .send()
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_try_send_reports_build_errors() {
        let client = TestClient::new(echo_engine());
        let result = client.get("/items/1").header("bad header", "x").try_send().await;
        assert!(matches!(result, Err(TestError::InvalidHeader(_))));
    }
}
