//! Common HTTP types used by handlers.

use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type accepted by the engine.
///
/// This is a standard `http::Request` with a `Full<Bytes>` body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by handlers.
///
/// This is a standard `http::Response` with a `Full<Bytes>` body.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building common responses.
pub trait ResponseExt {
    /// Creates an empty response with the given status.
    fn empty(status: http::StatusCode) -> Response;

    /// Creates a response with a body and content type.
    fn with_body(status: http::StatusCode, content_type: &str, body: impl Into<Bytes>) -> Response;

    /// Creates a JSON error response using the `{"error":{"code","message"}}` envelope.
    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn empty(status: http::StatusCode) -> Response {
        http::Response::builder()
            .status(status)
            .body(Full::new(Bytes::new()))
            .expect("failed to build empty response")
    }

    fn with_body(status: http::StatusCode, content_type: &str, body: impl Into<Bytes>) -> Response {
        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, content_type)
            .body(Full::new(body.into()))
            .expect("failed to build response")
    }

    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });

        Self::with_body(status, "application/json", body.to_string())
    }
}
