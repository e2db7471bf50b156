//! # RouteDoc Test
//!
//! In-process HTTP testing for RouteDoc engines. Requests go through the
//! engine's full dispatch without binding a port.
//!
//! ## Example
//!
//! ```ignore
//! use routedoc_test::TestClient;
//!
//! #[tokio::test]
//! async fn test_get_item() {
//!     let client = TestClient::new(app());
//!
//!     let response = client.get("/items/7").send().await;
//!     response
//!         .assert_status(http::StatusCode::OK)
//!         .assert_json_field("id", &serde_json::json!(7));
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
