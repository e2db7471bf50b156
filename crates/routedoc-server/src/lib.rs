//! # RouteDoc Server
//!
//! Request routing and HTTP serving for RouteDoc:
//!
//! - [`Engine`]: the route table and request dispatch
//! - [`RouterGroup`]: nested base paths with shared middleware
//! - [`Server`]: hyper HTTP/1 accept loop with graceful shutdown
//!
//! ## Example
//!
//! ```rust,ignore
//! use http::Method;
//! use routedoc_config::ServerConfig;
//! use routedoc_server::{Engine, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), routedoc_server::ServerError> {
//!     let engine = Engine::new();
//!     let api = engine.root_group().group("/api", vec![]);
//!     api.handle(Method::GET, "/items", vec![list_items()]).unwrap();
//!
//!     Server::new(engine, ServerConfig::default()).run().await
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod group;
mod server;
mod shutdown;

pub use engine::{Chain, Engine, REQUEST_ID_HEADER};
pub use group::RouterGroup;
pub use server::{Server, ServerError, ServerResult};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
