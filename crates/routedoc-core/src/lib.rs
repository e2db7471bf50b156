//! Core request-handling types for RouteDoc.
//!
//! This crate provides the building blocks every other RouteDoc crate uses:
//!
//! - [`Context`]: per-request state with a string-keyed value store
//! - [`Handler`] / [`Next`]: ordered handler chains (middleware and endpoints)
//! - [`typed`]: adapts `async fn(Context, I) -> Result<O, HandlerError>` into a
//!   handler that can later be introspected through [`Handler::route_meta`]
//! - [`TypeInfo`] / [`RouteMeta`]: the introspection data of typed handlers
//! - [`HandlerError`]: errors rendered as a JSON envelope

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod handler;
pub mod meta;
pub mod typed;
pub mod types;

pub use context::{Context, ContextBuilder, ContextValue, RequestId};
pub use error::{ErrorDetail, ErrorEnvelope, HandlerError, HandlerResult};
pub use handler::{handler_fn, BoxFuture, BoxedHandler, FnHandler, Handler, Next};
pub use meta::{RouteMeta, TypeInfo};
pub use typed::{typed, TypedHandler};
pub use types::{Request, Response, ResponseExt};

// Re-exported so downstream crates use the same router types.
pub use routedoc_router::Params;
