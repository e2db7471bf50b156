//! # RouteDoc
//!
//! **Route groups that document themselves.**
//!
//! Routes are registered on [`Group`]s exactly as on a plain router. When a
//! route's handler chain contains a typed handler (built with
//! [`typed`](routedoc_core::typed())), its input and output types, default
//! status and name become an OpenAPI operation in the shared document.
//! [`options`] add what types cannot express: summaries, extra responses,
//! headers, security and code samples.
//!
//! At request time the typed handler sees its own operation through
//! [`operation_from_context`], so middleware and handlers can react to what
//! the route declares.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use routedoc::prelude::*;
//!
//! async fn get_item(_ctx: Context, path: ItemPath) -> Result<Item, HandlerError> {
//!     Ok(Item { id: path.id })
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().with_env_prefix("ROUTEDOC").load()?;
//!
//!     let api = ApiDoc::new();
//!     let items = api.group("/items", Some(Tag::new("items")));
//!     items.get(
//!         "/:id",
//!         &[options::summary("Get an item"), options::response("404", "No such item", None, vec![], None)],
//!         vec![typed(get_item).boxed()],
//!     );
//!
//!     api.run(&config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Registration
//!
//! ```text
//! Group::get ─► options applied ─► typed handler located ─► Document::register_operation
//!                                                                    │
//!      router ◄── chain with typed handler wrapped in PublishOperation ◄┘
//! ```
//!
//! Registration errors are startup misconfigurations. The verb methods
//! panic with the error message; [`Group::try_handle`] returns it instead.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod apidoc;
mod assembler;
mod error;
mod group;
pub mod options;
mod publish;

pub use apidoc::{ApiDoc, DEFAULT_TITLE, DEFAULT_VERSION};
pub use error::{ApiDocError, ContextError, RegistrationError, RegistrationResult};
pub use group::{Group, SharedDocument};
pub use options::OperationOption;
pub use publish::{operation_from_context, PublishOperation, OPERATION_CONTEXT_KEY};

// Document types callers build options and metadata from
pub use routedoc_docs::{Info, Operation, SecurityRequirement, Tag};

// Re-export the underlying crates
pub use routedoc_config as config;
pub use routedoc_core as core;
pub use routedoc_docs as docs;
pub use routedoc_router as router;
pub use routedoc_server as server;
pub use routedoc_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use routedoc::prelude::*;
/// ```
pub mod prelude {
    pub use crate::options;
    pub use crate::{
        operation_from_context, ApiDoc, ApiDocError, ContextError, Group, OperationOption,
        RegistrationError,
    };

    pub use routedoc_config::{ConfigLoader, RouteDocConfig};
    pub use routedoc_core::{
        handler_fn, typed, BoxedHandler, Context, Handler, HandlerError, HandlerResult, Next,
        Response, ResponseExt,
    };
    pub use routedoc_docs::{Info, Operation, Tag};
    pub use routedoc_server::{Server, ShutdownSignal};
}
