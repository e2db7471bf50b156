//! Operation assembly.
//!
//! For each route the assembler finds the one typed handler in the chain,
//! merges its [`RouteMeta`](routedoc_core::RouteMeta) with the caller's
//! options, registers the result in the [`Document`] and swaps the typed
//! handler for a [`PublishOperation`] carrying the registered operation.
//!
//! | typed handlers | options | result                                   |
//! |----------------|---------|------------------------------------------|
//! | 0              | none    | routed, not documented                   |
//! | 0              | some    | documented from the options only         |
//! | 1              | any     | documented and published to the context  |
//! | 2 or more      | any     | [`RegistrationError::MultipleTypedHandlers`] |
//!
//! A typed handler ends its chain: it produces the response, so handlers
//! placed after it are rejected. A route that is not documented may not
//! take over the route slot of an operation that is.

use std::sync::Arc;

use heck::ToLowerCamelCase;
use http::Method;
use parking_lot::RwLock;
use routedoc_core::{BoxedHandler, RouteMeta, TypeInfo};
use routedoc_docs::{DocsError, Document, Operation, OperationInfo};

use crate::error::{RegistrationError, RegistrationResult};
use crate::options::{self, OperationOption};
use crate::publish::PublishOperation;

/// The outcome of assembling one route.
#[derive(Debug)]
pub(crate) struct Assembled {
    /// The chain to route, with the typed handler decorated.
    pub handlers: Vec<BoxedHandler>,
    /// The documented operation, if any.
    pub operation: Option<Arc<Operation>>,
}

/// Assembles the operation for `method path`.
///
/// `path` is already resolved against the group's base path and `tags` are
/// the group's inherited tag names.
pub(crate) fn assemble(
    document: &RwLock<Document>,
    method: &Method,
    path: &str,
    tags: &[String],
    options: &[OperationOption],
    mut handlers: Vec<BoxedHandler>,
) -> RegistrationResult<Assembled> {
    let mut info = options::collect(options);

    let typed: Vec<(usize, RouteMeta)> = handlers
        .iter()
        .enumerate()
        .filter_map(|(index, handler)| handler.route_meta().map(|meta| (index, meta.clone())))
        .collect();

    if typed.len() > 1 {
        return Err(RegistrationError::MultipleTypedHandlers {
            method: method.clone(),
            path: path.to_string(),
            handlers: typed.into_iter().map(|(_, meta)| meta.handler_name).collect(),
        });
    }

    let Some((index, meta)) = typed.into_iter().next() else {
        if info.is_empty() {
            ensure_not_documented(document, method, path)?;
            tracing::debug!(%method, path, "route registered without documentation");
            return Ok(Assembled {
                handlers,
                operation: None,
            });
        }
        if !has_id(&info) {
            info.id = Some(default_operation_id(method, path));
        }
        let input = info.input_model;
        let operation = register(document, method, path, input.as_ref(), None, tags, &info)?;
        return Ok(Assembled {
            handlers,
            operation: Some(operation),
        });
    };

    if index + 1 < handlers.len() {
        return Err(RegistrationError::HandlersAfterTyped {
            method: method.clone(),
            path: path.to_string(),
            handler: meta.handler_name,
            trailing: handlers[index + 1..].iter().map(|h| h.name().to_string()).collect(),
        });
    }

    if !has_id(&info) {
        info.id = Some(meta.handler_name.clone());
    }
    info.status_code = Some(meta.default_status);
    let input = info.input_model.unwrap_or(meta.input);

    let operation = register(document, method, path, Some(&input), Some(&meta.output), tags, &info)?;
    tracing::debug!(
        %method,
        path,
        operation_id = %operation.operation_id,
        handler = %meta.handler_name,
        "typed handler bound to operation"
    );

    let handler = Arc::clone(&handlers[index]);
    handlers[index] = Arc::new(PublishOperation::new(handler, Arc::clone(&operation)));
    Ok(Assembled {
        handlers,
        operation: Some(operation),
    })
}

fn register(
    document: &RwLock<Document>,
    method: &Method,
    path: &str,
    input: Option<&TypeInfo>,
    output: Option<&TypeInfo>,
    tags: &[String],
    info: &OperationInfo,
) -> RegistrationResult<Arc<Operation>> {
    document
        .write()
        .register_operation(path, method, input, output, tags, info)
        .map_err(|source| RegistrationError::Docs {
            method: method.clone(),
            path: path.to_string(),
            source,
        })
}

fn ensure_not_documented(document: &RwLock<Document>, method: &Method, path: &str) -> RegistrationResult<()> {
    let document = document.read();
    let Some(existing) = document.registered_path(path, method) else {
        return Ok(());
    };
    let source = if existing == path {
        DocsError::OperationConflict {
            method: method.to_string(),
            path: path.to_string(),
        }
    } else {
        DocsError::RouteCollision {
            method: method.to_string(),
            path: path.to_string(),
            existing: existing.to_string(),
        }
    };
    Err(RegistrationError::Docs {
        method: method.clone(),
        path: path.to_string(),
        source,
    })
}

fn has_id(info: &OperationInfo) -> bool {
    info.id.as_deref().is_some_and(|id| !id.trim().is_empty())
}

/// Derives an operation id from the method and the words of the path:
/// `GET /items/:id` becomes `getItemsId`.
pub(crate) fn default_operation_id(method: &Method, path: &str) -> String {
    let words: String = path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    format!("{} {words}", method.as_str().to_ascii_lowercase()).to_lower_camel_case()
}
