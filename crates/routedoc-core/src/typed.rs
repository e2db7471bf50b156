//! The typed-handler adapter.
//!
//! [`typed`] turns an async function `Fn(Context, I) -> Result<O, HandlerError>`
//! into a chain [`Handler`] that binds `I` from the request and serializes `O`
//! into the response. Unlike plain middleware, a typed handler reports its
//! [`RouteMeta`], which is how route registration recognizes it.
//!
//! # Binding
//!
//! The input is assembled as a JSON object from three sources, later sources
//! winning on conflicting keys:
//!
//! 1. the request body, when it is a JSON object
//! 2. query string values
//! 3. path parameters
//!
//! Query and path values arrive as strings and are coerced using the JSON type
//! the input schema declares for that property. A body that is valid JSON but
//! not an object is deserialized into `I` directly.
//!
//! # Example
//!
//! ```
//! use routedoc_core::{typed, Context, Handler, HandlerError};
//! use schemars::JsonSchema;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct ItemPath {
//!     id: u64,
//! }
//!
//! #[derive(Serialize, JsonSchema)]
//! struct Item {
//!     id: u64,
//! }
//!
//! async fn get_item(_ctx: Context, path: ItemPath) -> Result<Item, HandlerError> {
//!     Ok(Item { id: path.id })
//! }
//!
//! let handler = typed(get_item);
//! assert_eq!(handler.route_meta().unwrap().handler_name, "getItem");
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use heck::ToLowerCamelCase;
use http::StatusCode;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::HandlerError;
use crate::handler::{BoxFuture, BoxedHandler, Handler, Next};
use crate::meta::{RouteMeta, TypeInfo};
use crate::types::{Response, ResponseExt};

/// A handler with a declared input and output type.
///
/// Built with [`typed`]. It produces the response itself and never calls
/// the rest of its chain, so it belongs at the end of one.
pub struct TypedHandler<F, I, O> {
    func: F,
    meta: RouteMeta,
    property_types: Vec<(String, Option<String>)>,
    _types: PhantomData<fn(I) -> O>,
}

/// Wraps an async function as a typed handler.
///
/// The default display name is the function's name in lowerCamelCase
/// (`get_item` becomes `getItem`) and the default success status is `200 OK`.
pub fn typed<F, Fut, I, O>(func: F) -> TypedHandler<F, I, O>
where
    F: Fn(Context, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, HandlerError>> + Send + 'static,
    I: DeserializeOwned + JsonSchema + Send + 'static,
    O: Serialize + JsonSchema + Send + 'static,
{
    let input = TypeInfo::of::<I>();
    TypedHandler {
        func,
        property_types: input.property_types(),
        meta: RouteMeta {
            input,
            output: TypeInfo::of::<O>(),
            default_status: StatusCode::OK,
            handler_name: display_name::<F>(),
        },
        _types: PhantomData,
    }
}

/// Derives a display name from a function's type name.
///
/// Closure segments are skipped so a closure defined inside `list_items` is
/// still called `listItems`.
fn display_name<F>() -> String {
    let full = std::any::type_name::<F>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .find(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .unwrap_or(without_generics)
        .to_lower_camel_case()
}

impl<F, I, O> TypedHandler<F, I, O> {
    /// Overrides the success status code.
    #[must_use]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.meta.default_status = status;
        self
    }

    /// Overrides the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.meta.handler_name = name.into();
        self
    }

    /// Returns the route metadata.
    #[must_use]
    pub fn meta(&self) -> &RouteMeta {
        &self.meta
    }

    fn coerce(&self, key: &str, raw: &str) -> Value {
        let declared = self
            .property_types
            .iter()
            .find(|(name, _)| name == key)
            .and_then(|(_, ty)| ty.as_deref());
        coerce_scalar(declared, raw)
    }

    fn is_array(&self, key: &str) -> bool {
        self.property_types
            .iter()
            .any(|(name, ty)| name == key && ty.as_deref() == Some("array"))
    }
}

fn coerce_scalar(declared: Option<&str>, raw: &str) -> Value {
    let parsed = match declared {
        Some("integer") => raw
            .parse::<i64>()
            .map(Value::from)
            .ok()
            .or_else(|| raw.parse::<u64>().map(Value::from).ok()),
        Some("number") => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        Some("boolean") => raw.parse::<bool>().map(Value::Bool).ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::String(raw.to_string()))
}

impl<F, Fut, I, O> TypedHandler<F, I, O>
where
    F: Fn(Context, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, HandlerError>> + Send + 'static,
    I: DeserializeOwned + JsonSchema + Send + 'static,
    O: Serialize + JsonSchema + Send + 'static,
{
    /// Erases the handler into a chain element.
    #[must_use]
    pub fn boxed(self) -> BoxedHandler {
        Arc::new(self)
    }

    /// Binds the handler input from the request.
    fn bind(&self, ctx: &Context) -> Result<I, HandlerError> {
        if self.meta.input.is_unit() {
            return serde_json::from_value(Value::Null).map_err(HandlerError::from);
        }

        let mut fields = Map::new();
        if !ctx.body().is_empty() {
            match serde_json::from_slice::<Value>(ctx.body())? {
                Value::Object(body) => fields.extend(body),
                other => return serde_json::from_value(other).map_err(HandlerError::from),
            }
        }

        for (key, raw) in ctx.query_pairs() {
            let value = self.coerce(&key, &raw);
            if self.is_array(&key) {
                match fields.get_mut(&key) {
                    Some(Value::Array(items)) => items.push(value),
                    _ => {
                        fields.insert(key, Value::Array(vec![value]));
                    }
                }
            } else {
                fields.insert(key, value);
            }
        }

        for (key, raw) in ctx.params().iter() {
            fields.insert(key.to_string(), self.coerce(key, raw));
        }

        serde_json::from_value(Value::Object(fields)).map_err(HandlerError::from)
    }

    fn respond(&self, output: &O) -> Response {
        let status = self.meta.default_status;
        if status == StatusCode::NO_CONTENT || self.meta.output.is_unit() {
            return Response::empty(status);
        }
        match serde_json::to_vec(output) {
            Ok(body) => Response::with_body(status, "application/json", body),
            Err(err) => {
                HandlerError::internal_with_source("failed to serialize response", err)
                    .into_response(None)
            }
        }
    }
}

impl<F, Fut, I, O> Handler for TypedHandler<F, I, O>
where
    F: Fn(Context, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, HandlerError>> + Send + 'static,
    I: DeserializeOwned + JsonSchema + Send + 'static,
    O: Serialize + JsonSchema + Send + 'static,
{
    fn name(&self) -> &str {
        &self.meta.handler_name
    }

    fn call<'a>(&'a self, ctx: &'a mut Context, _next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_id = ctx.request_id().to_string();
            let input = match self.bind(ctx) {
                Ok(input) => input,
                Err(err) => {
                    tracing::debug!(
                        handler = %self.meta.handler_name,
                        request_id = %request_id,
                        error = %err,
                        "failed to bind request"
                    );
                    return err.into_response(Some(&request_id));
                }
            };

            match (self.func)(ctx.clone(), input).await {
                Ok(output) => self.respond(&output),
                Err(err) => {
                    tracing::debug!(
                        handler = %self.meta.handler_name,
                        request_id = %request_id,
                        status = err.status_code().as_u16(),
                        error = %err,
                        "handler returned an error"
                    );
                    err.into_response(Some(&request_id))
                }
            }
        })
    }

    fn route_meta(&self) -> Option<&RouteMeta> {
        Some(&self.meta)
    }
}
