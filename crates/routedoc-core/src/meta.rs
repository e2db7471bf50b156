//! Route metadata reported by typed handlers.
//!
//! A [`TypeInfo`] captures everything the document model needs to know about
//! a Rust type without keeping the type parameter around: its name, its
//! identity and a way to generate its JSON Schema on demand.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;

use http::StatusCode;
use schemars::JsonSchema;
use serde_json::Value;

/// Introspection handle for a request or response type.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    type_name: &'static str,
    type_id: TypeId,
    schema_name: fn() -> Cow<'static, str>,
    root_schema: fn() -> Value,
}

fn root_schema_of<T: JsonSchema>() -> Value {
    schemars::schema_for!(T).to_value()
}

impl TypeInfo {
    /// Captures the introspection data for `T`.
    #[must_use]
    pub fn of<T: JsonSchema + 'static>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            schema_name: T::schema_name,
            root_schema: root_schema_of::<T>,
        }
    }

    /// The fully qualified Rust type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The type's identity.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The component name the schema is registered under.
    #[must_use]
    pub fn schema_name(&self) -> Cow<'static, str> {
        (self.schema_name)()
    }

    /// Generates the root JSON Schema, including any `$defs`.
    #[must_use]
    pub fn root_schema(&self) -> Value {
        (self.root_schema)()
    }

    /// Whether this is the unit type, i.e. "no payload".
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.type_id == TypeId::of::<()>()
    }

    /// The names of the top-level object properties and their JSON types.
    ///
    /// Returns an empty list for non-object schemas.
    #[must_use]
    pub fn property_types(&self) -> Vec<(String, Option<String>)> {
        let schema = self.root_schema();
        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return Vec::new();
        };
        properties
            .iter()
            .map(|(name, prop)| (name.clone(), primary_type(prop)))
            .collect()
    }
}

/// Picks the first non-null JSON type declared by a property schema.
fn primary_type(schema: &Value) -> Option<String> {
    match schema.get("type") {
        Some(Value::String(ty)) => Some(ty.clone()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| *ty != "null")
            .map(ToString::to_string),
        _ => None,
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// What a typed handler declares about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    /// The bound request type.
    pub input: TypeInfo,
    /// The response type.
    pub output: TypeInfo,
    /// Status code of a successful response.
    pub default_status: StatusCode,
    /// Display name, used as the default operation id.
    pub handler_name: String,
}
