//! Schema component registry.
//!
//! Schemas are generated by `schemars` as standalone JSON Schema documents.
//! Before they can live inside an OpenAPI document, their `$defs` are promoted
//! into `#/components/schemas` and every reference is rewritten to point there.
//! A component name can only ever be bound to one schema.

use std::collections::HashMap;

use indexmap::IndexMap;
use routedoc_core::TypeInfo;
use serde_json::{Map, Value};

use crate::error::{DocsError, DocsResult};
use crate::openapi::Schema;

const DEFS_PREFIX: &str = "#/$defs/";
const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// Collects the component schemas referenced by registered operations.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    components: IndexMap<String, Schema>,
    owners: HashMap<String, TypeInfo>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the schema of `ty`, promotes its definitions into components
    /// and returns the root schema with references rewritten.
    ///
    /// The root itself is not registered.
    pub fn resolve(&mut self, ty: &TypeInfo) -> DocsResult<Value> {
        let mut root = ty.root_schema();
        let name = ty.schema_name();
        let mut definitions = Vec::new();
        if let Some(obj) = root.as_object_mut() {
            obj.remove("$schema");
            if let Some(Value::Object(defs)) = obj.remove("$defs") {
                definitions.extend(defs);
            }
        }
        strip_generated_title(&mut root, &name);

        sanitize_schema(&mut root, &name);
        for (def_name, mut def_schema) in definitions {
            strip_generated_title(&mut def_schema, &def_name);
            sanitize_schema(&mut def_schema, &name);
            self.insert(&def_name, Schema::new(def_schema), None)?;
        }
        Ok(root)
    }

    /// Returns the schema to embed for `ty`.
    ///
    /// Named models (structs and enums) are registered as components and
    /// referenced. Everything else is inlined.
    pub fn schema_for(&mut self, ty: &TypeInfo) -> DocsResult<Schema> {
        let root = self.resolve(ty)?;
        self.embed(ty, root)
    }

    /// Embeds an already resolved root schema of `ty`.
    pub(crate) fn embed(&mut self, ty: &TypeInfo, mut root: Value) -> DocsResult<Schema> {
        if is_named_model(&root) {
            let name = ty.schema_name();
            self.insert(&name, Schema::new(root), Some(*ty))?;
            return Ok(Schema::component(&name));
        }
        if let Some(obj) = root.as_object_mut() {
            obj.remove("title");
        }
        Ok(Schema::new(root))
    }

    /// Registered components, in registration order.
    pub fn components(&self) -> &IndexMap<String, Schema> {
        &self.components
    }

    /// Returns the component named `name`.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.components.get(name)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if no component is registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn insert(&mut self, name: &str, schema: Schema, owner: Option<TypeInfo>) -> DocsResult<()> {
        if let Some(owner) = owner {
            match self.owners.get(name) {
                Some(existing) if *existing != owner => {
                    return Err(DocsError::SchemaConflict {
                        name: name.to_string(),
                        reason: format!(
                            "already bound to {}, cannot bind {}",
                            existing.type_name(),
                            owner.type_name()
                        ),
                    });
                }
                Some(_) => {}
                None => {
                    self.owners.insert(name.to_string(), owner);
                }
            }
        }

        match self.components.get(name) {
            Some(existing) if *existing != schema => Err(DocsError::SchemaConflict {
                name: name.to_string(),
                reason: "generated schemas differ".to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                tracing::trace!(component = %name, "schema component registered");
                self.components.insert(name.to_string(), schema);
                Ok(())
            }
        }
    }
}

/// Rewrites `$defs` references to component references.
///
/// A bare `#` refers to the root of the generated document, which becomes the
/// component named `root_name`.
fn sanitize_schema(value: &mut Value, root_name: &str) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                if let Some(name) = ref_str.strip_prefix(DEFS_PREFIX) {
                    *ref_str = format!("{COMPONENTS_PREFIX}{name}");
                } else if ref_str == "#" {
                    *ref_str = format!("{COMPONENTS_PREFIX}{root_name}");
                }
            }

            for (_, v) in obj.iter_mut() {
                sanitize_schema(v, root_name);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                sanitize_schema(v, root_name);
            }
        }
        _ => {}
    }
}

/// Removes a `title` that merely repeats the component name, so a root schema
/// and the same type found in another schema's `$defs` compare equal.
fn strip_generated_title(schema: &mut Value, name: &str) {
    if let Some(obj) = schema.as_object_mut() {
        if obj.get("title").and_then(Value::as_str) == Some(name) {
            obj.remove("title");
        }
    }
}

fn is_named_model(schema: &Value) -> bool {
    ["properties", "enum", "oneOf"]
        .iter()
        .any(|key| schema.get(*key).is_some())
}

/// Top-level properties of an object schema with their required flag.
pub(crate) fn object_properties(schema: &Value) -> IndexMap<String, (Value, bool)> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| {
                    let is_required = required.contains(&name.as_str());
                    (name.clone(), (prop.clone(), is_required))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Builds an inline object schema from a subset of properties.
pub(crate) fn inline_object(properties: &IndexMap<String, (Value, bool)>) -> Schema {
    let mut props = Map::new();
    let mut required = Vec::new();
    for (name, (schema, is_required)) in properties {
        props.insert(name.clone(), schema.clone());
        if *is_required {
            required.push(Value::String(name.clone()));
        }
    }

    let mut object = Map::new();
    object.insert("type".to_string(), Value::String("object".to_string()));
    object.insert("properties".to_string(), Value::Object(props));
    if !required.is_empty() {
        object.insert("required".to_string(), Value::Array(required));
    }
    Schema::new(Value::Object(object))
}
