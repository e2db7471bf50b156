//! The shared API document.
//!
//! A [`Document`] accumulates tags, operations and schema components while
//! routes are registered, and renders them as an OpenAPI 3.1 document.
//!
//! Registration is all-or-nothing: a call that fails leaves the document
//! exactly as it was.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use http::{Method, StatusCode};
use indexmap::IndexMap;
use regex::Regex;
use routedoc_core::TypeInfo;
use routedoc_router::pattern_key;
use serde_json::Value;

use crate::error::{DocsError, DocsResult};
use crate::openapi::{
    Components, Example, Header, Info, MediaType, OpenApi, Operation, Parameter, ParameterIn,
    PathItem, RequestBody, Response, Schema, SecurityRequirement, SecurityScheme, Server, Tag,
};
use crate::operation::{OperationInfo, OperationResponse, ResponseHeader};
use crate::schema::{inline_object, object_properties, SchemaRegistry};

/// The OpenAPI version emitted by [`Document::to_openapi`].
pub const OPENAPI_VERSION: &str = "3.1.0";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Identifies the route slot an operation is served from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OperationKey {
    route: String,
    method: Method,
}

impl OperationKey {
    fn new(path: &str, method: &Method) -> Self {
        Self {
            route: pattern_key(path),
            method: method.clone(),
        }
    }
}

#[derive(Debug)]
struct Registered {
    path: String,
    operation: Arc<Operation>,
}

/// The API document shared by every route group.
#[derive(Debug, Default)]
pub struct Document {
    info: Info,
    servers: Vec<Server>,
    tags: Vec<Tag>,
    operations: IndexMap<OperationKey, Registered>,
    operation_ids: HashMap<String, OperationKey>,
    schemas: SchemaRegistry,
    security_schemes: IndexMap<String, SecurityScheme>,
    security: Vec<SecurityRequirement>,
}

impl Document {
    /// Creates an empty document with default metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with the given metadata.
    pub fn with_info(info: Info) -> Self {
        Self {
            info,
            ..Self::default()
        }
    }

    /// Returns the API metadata.
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Replaces the API metadata.
    pub fn set_info(&mut self, info: Info) {
        self.info = info;
    }

    /// Adds a server entry.
    pub fn add_server(&mut self, url: impl Into<String>, description: Option<String>) {
        self.servers.push(Server {
            url: url.into(),
            description,
            variables: HashMap::new(),
        });
    }

    /// Registers a tag.
    ///
    /// Tags are unique by name: registering a name twice keeps the first
    /// definition and returns `false`.
    pub fn register_tag(&mut self, tag: Tag) -> bool {
        if self.tags.iter().any(|t| t.name == tag.name) {
            return false;
        }
        tracing::debug!(tag = %tag.name, "tag registered");
        self.tags.push(tag);
        true
    }

    /// Registered tags, in registration order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Registers a security scheme under `name`, replacing any previous one.
    pub fn register_security_scheme(&mut self, name: impl Into<String>, scheme: SecurityScheme) {
        self.security_schemes.insert(name.into(), scheme);
    }

    /// Sets the document-wide security requirements.
    pub fn set_security(&mut self, security: Vec<SecurityRequirement>) {
        self.security = security;
    }

    /// The schema components collected so far.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Registers the operation for `(path, method)`.
    ///
    /// `input` describes the bound request type and `output` the response
    /// body. Path parameters come from `{name}`, `:name` and `*name`
    /// segments; remaining input properties become query parameters, or the
    /// JSON request body for POST, PUT and PATCH.
    ///
    /// Registering an identical operation again returns the one already
    /// registered. A different operation for the same path and method is an
    /// [`OperationConflict`](DocsError::OperationConflict).
    pub fn register_operation(
        &mut self,
        path: &str,
        method: &Method,
        input: Option<&TypeInfo>,
        output: Option<&TypeInfo>,
        tags: &[String],
        info: &OperationInfo,
    ) -> DocsResult<Arc<Operation>> {
        let operation_id = match info.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(DocsError::EmptyOperationId),
        };
        if PathItem::default().slot_mut(method).is_none() {
            return Err(DocsError::UnsupportedMethod(method.to_string()));
        }

        let mut schemas = self.schemas.clone();
        let operation = OperationBuilder {
            schemas: &mut schemas,
            path,
            method,
            info,
        }
        .build(operation_id.clone(), input, output, tags)?;

        let key = OperationKey::new(path, method);
        if let Some(existing) = self.operations.get(&key) {
            if existing.path != path {
                return Err(DocsError::RouteCollision {
                    method: method.to_string(),
                    path: path.to_string(),
                    existing: existing.path.clone(),
                });
            }
            if *existing.operation == operation {
                tracing::debug!(%method, path, operation_id = %operation_id, "operation already registered");
                return Ok(Arc::clone(&existing.operation));
            }
            return Err(DocsError::OperationConflict {
                method: method.to_string(),
                path: path.to_string(),
            });
        }
        if let Some(owner) = self.operation_ids.get(&operation_id) {
            return Err(DocsError::DuplicateOperationId {
                operation_id,
                method: owner.method.to_string(),
                path: self.operations.get(owner).map(|r| r.path.clone()).unwrap_or_default(),
            });
        }

        self.schemas = schemas;
        let operation = Arc::new(operation);
        self.operations.insert(
            key.clone(),
            Registered {
                path: path.to_string(),
                operation: Arc::clone(&operation),
            },
        );
        self.operation_ids.insert(operation_id.clone(), key);
        tracing::debug!(%method, path, operation_id = %operation_id, "operation registered");
        Ok(operation)
    }

    /// Returns the operation served for `(path, method)`.
    ///
    /// `path` may spell parameters differently from the registered pattern;
    /// `/items/{id}` finds an operation registered as `/items/:id`.
    pub fn operation(&self, path: &str, method: &Method) -> Option<Arc<Operation>> {
        self.operations
            .get(&OperationKey::new(path, method))
            .map(|registered| Arc::clone(&registered.operation))
    }

    /// The path under which the route for `(path, method)` was documented.
    pub fn registered_path(&self, path: &str, method: &Method) -> Option<&str> {
        self.operations
            .get(&OperationKey::new(path, method))
            .map(|registered| registered.path.as_str())
    }

    /// Iterates over `(path, method, operation)` in registration order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Method, &Arc<Operation>)> {
        self.operations
            .iter()
            .map(|(key, registered)| (registered.path.as_str(), &key.method, &registered.operation))
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if no operation is registered.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Renders the OpenAPI document.
    pub fn to_openapi(&self) -> OpenApi {
        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        for (key, registered) in &self.operations {
            if let Some(slot) = paths.entry(registered.path.clone()).or_default().slot_mut(&key.method) {
                *slot = Some(Operation::clone(&registered.operation));
            }
        }

        let components = Components {
            schemas: self.schemas.components().clone(),
            security_schemes: self.security_schemes.clone(),
        };

        OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: self.info.clone(),
            servers: self.servers.clone(),
            paths,
            components: (!components.is_empty()).then_some(components),
            security: self.security.clone(),
            tags: self.tags.clone(),
            external_docs: None,
        }
    }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json(&self) -> DocsResult<String> {
        serde_json::to_string_pretty(&self.to_openapi()).map_err(DocsError::from)
    }

    /// Renders the document as YAML.
    pub fn to_yaml(&self) -> DocsResult<String> {
        serde_yaml::to_string(&self.to_openapi()).map_err(DocsError::from)
    }
}

struct OperationBuilder<'a> {
    schemas: &'a mut SchemaRegistry,
    path: &'a str,
    method: &'a Method,
    info: &'a OperationInfo,
}

impl OperationBuilder<'_> {
    fn build(
        mut self,
        operation_id: String,
        input: Option<&TypeInfo>,
        output: Option<&TypeInfo>,
        tags: &[String],
    ) -> DocsResult<Operation> {
        let input = input.filter(|ty| !ty.is_unit());
        let (root, mut properties) = match input {
            Some(ty) => {
                let root = self.schemas.resolve(ty)?;
                let properties = object_properties(&root);
                (Some(root), properties)
            }
            None => (None, IndexMap::new()),
        };
        let total = properties.len();

        let mut parameters = Vec::new();
        for name in path_parameter_names(self.path) {
            let schema = properties
                .shift_remove(&name)
                .map_or_else(Schema::string, |(schema, _)| Schema::new(schema));
            parameters.push(parameter(name, ParameterIn::Path, schema, true));
        }
        let consumed = properties.len() < total;

        let mut request_body = None;
        if let (Some(ty), Some(root)) = (input, root) {
            if carries_body(self.method) {
                let schema = if !consumed {
                    Some(self.schemas.embed(ty, root)?)
                } else if properties.is_empty() {
                    None
                } else {
                    Some(inline_object(&properties))
                };
                request_body = schema.map(|schema| RequestBody {
                    description: None,
                    required: true,
                    content: json_content(MediaType {
                        schema: Some(schema),
                        ..MediaType::default()
                    }),
                });
            } else {
                for (name, (schema, required)) in properties {
                    parameters.push(parameter(name, ParameterIn::Query, Schema::new(schema), required));
                }
            }
        }

        let responses = self.responses(output)?;

        Ok(Operation {
            operation_id,
            summary: self.info.summary.clone(),
            description: self.info.description.clone(),
            tags: tags.to_vec(),
            deprecated: self.info.deprecated,
            parameters,
            request_body,
            responses,
            security: self.info.security.clone(),
            code_samples: self.info.code_samples.clone(),
        })
    }

    fn responses(&mut self, output: Option<&TypeInfo>) -> DocsResult<IndexMap<String, Response>> {
        let info = self.info;
        let status = info.status_code.unwrap_or(StatusCode::OK);
        let description = info
            .status_description
            .clone()
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "Default response".to_string());

        let mut content = IndexMap::new();
        if let Some(ty) = output.filter(|ty| !ty.is_unit()) {
            if status != StatusCode::NO_CONTENT {
                content = json_content(MediaType {
                    schema: Some(self.schemas.schema_for(ty)?),
                    ..MediaType::default()
                });
            }
        }

        let mut responses = IndexMap::new();
        responses.insert(
            status.as_str().to_string(),
            Response {
                description,
                headers: self.headers(&info.headers)?,
                content,
            },
        );

        for extra in &info.responses {
            let code = validate_response_code(&extra.code)?;
            if responses.contains_key(&code) {
                return Err(DocsError::DuplicateResponse { code });
            }
            let response = self.extra_response(extra)?;
            responses.insert(code, response);
        }
        Ok(responses)
    }

    fn extra_response(&mut self, extra: &OperationResponse) -> DocsResult<Response> {
        let schema = match extra.model.as_ref().filter(|ty| !ty.is_unit()) {
            Some(ty) => Some(self.schemas.schema_for(ty)?),
            None => None,
        };
        let examples: IndexMap<String, Example> = extra
            .examples
            .iter()
            .map(|(name, value)| {
                let example = Example {
                    summary: None,
                    value: value.clone(),
                };
                (name.clone(), example)
            })
            .collect();

        let content = if schema.is_none() && extra.example.is_none() && examples.is_empty() {
            IndexMap::new()
        } else {
            json_content(MediaType {
                schema,
                example: extra.example.clone(),
                examples,
            })
        };

        Ok(Response {
            description: extra.description.clone(),
            headers: self.headers(&extra.headers)?,
            content,
        })
    }

    fn headers(&mut self, headers: &[ResponseHeader]) -> DocsResult<IndexMap<String, Header>> {
        let mut result = IndexMap::new();
        for header in headers {
            let schema = match &header.model {
                Some(ty) => self.schemas.schema_for(ty)?,
                None => Schema::string(),
            };
            let description = (!header.description.is_empty()).then(|| header.description.clone());
            result.insert(
                header.name.clone(),
                Header {
                    description,
                    schema: Some(schema),
                },
            );
        }
        Ok(result)
    }
}

fn parameter(name: String, location: ParameterIn, schema: Schema, required: bool) -> Parameter {
    let description = schema
        .as_value()
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    Parameter {
        name,
        location,
        description,
        required,
        deprecated: false,
        schema: Some(schema),
    }
}

fn json_content(media: MediaType) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::new();
    content.insert(JSON_CONTENT_TYPE.to_string(), media);
    content
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Extracts parameter names from `{name}`, `:name` and `*name` segments.
fn path_parameter_names(path: &str) -> Vec<String> {
    static PARAM: OnceLock<Regex> = OnceLock::new();
    let regex = PARAM.get_or_init(|| {
        Regex::new(r"\{([^}/]+)\}|[:*]([^/]+)").expect("valid regex")
    });

    regex
        .captures_iter(path)
        .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Accepts `default`, a status code, or a `1XX`..`5XX` range.
fn validate_response_code(code: &str) -> DocsResult<String> {
    static CODE: OnceLock<Regex> = OnceLock::new();
    let regex = CODE.get_or_init(|| {
        Regex::new(r"^(?:default|[1-5](?:XX|[0-9]{2}))$").expect("valid regex")
    });

    let code = code.trim();
    if regex.is_match(code) {
        Ok(code.to_string())
    } else {
        Err(DocsError::InvalidResponseCode {
            code: code.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct ItemPath {
        id: u64,
    }

    #[allow(dead_code)]
    #[derive(Serialize, JsonSchema)]
    struct Item {
        id: u64,
        name: String,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct CreateItem {
        name: String,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct UpdateItem {
        id: u64,
        name: String,
        price: Option<f64>,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct ListQuery {
        /// Page number.
        page: Option<u32>,
        tag: String,
    }

    #[allow(dead_code)]
    #[derive(Serialize, JsonSchema)]
    struct ApiError {
        message: String,
    }

    fn info(id: &str) -> OperationInfo {
        OperationInfo {
            id: Some(id.to_string()),
            ..OperationInfo::default()
        }
    }

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_get_with_path_parameter() {
        let mut doc = Document::new();
        let op = doc
            .register_operation(
                "/items/:id",
                &Method::GET,
                Some(&TypeInfo::of::<ItemPath>()),
                Some(&TypeInfo::of::<Item>()),
                &tags(&["items"]),
                &info("getItem"),
            )
            .unwrap();

        assert_eq!(op.operation_id, "getItem");
        assert_eq!(op.tags, vec!["items"]);
        let id = op.parameter("id", ParameterIn::Path).unwrap();
        assert!(id.required);
        assert_eq!(id.schema.as_ref().unwrap().schema_type(), Some("integer"));
        assert!(op.request_body.is_none());

        let ok = op.response("200").unwrap();
        assert_eq!(ok.description, "OK");
        let schema = ok.content[JSON_CONTENT_TYPE].schema.as_ref().unwrap();
        assert_eq!(schema.reference_path(), Some("#/components/schemas/Item"));
        assert!(doc.schemas().get("Item").is_some());
        assert!(doc.schemas().get("ItemPath").is_none());
    }

    #[test]
    fn test_path_parameter_without_property_is_string() {
        let mut doc = Document::new();
        let op = doc
            .register_operation("/files/*rest", &Method::GET, None, None, &[], &info("getFile"))
            .unwrap();

        let rest = op.parameter("rest", ParameterIn::Path).unwrap();
        assert_eq!(rest.schema.as_ref().unwrap().schema_type(), Some("string"));
        assert!(op.response("200").unwrap().content.is_empty());
    }

    #[test]
    fn test_query_parameters() {
        let mut doc = Document::new();
        let op = doc
            .register_operation(
                "/items",
                &Method::GET,
                Some(&TypeInfo::of::<ListQuery>()),
                Some(&TypeInfo::of::<Vec<Item>>()),
                &[],
                &info("listItems"),
            )
            .unwrap();

        let page = op.parameter("page", ParameterIn::Query).unwrap();
        assert!(!page.required);
        assert_eq!(page.description.as_deref(), Some("Page number."));
        assert!(op.parameter("tag", ParameterIn::Query).unwrap().required);

        let schema = op.response("200").unwrap().content[JSON_CONTENT_TYPE]
            .schema
            .as_ref()
            .unwrap();
        assert_eq!(schema.schema_type(), Some("array"));
    }

    #[test]
    fn test_body_is_a_reference_when_untouched() {
        let mut doc = Document::new();
        let op = doc
            .register_operation(
                "/items",
                &Method::POST,
                Some(&TypeInfo::of::<CreateItem>()),
                Some(&TypeInfo::of::<Item>()),
                &[],
                &OperationInfo {
                    id: Some("createItem".to_string()),
                    status_code: Some(StatusCode::CREATED),
                    ..OperationInfo::default()
                },
            )
            .unwrap();

        let body = op.request_body.as_ref().unwrap();
        assert!(body.required);
        let schema = body.content[JSON_CONTENT_TYPE].schema.as_ref().unwrap();
        assert_eq!(schema.reference_path(), Some("#/components/schemas/CreateItem"));
        assert!(op.response("201").is_some());
        assert!(op.response("200").is_none());
    }

    #[test]
    fn test_body_is_inlined_without_path_properties() {
        let mut doc = Document::new();
        let op = doc
            .register_operation(
                "/items/{id}",
                &Method::PUT,
                Some(&TypeInfo::of::<UpdateItem>()),
                None,
                &[],
                &info("updateItem"),
            )
            .unwrap();

        assert!(op.parameter("id", ParameterIn::Path).is_some());
        let schema = op.request_body.as_ref().unwrap().content[JSON_CONTENT_TYPE]
            .schema
            .as_ref()
            .unwrap()
            .as_value();
        assert!(schema["properties"].get("id").is_none());
        assert!(schema["properties"].get("name").is_some());
        assert_eq!(schema["required"], json!(["name"]));
        assert!(doc.schemas().get("UpdateItem").is_none());
    }

    #[test]
    fn test_no_content_has_no_body() {
        let mut doc = Document::new();
        let op = doc
            .register_operation(
                "/items/:id",
                &Method::DELETE,
                Some(&TypeInfo::of::<ItemPath>()),
                Some(&TypeInfo::of::<Item>()),
                &[],
                &OperationInfo {
                    id: Some("deleteItem".to_string()),
                    status_code: Some(StatusCode::NO_CONTENT),
                    status_description: Some("Deleted".to_string()),
                    ..OperationInfo::default()
                },
            )
            .unwrap();

        let response = op.response("204").unwrap();
        assert_eq!(response.description, "Deleted");
        assert!(response.content.is_empty());
    }

    #[test]
    fn test_additional_responses_and_headers() {
        let mut not_found = OperationResponse::new("404", "Item not found");
        not_found.model = Some(TypeInfo::of::<ApiError>());
        not_found.example = Some(json!({ "message": "no such item" }));

        let mut conflict = OperationResponse::new("409", "Conflict");
        conflict
            .examples
            .insert("duplicate".to_string(), json!({ "message": "exists" }));

        let op_info = OperationInfo {
            id: Some("getItem".to_string()),
            responses: vec![not_found, conflict, OperationResponse::new("default", "Error")],
            headers: vec![ResponseHeader::new("X-Request-Id", "request id")],
            ..OperationInfo::default()
        };

        let mut doc = Document::new();
        let op = doc
            .register_operation("/items/:id", &Method::GET, None, None, &[], &op_info)
            .unwrap();

        assert_eq!(
            op.responses.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["200", "404", "409", "default"]
        );
        let media = &op.response("404").unwrap().content[JSON_CONTENT_TYPE];
        assert_eq!(
            media.schema.as_ref().unwrap().reference_path(),
            Some("#/components/schemas/ApiError")
        );
        assert_eq!(media.example, Some(json!({ "message": "no such item" })));
        let conflict = &op.response("409").unwrap().content[JSON_CONTENT_TYPE];
        assert!(conflict.schema.is_none());
        assert_eq!(conflict.examples["duplicate"].value["message"], "exists");
        assert!(op.response("default").unwrap().content.is_empty());

        let header = &op.response("200").unwrap().headers["X-Request-Id"];
        assert_eq!(header.description.as_deref(), Some("request id"));
        assert_eq!(header.schema.as_ref().unwrap().schema_type(), Some("string"));
    }

    #[test]
    fn test_response_code_errors() {
        let mut doc = Document::new();
        let duplicate = OperationInfo {
            id: Some("a".to_string()),
            responses: vec![OperationResponse::new("200", "again")],
            ..OperationInfo::default()
        };
        let err = doc
            .register_operation("/a", &Method::GET, None, None, &[], &duplicate)
            .unwrap_err();
        assert!(matches!(err, DocsError::DuplicateResponse { ref code } if code == "200"));

        let invalid = OperationInfo {
            id: Some("b".to_string()),
            responses: vec![OperationResponse::new("OK", "nope")],
            ..OperationInfo::default()
        };
        let err = doc
            .register_operation("/b", &Method::GET, None, None, &[], &invalid)
            .unwrap_err();
        assert!(matches!(err, DocsError::InvalidResponseCode { .. }));
        assert!(validate_response_code("4XX").is_ok());
        assert!(validate_response_code("600").is_err());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_operation_id_rules() {
        let mut doc = Document::new();
        let err = doc
            .register_operation("/a", &Method::GET, None, None, &[], &OperationInfo::default())
            .unwrap_err();
        assert!(matches!(err, DocsError::EmptyOperationId));

        doc.register_operation("/a", &Method::GET, None, None, &[], &info("shared"))
            .unwrap();
        let err = doc
            .register_operation("/b", &Method::GET, None, None, &[], &info("shared"))
            .unwrap_err();
        assert!(
            matches!(err, DocsError::DuplicateOperationId { ref path, .. } if path == "/a")
        );
    }

    #[test]
    fn test_identical_replay_returns_existing() {
        let mut doc = Document::new();
        let register = |doc: &mut Document| {
            doc.register_operation(
                "/items/:id",
                &Method::GET,
                Some(&TypeInfo::of::<ItemPath>()),
                Some(&TypeInfo::of::<Item>()),
                &tags(&["items"]),
                &info("getItem"),
            )
        };

        let first = register(&mut doc).unwrap();
        let second = register(&mut doc).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(doc.len(), 1);
        assert_eq!(first.responses.len(), 1);
    }

    #[test]
    fn test_different_replay_is_a_conflict() {
        let mut doc = Document::new();
        doc.register_operation("/items", &Method::GET, None, None, &[], &info("listItems"))
            .unwrap();

        let changed = OperationInfo {
            summary: Some("List items".to_string()),
            ..info("listItems")
        };
        let err = doc
            .register_operation("/items", &Method::GET, None, None, &[], &changed)
            .unwrap_err();
        assert!(matches!(err, DocsError::OperationConflict { .. }));
        assert!(doc.operation("/items", &Method::GET).unwrap().summary.is_none());
    }

    #[test]
    fn test_param_spellings_share_one_operation() {
        let mut doc = Document::new();
        doc.register_operation("/items/:id", &Method::GET, None, None, &[], &info("getItem"))
            .unwrap();

        let err = doc
            .register_operation("/items/{id}", &Method::GET, None, None, &[], &info("getThing"))
            .unwrap_err();
        assert!(matches!(
            err,
            DocsError::RouteCollision { ref path, ref existing, .. }
                if path == "/items/{id}" && existing == "/items/:id"
        ));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.operation("/items/{id}", &Method::GET).unwrap().operation_id, "getItem");
        assert_eq!(doc.registered_path("/items/{id}", &Method::GET), Some("/items/:id"));

        doc.register_operation("/items/{id}", &Method::PUT, None, None, &[], &info("putItem"))
            .unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_trailing_slash_is_a_separate_operation() {
        let mut doc = Document::new();
        doc.register_operation("/items", &Method::GET, None, None, &[], &info("listItems"))
            .unwrap();
        doc.register_operation("/items/", &Method::GET, None, None, &[], &info("listItemsSlash"))
            .unwrap();

        assert_eq!(doc.operation("/items", &Method::GET).unwrap().operation_id, "listItems");
        assert_eq!(doc.operation("/items/", &Method::GET).unwrap().operation_id, "listItemsSlash");
    }

    #[test]
    fn test_failed_registration_leaves_no_components() {
        let mut bad = OperationResponse::new("nope", "invalid");
        bad.model = Some(TypeInfo::of::<ApiError>());
        let op_info = OperationInfo {
            id: Some("getItem".to_string()),
            responses: vec![bad],
            ..OperationInfo::default()
        };

        let mut doc = Document::new();
        doc.register_operation(
            "/items/:id",
            &Method::GET,
            None,
            Some(&TypeInfo::of::<Item>()),
            &[],
            &op_info,
        )
        .unwrap_err();
        assert!(doc.schemas().is_empty());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_unsupported_method() {
        let mut doc = Document::new();
        let err = doc
            .register_operation("/", &Method::CONNECT, None, None, &[], &info("connect"))
            .unwrap_err();
        assert!(matches!(err, DocsError::UnsupportedMethod(_)));
    }

    #[test]
    fn test_tags_are_unique_by_name() {
        let mut doc = Document::new();
        assert!(doc.register_tag(Tag::new("items").with_description("first")));
        assert!(!doc.register_tag(Tag::new("items").with_description("second")));
        assert!(doc.register_tag(Tag::new("users")));

        assert_eq!(doc.tags().len(), 2);
        assert_eq!(doc.tags()[0].description.as_deref(), Some("first"));
    }

    #[test]
    fn test_to_openapi() {
        let mut doc = Document::with_info(Info::new("Items API", "2.0.0"));
        doc.register_tag(Tag::new("items"));
        doc.register_security_scheme("bearerAuth", SecurityScheme::bearer(None));
        let mut requirement = SecurityRequirement::new();
        requirement.insert("bearerAuth".to_string(), Vec::new());
        doc.set_security(vec![requirement]);

        doc.register_operation(
            "/items/:id",
            &Method::GET,
            Some(&TypeInfo::of::<ItemPath>()),
            Some(&TypeInfo::of::<Item>()),
            &tags(&["items"]),
            &info("getItem"),
        )
        .unwrap();
        doc.register_operation(
            "/items/:id",
            &Method::DELETE,
            Some(&TypeInfo::of::<ItemPath>()),
            None,
            &tags(&["items"]),
            &OperationInfo {
                security: Some(Vec::new()),
                ..info("deleteItem")
            },
        )
        .unwrap();

        let value = serde_json::to_value(doc.to_openapi()).unwrap();
        assert_eq!(value["openapi"], OPENAPI_VERSION);
        assert_eq!(value["info"]["title"], "Items API");
        assert_eq!(value["paths"]["/items/:id"]["get"]["operationId"], "getItem");
        assert_eq!(value["paths"]["/items/:id"]["delete"]["security"], json!([]));
        assert_eq!(value["components"]["securitySchemes"]["bearerAuth"]["scheme"], "bearer");
        assert!(value["components"]["schemas"].get("Item").is_some());
        assert_eq!(value["security"][0]["bearerAuth"], json!([]));
        assert_eq!(value["tags"][0]["name"], "items");
    }

    #[test]
    fn test_json_and_yaml_output() {
        let mut doc = Document::new();
        doc.register_operation("/health", &Method::GET, None, None, &[], &info("health"))
            .unwrap();

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"operationId\": \"health\""));

        let yaml = doc.to_yaml().unwrap();
        assert!(yaml.contains("operationId: health"));
        assert!(yaml.contains("/health:"));
    }

    #[test]
    fn test_path_parameter_names() {
        assert_eq!(path_parameter_names("/items/:id"), vec!["id"]);
        assert_eq!(
            path_parameter_names("/users/{userId}/orders/{orderId}"),
            vec!["userId", "orderId"]
        );
        assert_eq!(path_parameter_names("/static/*filepath"), vec!["filepath"]);
        assert!(path_parameter_names("/items").is_empty());
    }
}
