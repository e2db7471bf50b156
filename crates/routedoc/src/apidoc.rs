//! The top-level facade.
//!
//! An [`ApiDoc`] owns an [`Engine`] and the [`Document`] its groups write
//! into. It dereferences to its root [`Group`], so routes can be registered
//! on it directly.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use http::{Method, StatusCode};
use parking_lot::{RwLock, RwLockReadGuard};
use routedoc_config::{DocumentConfig, RouteDocConfig, ServerConfig};
use routedoc_core::{handler_fn, BoxedHandler, Request, Response, ResponseExt};
use routedoc_docs::{Document, DocsResult, Info, SecurityScheme};
use routedoc_server::{Engine, Server};
use routedoc_telemetry::init_logging;

use crate::error::ApiDocError;
use crate::group::{Group, SharedDocument};

/// Title of a freshly created document.
pub const DEFAULT_TITLE: &str = "API";

/// Version of a freshly created document.
pub const DEFAULT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn parse(content_type: &str) -> Result<Self, ApiDocError> {
        match content_type.trim().to_ascii_lowercase().as_str() {
            "" | "json" | "application/json" => Ok(Self::Json),
            "yaml" | "application/yaml" | "application/x-yaml" => Ok(Self::Yaml),
            _ => Err(ApiDocError::InvalidContentType(content_type.to_string())),
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Yaml => "application/yaml",
        }
    }

    fn render(self, document: &Document) -> DocsResult<String> {
        match self {
            Self::Json => document.to_json(),
            Self::Yaml => document.to_yaml(),
        }
    }
}

/// An engine whose routes document themselves.
///
/// ```
/// use routedoc::{options, ApiDoc, Tag};
/// use routedoc_core::{typed, Context, HandlerError};
/// use schemars::JsonSchema;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize, JsonSchema)]
/// struct ItemPath {
///     id: u64,
/// }
///
/// #[derive(Serialize, JsonSchema)]
/// struct Item {
///     id: u64,
/// }
///
/// async fn get_item(_ctx: Context, path: ItemPath) -> Result<Item, HandlerError> {
///     Ok(Item { id: path.id })
/// }
///
/// let api = ApiDoc::new();
/// let items = api.group("/items", Some(Tag::new("items")));
/// items.get("/:id", &[options::summary("Get an item")], vec![typed(get_item).boxed()]);
///
/// let op = api.document().operation("/items/:id", &http::Method::GET).unwrap();
/// assert_eq!(op.operation_id, "getItem");
/// ```
#[derive(Debug)]
pub struct ApiDoc {
    engine: Engine,
    document: SharedDocument,
    root: Group,
}

impl ApiDoc {
    /// Creates a facade over a new engine.
    #[must_use]
    pub fn new() -> Self {
        Self::from_engine(Engine::new())
    }

    /// Creates a facade over an existing engine.
    ///
    /// Routes already on the engine keep working but are not documented.
    #[must_use]
    pub fn from_engine(engine: Engine) -> Self {
        let document: SharedDocument = Arc::new(RwLock::new(Document::with_info(Info::new(
            DEFAULT_TITLE,
            DEFAULT_VERSION,
        ))));
        let root = Group::new(engine.root_group(), Arc::clone(&document));
        Self {
            engine,
            document,
            root,
        }
    }

    /// Replaces the document metadata.
    pub fn set_info(&self, info: Info) {
        self.document.write().set_info(info);
    }

    /// Declares a security scheme that operations can require by `name`.
    pub fn register_security_scheme(&self, name: impl Into<String>, scheme: SecurityScheme) {
        self.document.write().register_security_scheme(name, scheme);
    }

    /// Read access to the document.
    pub fn document(&self) -> RwLockReadGuard<'_, Document> {
        self.document.read()
    }

    /// The shared document handle.
    #[must_use]
    pub fn shared_document(&self) -> SharedDocument {
        Arc::clone(&self.document)
    }

    /// The root group.
    #[must_use]
    pub fn root(&self) -> &Group {
        &self.root
    }

    /// The underlying engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns a handler that serves the document.
    ///
    /// `content_type` is matched case-insensitively: empty, `json` or
    /// `application/json` serve JSON; `yaml`, `application/yaml` or
    /// `application/x-yaml` serve YAML. The document is rendered on every
    /// request, so it reflects routes registered after this call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiDocError::InvalidContentType`] for any other value.
    pub fn try_document_handler(&self, content_type: &str) -> Result<BoxedHandler, ApiDocError> {
        let format = DocumentFormat::parse(content_type)?;
        let document = Arc::clone(&self.document);

        Ok(handler_fn("openapi", move |ctx, _next| {
            let rendered = format.render(&document.read());
            let request_id = ctx.request_id().to_string();
            Box::pin(async move {
                match rendered {
                    Ok(body) => Response::with_body(StatusCode::OK, format.content_type(), body),
                    Err(e) => {
                        tracing::error!(request_id = %request_id, error = %e, "failed to render document");
                        Response::json_error(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "DOCUMENT_RENDER_ERROR",
                            "failed to render the API document",
                        )
                    }
                }
            })
        }))
    }

    /// Returns a handler that serves the document.
    ///
    /// # Panics
    ///
    /// Panics if `content_type` is not a JSON or YAML content type; see
    /// [`try_document_handler`](Self::try_document_handler).
    #[must_use]
    pub fn document_handler(&self, content_type: &str) -> BoxedHandler {
        match self.try_document_handler(content_type) {
            Ok(handler) => handler,
            Err(e) => panic!("{e}"),
        }
    }

    /// Applies `config`: sets the document metadata and serves the document
    /// at `spec_path`. Does nothing when the document is disabled.
    ///
    /// Title, version and description come from `config`; contact and
    /// license already set with [`set_info`](Self::set_info) are kept.
    ///
    /// The document route itself is not documented.
    ///
    /// # Errors
    ///
    /// Returns [`ApiDocError::Registration`] if the route cannot be added.
    pub fn mount_document(&self, config: &DocumentConfig) -> Result<&Self, ApiDocError> {
        if !config.enabled {
            tracing::debug!("document endpoint disabled");
            return Ok(self);
        }

        let current = self.document().info().clone();
        let mut info = Info::new(config.title.clone(), config.version.clone());
        info.description.clone_from(&config.description);
        if let Some(contact) = current.contact {
            info = info.with_contact(contact);
        }
        if let Some(license) = current.license {
            info = info.with_license(license);
        }
        self.set_info(info);

        let handler = self.try_document_handler(config.format.as_str())?;
        self.root
            .try_handle(Method::GET, &config.spec_path, &[], vec![handler])?;
        tracing::info!(path = %config.spec_path, format = config.format.as_str(), "document endpoint mounted");
        Ok(self)
    }

    /// Dispatches `request` through the engine.
    pub async fn serve_underlying(&self, request: Request) -> Response {
        self.engine.dispatch(request).await
    }

    /// Consumes the facade, returning the engine to serve.
    #[must_use]
    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Consumes the facade, returning a server for the engine.
    #[must_use]
    pub fn into_server(self, config: ServerConfig) -> Server {
        Server::new(self.engine, config)
    }

    /// Initializes logging, mounts the document and serves until SIGTERM
    /// or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns [`ApiDocError`] if logging cannot be initialized, the
    /// document route cannot be mounted or the server fails to start.
    pub async fn run(self, config: &RouteDocConfig) -> Result<(), ApiDocError> {
        if config.logging.enabled {
            init_logging(&config.logging.to_log_config())?;
        }
        self.mount_document(&config.document)?;
        tracing::info!(
            addr = %config.server.http_addr,
            operations = self.document().len(),
            "starting server"
        );
        self.into_server(config.server.clone()).run().await?;
        Ok(())
    }
}

impl Default for ApiDoc {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ApiDoc {
    type Target = Group;

    fn deref(&self) -> &Group {
        &self.root
    }
}

impl DerefMut for ApiDoc {
    fn deref_mut(&mut self) -> &mut Group {
        &mut self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use routedoc_config::DocumentFormat as ConfigFormat;
    use routedoc_docs::{Contact, License};

    fn get(uri: &str) -> Request {
        http::Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn text(response: Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[test]
    fn test_content_types() {
        for ct in ["", "json", "JSON", "application/json", " Application/Json "] {
            assert_eq!(DocumentFormat::parse(ct).unwrap(), DocumentFormat::Json, "{ct:?}");
        }
        for ct in ["yaml", "YAML", "application/yaml", "application/x-yaml"] {
            assert_eq!(DocumentFormat::parse(ct).unwrap(), DocumentFormat::Yaml, "{ct:?}");
        }
        assert!(matches!(
            DocumentFormat::parse("xml"),
            Err(ApiDocError::InvalidContentType(ct)) if ct == "xml"
        ));
    }

    #[test]
    fn test_default_info() {
        let api = ApiDoc::new();
        assert_eq!(api.document().info().title, DEFAULT_TITLE);
        assert_eq!(api.document().info().version, DEFAULT_VERSION);

        api.set_info(Info::new("Items", "2.0"));
        assert_eq!(api.document().info().title, "Items");
    }

    #[test]
    fn test_security_scheme_is_rendered() {
        let api = ApiDoc::new();
        api.register_security_scheme("bearer", SecurityScheme::bearer(Some("JWT".to_string())));

        let doc: serde_json::Value = serde_json::from_str(&api.document().to_json().unwrap()).unwrap();
        assert_eq!(doc["components"]["securitySchemes"]["bearer"]["scheme"], "bearer");
    }

    #[test]
    #[should_panic(expected = "invalid content type 'toml'")]
    fn test_document_handler_panics_on_unknown_type() {
        let _ = ApiDoc::new().document_handler("toml");
    }

    #[tokio::test]
    async fn test_mount_document() {
        let api = ApiDoc::new();
        let config = DocumentConfig {
            title: "Items API".to_string(),
            spec_path: "/openapi.yaml".to_string(),
            format: ConfigFormat::Yaml,
            ..DocumentConfig::default()
        };
        api.mount_document(&config).unwrap();
        assert!(api.document().is_empty());

        let response = api.serve_underlying(get("/openapi.yaml")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[http::header::CONTENT_TYPE], "application/yaml");
        assert!(text(response).await.contains("title: Items API"));
    }

    #[test]
    fn test_mount_document_keeps_contact_and_license() {
        let api = ApiDoc::new();
        api.set_info(
            Info::new("draft", "0.0")
                .with_contact(Contact {
                    name: Some("Items team".to_string()),
                    url: None,
                    email: None,
                })
                .with_license(License {
                    name: "MIT".to_string(),
                    url: None,
                    identifier: None,
                }),
        );
        api.mount_document(&DocumentConfig {
            title: "Items API".to_string(),
            ..DocumentConfig::default()
        })
        .unwrap();

        let doc = api.document();
        assert_eq!(doc.info().title, "Items API");
        assert_eq!(doc.info().contact.as_ref().unwrap().name.as_deref(), Some("Items team"));
        assert_eq!(doc.info().license.as_ref().unwrap().name, "MIT");
    }

    #[tokio::test]
    async fn test_disabled_document_is_not_mounted() {
        let api = ApiDoc::new();
        let config = DocumentConfig {
            enabled: false,
            ..DocumentConfig::default()
        };
        api.mount_document(&config).unwrap();
        assert_eq!(api.engine().route_count(), 0);
    }

    #[tokio::test]
    async fn test_from_engine_keeps_existing_routes() {
        let engine = Engine::new();
        engine
            .add_route(
                &Method::GET,
                "/legacy",
                vec![handler_fn("legacy", |_ctx, _next| {
                    Box::pin(async { Response::with_body(StatusCode::OK, "text/plain", "old") })
                })],
            )
            .unwrap();

        let api = ApiDoc::from_engine(engine);
        let response = api.serve_underlying(get("/legacy")).await;
        assert_eq!(text(response).await, "old");
        assert!(api.document().is_empty());
    }
}
