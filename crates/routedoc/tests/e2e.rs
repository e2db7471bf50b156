//! End-to-end tests: routes registered through groups, served by the engine,
//! documented in the shared document.

use std::sync::Arc;

use http::{Method, StatusCode};
use parking_lot::Mutex;
use routedoc::prelude::*;
use routedoc::{docs::ParameterIn, options, Tag};
use routedoc_test::TestClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Deserialize, JsonSchema)]
struct ItemPath {
    id: u64,
}

#[derive(Serialize, Deserialize, JsonSchema)]
struct Item {
    id: u64,
    operation: String,
}

#[derive(Deserialize, JsonSchema)]
struct NewItem {
    name: String,
}

#[derive(Serialize, JsonSchema)]
struct Created {
    name: String,
}

async fn get_item(ctx: Context, path: ItemPath) -> Result<Item, HandlerError> {
    let operation = operation_from_context(&ctx).map_err(|e| HandlerError::internal(e.to_string()))?;
    Ok(Item {
        id: path.id,
        operation: operation.operation_id.clone(),
    })
}

#[derive(Serialize, JsonSchema)]
struct Served {
    operation: String,
}

async fn served_by(ctx: Context, _input: ()) -> Result<Served, HandlerError> {
    let operation = operation_from_context(&ctx).map_err(|e| HandlerError::internal(e.to_string()))?;
    Ok(Served {
        operation: operation.operation_id.clone(),
    })
}

async fn create_item(_ctx: Context, item: NewItem) -> Result<Created, HandlerError> {
    Ok(Created { name: item.name })
}

/// Replies with the outcome of looking up the published operation.
fn plain() -> BoxedHandler {
    handler_fn("plain", |ctx, _next| {
        Box::pin(async move {
            let body = match operation_from_context(ctx) {
                Ok(op) => format!("published {}", op.operation_id),
                Err(e) => e.to_string(),
            };
            Response::with_body(StatusCode::OK, "text/plain", body)
        })
    })
}

fn items_api() -> ApiDoc {
    let api = ApiDoc::new();
    let items = api.group("/items", Some(Tag::new("items")));
    items
        .get("/:id", &[options::summary("Get an item")], vec![typed(get_item).boxed()])
        .post(
            "/",
            &[options::response("409", "Name taken", None, vec![], None)],
            vec![typed(create_item).status(StatusCode::CREATED).boxed()],
        );
    api.get("/openapi.json", &[], vec![api.document_handler("json")]);
    api
}

#[tokio::test]
async fn test_document_describes_typed_route() {
    let api = items_api();
    let client = TestClient::new(api.engine().clone());

    let response = client.get("/openapi.json").send().await;
    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/json")
        .assert_json_field("paths./items/:id.get.operationId", &json!("getItem"))
        .assert_json_field("paths./items/:id.get.tags", &json!(["items"]))
        .assert_json_field("paths./items/:id.get.summary", &json!("Get an item"))
        .assert_json_field("tags.0.name", &json!("items"));

    let doc = response.json_value().unwrap();
    assert!(doc["paths"]["/items/:id"]["get"]["responses"]["200"].is_object());
    assert!(doc["paths"].get("/openapi.json").is_none());
}

#[tokio::test]
async fn test_typed_handler_sees_its_operation() {
    let api = items_api();
    let client = TestClient::new(api.engine().clone());

    let response = client.get("/items/7").send().await;
    response
        .assert_status(StatusCode::OK)
        .assert_json_field("id", &json!(7))
        .assert_json_field("operation", &json!("getItem"));
}

#[tokio::test]
async fn test_published_operation_is_the_registered_one() {
    let seen: Arc<Mutex<Option<Arc<Operation>>>> = Arc::new(Mutex::new(None));
    let recorder = {
        let seen = Arc::clone(&seen);
        typed(move |ctx: Context, _path: ItemPath| {
            let seen = Arc::clone(&seen);
            async move {
                *seen.lock() = operation_from_context(&ctx).ok();
                Ok::<_, HandlerError>(())
            }
        })
        .named("recordItem")
    };

    let api = ApiDoc::new();
    let items = api.group("/items", Some(Tag::new("items")));
    items.delete("/:id", &[], vec![recorder.boxed()]);

    let client = TestClient::new(api.engine().clone());
    client.delete("/items/1").send().await.assert_status(StatusCode::OK);

    let registered = api.document().operation("/items/:id", &Method::DELETE).unwrap();
    assert_eq!(registered.operation_id, "recordItem");
    let published = seen.lock().clone().unwrap();
    assert!(Arc::ptr_eq(&registered, &published));
}

#[tokio::test]
async fn test_route_without_typed_handler_publishes_nothing() {
    let api = ApiDoc::new();
    api.get("/health", &[], vec![plain()]);
    api.get("/status", &[options::summary("Service status")], vec![plain()]);

    let client = TestClient::new(api.engine().clone());
    let health = client.get("/health").send().await;
    assert_eq!(health.text().unwrap(), "operation not found");
    let status = client.get("/status").send().await;
    assert_eq!(status.text().unwrap(), "operation not found");

    let doc = api.document();
    assert!(doc.operation("/health", &Method::GET).is_none());
    let status = doc.operation("/status", &Method::GET).unwrap();
    assert_eq!(status.operation_id, "getStatus");
    assert_eq!(status.summary.as_deref(), Some("Service status"));
}

#[tokio::test]
async fn test_created_status_and_extra_response() {
    let api = items_api();
    let client = TestClient::new(api.engine().clone());

    client
        .post("/items/")
        .json(&json!({"name": "lamp"}))
        .send()
        .await
        .assert_status(StatusCode::CREATED)
        .assert_json_field("name", &json!("lamp"));

    let doc = api.document();
    let op = doc.operation("/items/", &Method::POST).unwrap();
    assert_eq!(op.operation_id, "createItem");
    assert!(op.response("201").is_some());
    assert_eq!(op.response("409").unwrap().description, "Name taken");
    assert!(op.request_body.is_some());
}

#[test]
fn test_nested_tags_and_paths() {
    let api = ApiDoc::new();
    let v1 = api.group("/v1", Some(Tag::new("v1")));
    let items = v1.group("/items", Some(Tag::new("items")));
    let users = v1.group("/users", Some(Tag::new("users")));

    items.get("/:id", &[], vec![typed(get_item).boxed()]);
    users.get(
        "/:id",
        &[options::id("getUser")],
        vec![typed(get_item).boxed()],
    );

    let doc = api.document();
    let item = doc.operation("/v1/items/:id", &Method::GET).unwrap();
    assert_eq!(item.tags, ["v1", "items"]);
    assert!(item.parameter("id", ParameterIn::Path).is_some());

    let user = doc.operation("/v1/users/:id", &Method::GET).unwrap();
    assert_eq!(user.tags, ["v1", "users"]);
    assert_eq!(user.operation_id, "getUser");

    let tags: Vec<&str> = doc.tags().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tags, ["v1", "items", "users"]);
}

#[test]
#[should_panic(expected = "multiple typed handlers used for operation GET /items/:id")]
fn test_two_typed_handlers_abort_registration() {
    let api = ApiDoc::new();
    api.group("/items", None).get(
        "/:id",
        &[],
        vec![typed(get_item).boxed(), typed(get_item).named("getItemAgain").boxed()],
    );
}

#[test]
fn test_try_handle_reports_instead_of_panicking() {
    let api = ApiDoc::new();
    let err = api
        .try_handle(
            Method::GET,
            "/items/:id",
            &[],
            vec![typed(get_item).boxed(), typed(get_item).boxed()],
        )
        .unwrap_err();

    assert!(matches!(err, RegistrationError::MultipleTypedHandlers { .. }));
    assert_eq!(err.path(), "/items/:id");
    assert!(api.document().is_empty());
    assert_eq!(api.engine().route_count(), 0);
}

#[test]
fn test_identical_registration_is_idempotent() {
    let api = ApiDoc::new();
    let items = api.group("/items", Some(Tag::new("items")));
    let first = items
        .register(Method::GET, "/:id", &[], vec![typed(get_item).boxed()])
        .unwrap()
        .unwrap();
    let second = items
        .register(Method::GET, "/:id", &[], vec![typed(get_item).boxed()])
        .unwrap()
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(api.document().len(), 1);
    assert_eq!(api.document().tags().len(), 1);
}

#[tokio::test]
async fn test_trailing_slash_is_kept_in_document() {
    let api = ApiDoc::new();
    let items = api.group("/items", None);
    items.get("/", &[options::id("listItems")], vec![plain()]);

    let listed = api.document().operation("/items/", &Method::GET).unwrap();
    assert_eq!(listed.operation_id, "listItems");
    assert!(api.document().operation("/items", &Method::GET).is_none());

    let client = TestClient::new(api.engine().clone());
    client.get("/items/").send().await.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_yaml_document_handler() {
    let api = items_api();
    api.get("/openapi.yaml", &[], vec![api.document_handler("YAML")]);
    let client = TestClient::new(api.engine().clone());

    let response = client.get("/openapi.yaml").send().await;
    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/yaml");

    let doc: serde_json::Value = serde_yaml::from_str(&response.text().unwrap()).unwrap();
    assert_eq!(doc["paths"]["/items/:id"]["get"]["operationId"], "getItem");
}

#[test]
fn test_invalid_content_type_is_rejected_at_construction() {
    let api = ApiDoc::new();
    let err = api.try_document_handler("text/html").unwrap_err();
    assert!(matches!(err, ApiDocError::InvalidContentType(ct) if ct == "text/html"));
}

#[tokio::test]
async fn test_input_binding_through_published_handler() {
    let api = items_api();
    let client = TestClient::new(api.engine().clone());

    client
        .get("/items/not-a-number")
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_collection_and_trailing_slash_serve_their_own_operation() {
    let api = ApiDoc::new();
    let coll = api.group("/coll", None);
    coll.get("", &[], vec![typed(served_by).named("listItems").boxed()])
        .get("/", &[], vec![typed(served_by).named("listItemsSlash").boxed()]);

    assert_eq!(api.document().len(), 2);
    assert_eq!(api.engine().route_count(), 2);

    let client = TestClient::new(api.engine().clone());
    client
        .get("/coll")
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_json_field("operation", &json!("listItems"));
    client
        .get("/coll/")
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_json_field("operation", &json!("listItemsSlash"));
}

#[tokio::test]
async fn test_param_spellings_of_one_route_are_rejected() {
    let api = ApiDoc::new();
    api.try_handle(Method::GET, "/a/:id", &[], vec![typed(get_item).boxed()])
        .unwrap();
    let err = api
        .try_handle(
            Method::GET,
            "/a/{id}",
            &[],
            vec![typed(get_item).named("getThing").boxed()],
        )
        .unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::Docs {
            source: routedoc::docs::DocsError::RouteCollision { .. },
            ..
        }
    ));
    assert_eq!(api.document().len(), 1);
    assert_eq!(api.engine().route_count(), 1);

    let client = TestClient::new(api.engine().clone());
    client
        .get("/a/5")
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_json_field("operation", &json!("getItem"));
}

#[test]
fn test_handlers_after_typed_handler_are_rejected() {
    let api = ApiDoc::new();
    let err = api
        .try_handle(
            Method::GET,
            "/items/:id",
            &[],
            vec![typed(get_item).boxed(), plain()],
        )
        .unwrap_err();

    assert!(matches!(
        err,
        RegistrationError::HandlersAfterTyped { ref trailing, .. } if trailing == &["plain"]
    ));
    assert!(api.document().is_empty());
    assert_eq!(api.engine().route_count(), 0);
}
