//! A small items API that serves its own OpenAPI document.
//!
//! ```text
//! cargo run -p routedoc --example items
//! curl localhost:8080/items/7
//! curl localhost:8080/openapi.json
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use routedoc::prelude::*;
use routedoc::docs::{License, SecurityScheme};
use routedoc::{options, SecurityRequirement};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

type Store = Arc<RwLock<BTreeMap<u64, Item>>>;

#[derive(Deserialize, JsonSchema)]
struct ItemPath {
    /// Item identifier.
    id: u64,
}

#[derive(Deserialize, JsonSchema)]
struct NewItem {
    id: u64,
    name: String,
}

#[derive(Clone, Serialize, JsonSchema)]
struct Item {
    id: u64,
    name: String,
}

fn require_token() -> BoxedHandler {
    handler_fn("requireToken", |ctx, next| {
        Box::pin(async move {
            if ctx.headers().contains_key(http::header::AUTHORIZATION) {
                next.run(ctx).await
            } else {
                let request_id = ctx.request_id().to_string();
                HandlerError::status(http::StatusCode::UNAUTHORIZED, "missing token")
                    .into_response(Some(request_id.as_str()))
            }
        })
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::new()
        .with_development()
        .with_env_prefix("ROUTEDOC")
        .with_dotenv()
        .load()?;

    let store: Store = Arc::default();
    let api = ApiDoc::new();
    let mut items = api.group("/items", Some(Tag::new("items").with_description("Stored items")));

    let get_store = Arc::clone(&store);
    items.get(
        "/:id",
        &[
            options::summary("Get an item"),
            options::response("404", "No such item", None, vec![], None),
        ],
        vec![typed(move |_ctx: Context, path: ItemPath| {
            let store = Arc::clone(&get_store);
            async move {
                store
                    .read()
                    .get(&path.id)
                    .cloned()
                    .ok_or_else(|| HandlerError::not_found(format!("item {}", path.id)))
            }
        })
        .named("getItem")
        .boxed()],
    );

    api.set_info(
        Info::new("Items API", "1.0").with_license(License {
            name: "Apache-2.0".to_string(),
            url: None,
            identifier: Some("Apache-2.0".to_string()),
        }),
    );
    api.register_security_scheme("bearer", SecurityScheme::bearer(Some("JWT".to_string())));
    let mut bearer = SecurityRequirement::new();
    bearer.insert("bearer".to_string(), Vec::new());
    items.use_middleware([require_token()]);
    items.post(
        "",
        &[
            options::summary("Create an item"),
            options::security(bearer),
            options::response("409", "Item exists", None, vec![], None),
        ],
        vec![typed(move |_ctx: Context, new: NewItem| {
            let store = Arc::clone(&store);
            async move {
                let mut stored = store.write();
                if stored.contains_key(&new.id) {
                    return Err(HandlerError::conflict(format!("item {} exists", new.id)));
                }
                let item = Item {
                    id: new.id,
                    name: new.name,
                };
                stored.insert(item.id, item.clone());
                Ok(item)
            }
        })
        .named("createItem")
        .status(http::StatusCode::CREATED)
        .boxed()],
    );

    api.run(&config).await?;
    Ok(())
}
