use rest_utils::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Default)]
pub struct TodoView;

impl ModelView for TodoView {
    type Store = MemoryStore<Todo>;

    fn schema_config(&self) -> SchemaConfig {
        let new_todo = ResponseModel::named("NewTodo").with_schema(json!({
            "type": "object",
            "required": ["title"],
            "properties": {
                "title": { "type": "string" },
                "done": { "type": "boolean" }
            }
        }));

        SchemaConfig::new()
            .action("list", ActionSchema::new().response(ResponseModel::of::<Todo>()))
            .action("retrieve", ActionSchema::new().response(ResponseModel::of::<Todo>()))
            .action(
                "create",
                ActionSchema::new()
                    .payload(new_todo.clone())
                    .response(ResponseModel::of::<Todo>()),
            )
            .action(
                "update",
                ActionSchema::new()
                    .payload(new_todo)
                    .response(ResponseModel::of::<Todo>()),
            )
    }
}

pub fn session(store: Arc<MemoryStore<Todo>>) -> Arc<dyn Dependency> {
    db_dep_injector(move || {
        let store = store.clone();
        async move { Ok(store) }
    })
}

/// Rejects requests lacking `x-api-key` when a key is configured.
pub fn api_key(expected: Option<String>) -> Arc<dyn Dependency> {
    depends("api_key", move |head: RequestHead| {
        let expected = expected.clone();
        async move {
            match expected {
                None => Ok(()),
                Some(key) if head.header("x-api-key") == Some(key.as_str()) => Ok(()),
                Some(_) => Err(RestError::Unauthorized("missing or invalid x-api-key".into())),
            }
        }
    })
}
