//! Projection of the route table into OpenAPI path items.
//!
//! Only route metadata is forwarded; schemas are referenced, never generated.

use super::{RestRouter, RouteEntry};
use serde_json::{Map, Value, json};

impl RouteEntry {
    /// OpenAPI operation object for this route, with `openapi_extra`
    /// deep-merged on top of the generated fields.
    pub fn operation(&self) -> Value {
        let mut operation = Map::new();
        if !self.tags.is_empty() {
            operation.insert("tags".into(), json!(self.tags));
        }
        if let Some(summary) = &self.summary {
            operation.insert("summary".into(), json!(summary));
        }
        if let Some(description) = &self.description {
            operation.insert("description".into(), json!(description));
        }
        let operation_id = self.name.as_deref().unwrap_or(&self.endpoint_name);
        operation.insert("operationId".into(), json!(operation_id));
        if self.deprecated {
            operation.insert("deprecated".into(), json!(true));
        }

        let mut success = json!({ "description": "Successful Response" });
        if let Some(model) = &self.response_model {
            success["content"] = json!({
                "application/json": { "schema": model.schema_ref() }
            });
        }
        operation.insert("responses".into(), json!({ "200": success }));

        let mut operation = Value::Object(operation);
        if let Some(extra) = &self.openapi_extra {
            deep_merge(&mut operation, extra);
        }
        operation
    }
}

impl<S> RestRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// `paths` object covering every route included in the schema.
    pub fn openapi_paths(&self) -> Value {
        let mut paths = Map::new();
        for route in self.routes.iter().filter(|r| r.include_in_schema) {
            let item = paths
                .entry(route.path.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            item[route.method.openapi_key().as_str()] = route.operation();
        }
        Value::Object(paths)
    }

    /// Minimal OpenAPI document around [`openapi_paths`](Self::openapi_paths).
    pub fn openapi(&self, title: &str, version: &str) -> Value {
        json!({
            "openapi": "3.1.0",
            "info": { "title": title, "version": version },
            "paths": self.openapi_paths(),
        })
    }
}

/// Merges `extra` into `target`; nested objects merge key by key, anything
/// else in `extra` replaces the target value.
pub(crate) fn deep_merge(target: &mut Value, extra: &Value) {
    match (target, extra) {
        (Value::Object(target), Value::Object(extra)) => {
            for (key, value) in extra {
                match target.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, extra) => *target = extra.clone(),
    }
}
