use serde_json::{Value, json};

/// Reference to the schema a route responds with (or accepts as payload).
///
/// Only the reference is carried; schemas are not generated here. A model
/// either points at a named component (`#/components/schemas/{name}`) or
/// carries an inline JSON schema supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseModel {
    name: String,
    schema: Option<Value>,
    many: bool,
}

impl ResponseModel {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            many: false,
        }
    }

    /// Names the model after `T`'s type name without its module path.
    ///
    /// For generic wrappers the innermost (last) type argument names the
    /// model: `Vec<Todo>` and `Option<Todo>` both give `Todo`. Use
    /// [`many`](Self::many) to declare an array.
    pub fn of<T: ?Sized>() -> Self {
        let full = std::any::type_name::<T>();
        let inner = full.rsplit('<').next().unwrap_or(full);
        let inner = inner.split('>').next().unwrap_or(inner);
        let inner = inner.rsplit(',').next().unwrap_or(inner).trim();
        let short = inner.rsplit("::").next().unwrap_or(inner);
        Self::named(short)
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// The same model, as a JSON array of it.
    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    pub fn is_many(&self) -> bool {
        self.many
    }

    /// JSON schema object for this model: the inline schema if present,
    /// otherwise a `$ref` to the named component.
    pub fn schema_ref(&self) -> Value {
        let item = match &self.schema {
            Some(schema) => schema.clone(),
            None => json!({ "$ref": format!("#/components/schemas/{}", self.name) }),
        };
        if self.many {
            json!({ "type": "array", "items": item })
        } else {
            item
        }
    }

    /// `requestBody` object declaring this model as the JSON payload.
    pub fn request_body(&self) -> Value {
        json!({
            "required": true,
            "content": {
                "application/json": { "schema": self.schema_ref() }
            }
        })
    }
}
