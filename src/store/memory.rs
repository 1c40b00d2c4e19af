use super::ModelStore;
use crate::error::{RestError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// In-memory store keeping records as JSON objects keyed by their id field.
///
/// Records list in insertion order. A created record without an id gets a
/// random UUID. Every write is validated by deserializing into `M`.
pub struct MemoryStore<M> {
    rows: DashMap<String, Row>,
    next_seq: AtomicU64,
    id_field: String,
    _model: PhantomData<fn() -> M>,
}

struct Row {
    seq: u64,
    value: Map<String, Value>,
}

impl<M> MemoryStore<M>
where
    M: Serialize + DeserializeOwned,
{
    pub fn new() -> Self {
        Self::with_id_field("id")
    }

    pub fn with_id_field(id_field: impl Into<String>) -> Self {
        Self {
            rows: DashMap::new(),
            next_seq: AtomicU64::new(0),
            id_field: id_field.into(),
            _model: PhantomData,
        }
    }

    /// Stores an already-built record, e.g. when seeding.
    pub fn insert(&self, model: &M) -> Result<M> {
        self.insert_object(to_object(model)?)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn insert_object(&self, mut object: Map<String, Value>) -> Result<M> {
        let key = match object.get(&self.id_field) {
            Some(id) => id_key(id)?,
            None => {
                let id = Uuid::new_v4().to_string();
                object.insert(self.id_field.clone(), Value::String(id.clone()));
                id
            }
        };

        let (model, value) = validate::<M>(object)?;
        match self.rows.entry(key) {
            Entry::Occupied(entry) => Err(RestError::InvalidPayload(format!(
                "{} '{}' already exists",
                self.id_field,
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                entry.insert(Row { seq, value });
                Ok(model)
            }
        }
    }

    fn write(&self, id: &str, payload: Value, partial: bool) -> Result<Option<M>> {
        let patch = into_object(payload)?;
        let Some(mut row) = self.rows.get_mut(id) else {
            return Ok(None);
        };

        let mut object = if partial {
            row.value.clone()
        } else {
            Map::new()
        };
        for (key, value) in patch {
            if key != self.id_field {
                object.insert(key, value);
            }
        }
        if let Some(id_value) = row.value.get(&self.id_field) {
            object.insert(self.id_field.clone(), id_value.clone());
        }

        let (model, value) = validate::<M>(object)?;
        row.value = value;
        Ok(Some(model))
    }
}

impl<M> Default for MemoryStore<M>
where
    M: Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<M> ModelStore for MemoryStore<M>
where
    M: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type Model = M;
    type Id = String;

    async fn list(&self) -> Result<Vec<M>> {
        let mut rows: Vec<(u64, Value)> = self
            .rows
            .iter()
            .map(|row| (row.seq, Value::Object(row.value.clone())))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);

        rows.into_iter()
            .map(|(_, value)| serde_json::from_value(value).map_err(RestError::from))
            .collect()
    }

    async fn retrieve(&self, id: String) -> Result<Option<M>> {
        let Some(row) = self.rows.get(&id) else {
            return Ok(None);
        };
        let value = Value::Object(row.value.clone());
        drop(row);
        Ok(Some(serde_json::from_value(value)?))
    }

    async fn create(&self, payload: Value) -> Result<M> {
        self.insert_object(into_object(payload)?)
    }

    async fn update(&self, id: String, payload: Value) -> Result<Option<M>> {
        self.write(&id, payload, false)
    }

    async fn partial_update(&self, id: String, payload: Value) -> Result<Option<M>> {
        self.write(&id, payload, true)
    }

    async fn delete(&self, id: String) -> Result<bool> {
        Ok(self.rows.remove(&id).is_some())
    }
}

fn into_object(payload: Value) -> Result<Map<String, Value>> {
    match payload {
        Value::Object(object) => Ok(object),
        other => Err(RestError::InvalidPayload(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

fn to_object<M: Serialize>(model: &M) -> Result<Map<String, Value>> {
    into_object(serde_json::to_value(model)?)
}

fn id_key(id: &Value) -> Result<String> {
    match id {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(RestError::InvalidPayload(format!(
            "id must be a string or number, got {}",
            other
        ))),
    }
}

/// Deserializes into `M` and returns the record together with its
/// normalized JSON form.
fn validate<M: Serialize + DeserializeOwned>(object: Map<String, Value>) -> Result<(M, Map<String, Value>)> {
    let model: M = serde_json::from_value(Value::Object(object))?;
    let value = to_object(&model)?;
    Ok((model, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Todo {
        id: String,
        title: String,
        #[serde(default)]
        done: bool,
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_lists_in_order() {
        let store = MemoryStore::<Todo>::new();
        let first = store.create(json!({ "title": "write docs" })).await.unwrap();
        let second = store
            .create(json!({ "id": "fixed", "title": "ship" }))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&first.id).is_ok());
        assert_eq!(second.id, "fixed");

        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["write docs", "ship"]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_and_duplicate() {
        let store = MemoryStore::<Todo>::new();
        assert!(matches!(
            store.create(json!({ "done": true })).await,
            Err(RestError::InvalidPayload(_))
        ));
        assert!(matches!(
            store.create(json!([1, 2])).await,
            Err(RestError::InvalidPayload(_))
        ));

        store.create(json!({ "id": "a", "title": "x" })).await.unwrap();
        assert!(matches!(
            store.create(json!({ "id": "a", "title": "y" })).await,
            Err(RestError::InvalidPayload(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_and_partial_update_merges() {
        let store = MemoryStore::<Todo>::new();
        store
            .insert(&Todo {
                id: "1".into(),
                title: "draft".into(),
                done: true,
            })
            .unwrap();

        let patched = store
            .partial_update("1".into(), json!({ "title": "final" }))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(patched.title, "final");
        assert!(patched.done);

        let replaced = store
            .update("1".into(), json!({ "id": "other", "title": "again" }))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.id, "1");
        assert!(!replaced.done);

        assert!(store.update("missing".into(), json!({})).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_retrieve_and_delete() {
        let store = MemoryStore::<Todo>::new();
        store.create(json!({ "id": 5, "title": "numeric" })).await.unwrap_err();

        store.create(json!({ "id": "5", "title": "text" })).await.unwrap();
        assert_eq!(
            store.retrieve("5".into()).await.unwrap().map(|t| t.title),
            Some("text".to_string())
        );
        assert!(store.delete("5".into()).await.unwrap());
        assert!(!store.delete("5".into()).await.unwrap());
        assert!(store.retrieve("5".into()).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_custom_id_field() {
        let store = MemoryStore::<Value>::with_id_field("slug");
        let created = store.create(json!({ "name": "a" })).await.unwrap();
        let slug = created["slug"].as_str().unwrap().to_string();
        assert!(store.retrieve(slug).await.unwrap().is_some());
    }
}
