//! Sessions the default view mixins query.

mod memory;
#[cfg(feature = "sea-orm-db")]
mod sea;

pub use memory::MemoryStore;
#[cfg(feature = "sea-orm-db")]
pub use sea::SeaOrmStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Storage behind a model viewset: one query or mutation per action.
///
/// Lookups by id return `Ok(None)` (or `Ok(false)` for deletes) when the
/// record does not exist; the views turn that into a 404.
#[async_trait]
pub trait ModelStore: Send + Sync + 'static {
    type Model: Serialize + Send + Sync + 'static;
    type Id: DeserializeOwned + Send + Sync + 'static;

    async fn list(&self) -> Result<Vec<Self::Model>>;

    async fn retrieve(&self, id: Self::Id) -> Result<Option<Self::Model>>;

    async fn create(&self, payload: Value) -> Result<Self::Model>;

    /// Replaces every field of the record.
    async fn update(&self, id: Self::Id, payload: Value) -> Result<Option<Self::Model>>;

    /// Sets only the fields present in `payload`.
    async fn partial_update(&self, id: Self::Id, payload: Value) -> Result<Option<Self::Model>>;

    async fn delete(&self, id: Self::Id) -> Result<bool>;
}
