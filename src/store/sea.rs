use super::ModelStore;
use crate::error::{RestError, Result};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, Iterable, ModelTrait, PrimaryKeyToColumn, PrimaryKeyTrait, TryIntoModel,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// sea-orm backed store for entity `E`.
///
/// Payload keys are the model's JSON keys. A full update writes every
/// column: columns missing from the payload are written as `null`, which
/// fails with `InvalidPayload` for non-nullable columns.
pub struct SeaOrmStore<E> {
    db: DatabaseConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<E> SeaOrmStore<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn into_connection(self) -> DatabaseConnection {
        self.db
    }
}

#[async_trait]
impl<E> ModelStore for SeaOrmStore<E>
where
    E: EntityTrait,
    E::Model: Serialize
        + DeserializeOwned
        + IntoActiveModel<E::ActiveModel>
        + ModelTrait<Entity = E>
        + Send
        + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E>
        + ActiveModelBehavior
        + TryIntoModel<E::Model>
        + Send
        + Sync,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: DeserializeOwned + Send + Sync,
{
    type Model = E::Model;
    type Id = <E::PrimaryKey as PrimaryKeyTrait>::ValueType;

    async fn list(&self) -> Result<Vec<E::Model>> {
        Ok(E::find().all(&self.db).await?)
    }

    async fn retrieve(&self, id: Self::Id) -> Result<Option<E::Model>> {
        Ok(E::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, payload: Value) -> Result<E::Model> {
        let active = E::ActiveModel::from_json(Value::Object(into_object(payload)?))?;
        Ok(active.insert(&self.db).await?)
    }

    async fn update(&self, id: Self::Id, payload: Value) -> Result<Option<E::Model>> {
        let Some(existing) = E::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut record = into_object(payload)?;
        let primary_keys: Vec<&'static str> = E::PrimaryKey::iter()
            .map(|pk| pk.into_column().json_key())
            .collect();

        for (key, value) in into_object(serde_json::to_value(&existing)?)? {
            if primary_keys.iter().any(|pk| key == *pk) {
                record.insert(key, value);
            } else {
                record.entry(key).or_insert(Value::Null);
            }
        }
        // Rejects nulls in non-nullable columns before anything is written.
        serde_json::from_value::<E::Model>(Value::Object(record.clone()))?;

        let active = E::ActiveModel::from_json(Value::Object(record))?;
        Ok(Some(active.update(&self.db).await?))
    }

    async fn partial_update(&self, id: Self::Id, payload: Value) -> Result<Option<E::Model>> {
        let Some(model) = E::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut active = model.into_active_model();
        active.set_from_json(Value::Object(into_object(payload)?))?;
        Ok(Some(active.update(&self.db).await?))
    }

    async fn delete(&self, id: Self::Id) -> Result<bool> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
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

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;

    mod note {
        use sea_orm::entity::prelude::*;
        use serde::{Deserialize, Serialize};

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
        #[sea_orm(table_name = "notes")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub title: String,
            pub body: Option<String>,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn row(id: i32, title: &str, body: Option<&str>) -> note::Model {
        note::Model {
            id,
            title: title.to_string(),
            body: body.map(str::to_string),
        }
    }

    fn last_sql(store: SeaOrmStore<note::Entity>) -> String {
        let log = store.into_connection().into_transaction_log();
        log.last()
            .and_then(|tx| tx.statements().first())
            .map(|stmt| stmt.sql.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_crud_round_trip() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(1, "first", None)]])
            .append_query_results([vec![row(1, "first", None), row(2, "second", Some("x"))]])
            .append_query_results([vec![row(2, "second", Some("x"))]])
            .append_query_results([Vec::<note::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let store = SeaOrmStore::<note::Entity>::new(db);

        let created = store.create(json!({ "title": "first" })).await.unwrap();
        assert_eq!(created, row(1, "first", None));

        assert_eq!(store.list().await.unwrap().len(), 2);
        assert_eq!(
            store.retrieve(2).await.unwrap(),
            Some(row(2, "second", Some("x")))
        );
        assert_eq!(store.retrieve(3).await.unwrap(), None);

        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_full_update_resets_omitted_columns() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(1, "first", Some("draft"))]])
            .append_query_results([vec![row(1, "renamed", None)]])
            .into_connection();
        let store = SeaOrmStore::<note::Entity>::new(db);

        let updated = store
            .update(1, json!({ "title": "renamed" }))
            .await
            .unwrap();
        assert_eq!(updated, Some(row(1, "renamed", None)));

        let sql = last_sql(store);
        assert!(sql.starts_with(r#"UPDATE "notes""#), "{sql}");
        assert!(sql.contains(r#""title" = "#), "{sql}");
        assert!(sql.contains(r#""body" = "#), "{sql}");
    }

    #[tokio::test]
    async fn test_partial_update_keeps_omitted_columns() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(1, "first", Some("draft"))]])
            .append_query_results([vec![row(1, "renamed", Some("draft"))]])
            .into_connection();
        let store = SeaOrmStore::<note::Entity>::new(db);

        store
            .partial_update(1, json!({ "title": "renamed" }))
            .await
            .unwrap();

        let sql = last_sql(store);
        assert!(sql.contains(r#""title" = "#), "{sql}");
        assert!(!sql.contains(r#""body" = "#), "{sql}");
    }

    #[tokio::test]
    async fn test_full_update_requires_non_nullable_columns() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(1, "first", None)]])
            .into_connection();
        let store = SeaOrmStore::<note::Entity>::new(db);

        let err = store
            .update(1, json!({ "body": "text only" }))
            .await
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<note::Model>::new(), Vec::<note::Model>::new()])
            .into_connection();
        let store = SeaOrmStore::<note::Entity>::new(db);

        assert_eq!(store.update(9, json!({ "title": "x" })).await.unwrap(), None);
        assert_eq!(
            store.partial_update(9, json!({ "title": "x" })).await.unwrap(),
            None
        );
    }
}
