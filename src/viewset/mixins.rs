//! Default handlers for model-backed viewsets.
//!
//! Each mixin is opt-in: implement it (usually with an empty `impl` block)
//! for a [`ModelView`] and the default handler queries the view's store
//! through the [`Db`] session placed on the request by
//! [`db_dep_injector`](crate::deps::db_dep_injector).
//!
//! | action           | route          | success              |
//! |------------------|----------------|----------------------|
//! | `list`           | `GET /`        | 200, array           |
//! | `create`         | `POST /`       | 201, record          |
//! | `retrieve`       | `GET /{id}`    | 200, record          |
//! | `update`         | `PUT /{id}`    | 200, record          |
//! | `partial_update` | `PATCH /{id}`  | 200, record          |
//! | `delete`         | `DELETE /{id}` | 204, empty           |
//!
//! Lookups of a missing id answer 404.

use super::{Endpoint, Endpoints, SchemaConfig, ViewSet};
use crate::deps::Db;
use crate::error::{RestError, Result};
use crate::route::{ResponseModel, RouteConfig};
use crate::store::ModelStore;
use async_trait::async_trait;
use axum::{Json, extract::Path, http::StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;

type ModelOf<V> = <<V as ModelView>::Store as ModelStore>::Model;
type IdOf<V> = <<V as ModelView>::Store as ModelStore>::Id;

/// A view backed by a [`ModelStore`].
pub trait ModelView: Send + Sync + 'static {
    type Store: ModelStore;

    fn schema_config(&self) -> SchemaConfig {
        SchemaConfig::default()
    }
}

#[async_trait]
pub trait ListView: ModelView {
    async fn list(&self, db: Db<Self::Store>) -> Result<Json<Vec<ModelOf<Self>>>> {
        Ok(Json(db.list().await?))
    }
}

#[async_trait]
pub trait RetrieveView: ModelView {
    async fn retrieve(&self, db: Db<Self::Store>, id: IdOf<Self>) -> Result<Json<ModelOf<Self>>> {
        db.retrieve(id)
            .await?
            .map(Json)
            .ok_or_else(not_found::<Self>)
    }
}

#[async_trait]
pub trait CreateView: ModelView {
    async fn create(
        &self,
        db: Db<Self::Store>,
        payload: Value,
    ) -> Result<(StatusCode, Json<ModelOf<Self>>)> {
        let created = db.create(payload).await?;
        Ok((StatusCode::CREATED, Json(created)))
    }
}

#[async_trait]
pub trait UpdateView: ModelView {
    async fn update(
        &self,
        db: Db<Self::Store>,
        id: IdOf<Self>,
        payload: Value,
    ) -> Result<Json<ModelOf<Self>>> {
        db.update(id, payload)
            .await?
            .map(Json)
            .ok_or_else(not_found::<Self>)
    }
}

#[async_trait]
pub trait PartialUpdateView: ModelView {
    async fn partial_update(
        &self,
        db: Db<Self::Store>,
        id: IdOf<Self>,
        payload: Value,
    ) -> Result<Json<ModelOf<Self>>> {
        db.partial_update(id, payload)
            .await?
            .map(Json)
            .ok_or_else(not_found::<Self>)
    }
}

#[async_trait]
pub trait DeleteView: ModelView {
    async fn delete(&self, db: Db<Self::Store>, id: IdOf<Self>) -> Result<StatusCode> {
        if db.delete(id).await? {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(not_found::<Self>())
        }
    }
}

fn not_found<V: ModelView + ?Sized>() -> RestError {
    RestError::NotFound(format!(
        "{} not found",
        ResponseModel::of::<ModelOf<V>>().name()
    ))
}

pub fn list_endpoint<V, S>(view: Arc<V>) -> Endpoint<S>
where
    V: ListView,
    S: Clone + Send + Sync + 'static,
{
    Endpoint::new(move |db: Db<V::Store>| async move { view.list(db).await })
}

pub fn retrieve_endpoint<V, S>(view: Arc<V>) -> Endpoint<S>
where
    V: RetrieveView,
    S: Clone + Send + Sync + 'static,
{
    Endpoint::new(
        move |db: Db<V::Store>, Path(id): Path<IdOf<V>>| async move { view.retrieve(db, id).await },
    )
}

pub fn create_endpoint<V, S>(view: Arc<V>) -> Endpoint<S>
where
    V: CreateView,
    S: Clone + Send + Sync + 'static,
{
    Endpoint::new(
        move |db: Db<V::Store>, Json(payload): Json<Value>| async move {
            view.create(db, payload).await
        },
    )
}

pub fn update_endpoint<V, S>(view: Arc<V>) -> Endpoint<S>
where
    V: UpdateView,
    S: Clone + Send + Sync + 'static,
{
    Endpoint::new(
        move |db: Db<V::Store>, Path(id): Path<IdOf<V>>, Json(payload): Json<Value>| async move {
            view.update(db, id, payload).await
        },
    )
}

pub fn partial_update_endpoint<V, S>(view: Arc<V>) -> Endpoint<S>
where
    V: PartialUpdateView,
    S: Clone + Send + Sync + 'static,
{
    Endpoint::new(
        move |db: Db<V::Store>, Path(id): Path<IdOf<V>>, Json(payload): Json<Value>| async move {
            view.partial_update(db, id, payload).await
        },
    )
}

pub fn delete_endpoint<V, S>(view: Arc<V>) -> Endpoint<S>
where
    V: DeleteView,
    S: Clone + Send + Sync + 'static,
{
    Endpoint::new(
        move |db: Db<V::Store>, Path(id): Path<IdOf<V>>| async move { view.delete(db, id).await },
    )
}

/// All six mixins over a [`ModelView`], with the conventional routes.
///
/// Response models come from the view's schema config (`list` is declared as
/// an array of its model); a `payload` model on `create`, `update` or
/// `partial_update` becomes the route's OpenAPI `requestBody`.
///
/// # Example
/// ```
/// use rest_utils::route::ResponseModel;
/// use rest_utils::store::MemoryStore;
/// use rest_utils::viewset::{ActionSchema, ModelView, ModelViewSet, SchemaConfig, ViewSet};
///
/// #[derive(Default)]
/// struct TodoView;
///
/// impl ModelView for TodoView {
///     type Store = MemoryStore<serde_json::Value>;
///
///     fn schema_config(&self) -> SchemaConfig {
///         SchemaConfig::new().action("list", ActionSchema::new().response(ResponseModel::named("Todo")))
///     }
/// }
///
/// let viewset = ModelViewSet::<TodoView>::default();
/// assert_eq!(viewset.routes_config().len(), 6);
/// ```
#[derive(Debug, Default)]
pub struct ModelViewSet<V> {
    view: V,
}

impl<V: ModelView> ModelViewSet<V> {
    pub fn new(view: V) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}

impl<V: ModelView> ModelView for ModelViewSet<V> {
    type Store = V::Store;

    fn schema_config(&self) -> SchemaConfig {
        self.view.schema_config()
    }
}

impl<V: ModelView> ListView for ModelViewSet<V> {}
impl<V: ModelView> RetrieveView for ModelViewSet<V> {}
impl<V: ModelView> CreateView for ModelViewSet<V> {}
impl<V: ModelView> UpdateView for ModelViewSet<V> {}
impl<V: ModelView> PartialUpdateView for ModelViewSet<V> {}
impl<V: ModelView> DeleteView for ModelViewSet<V> {}

impl<V: ModelView> ViewSet for ModelViewSet<V> {
    fn schema_config(&self) -> SchemaConfig {
        ModelView::schema_config(self)
    }

    fn routes_config(&self) -> Vec<RouteConfig> {
        let schemas = ModelView::schema_config(self);
        let declare = |route: RouteConfig| -> RouteConfig {
            let action = route.endpoint_name.clone();
            let mut route = route;
            if let Some(model) = schemas.response(&action) {
                let model = if action == "list" {
                    model.clone().many()
                } else {
                    model.clone()
                };
                route = route.response_model(model);
            }
            if let Some(payload) = schemas.payload(&action) {
                route = route.openapi_extra(json!({ "requestBody": payload.request_body() }));
            }
            route
        };

        vec![
            declare(RouteConfig::get("/", "list")),
            declare(RouteConfig::post("/", "create")),
            declare(RouteConfig::get("/{id}", "retrieve")),
            declare(RouteConfig::put("/{id}", "update")),
            declare(RouteConfig::patch("/{id}", "partial_update")),
            declare(RouteConfig::delete("/{id}", "delete")),
        ]
    }
}

impl<V, S> Endpoints<S> for ModelViewSet<V>
where
    V: ModelView,
    S: Clone + Send + Sync + 'static,
{
    fn endpoint(self: Arc<Self>, name: &str) -> Option<Endpoint<S>> {
        match name {
            "list" => Some(list_endpoint(self)),
            "create" => Some(create_endpoint(self)),
            "retrieve" => Some(retrieve_endpoint(self)),
            "update" => Some(update_endpoint(self)),
            "partial_update" => Some(partial_update_endpoint(self)),
            "delete" => Some(delete_endpoint(self)),
            _ => None,
        }
    }
}
