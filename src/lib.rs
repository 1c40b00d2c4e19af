//! # rest-utils
//!
//! Declarative viewsets and bulk route registration for axum.
//!
//! A viewset lists its routes as [`RouteConfig`](route::RouteConfig)
//! descriptors; [`RestRouter::register_viewset`] mounts all of them under a
//! prefix, merging dependency lists and keeping OpenAPI metadata in an
//! inspectable route table.
//!
//! ## Features
//!
//! - **Viewsets**: routes declared as data, handlers resolved by name
//! - **Model views**: list/retrieve/create/update/partial-update/delete mixins
//!   over a [`ModelStore`](store::ModelStore) session
//! - **Dependencies**: request-scoped providers run before handlers, with
//!   `db` and `user` injectors
//! - **OpenAPI metadata**: per-route extras, tags and summaries projected into
//!   a `paths` object
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rest_utils::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Todo {
//!     id: String,
//!     title: String,
//! }
//!
//! // 1. Describe the model view
//! #[derive(Default)]
//! struct TodoView;
//!
//! impl ModelView for TodoView {
//!     type Store = MemoryStore<Todo>;
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 2. Provide the session every route needs
//!     let store = Arc::new(MemoryStore::<Todo>::new());
//!     let db = db_dep_injector(move || {
//!         let store = store.clone();
//!         async move { Ok(store) }
//!     });
//!
//!     // 3. Register the viewset
//!     let mut router = RestRouter::new();
//!     router.register_viewset::<ModelViewSet<TodoView>>(
//!         "/todos",
//!         Some(vec!["todos".into()]),
//!         RouteOverrides::new().dependency(db),
//!     )?;
//!
//!     // 4. Serve
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router.into_router()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod deps;
pub mod error;
pub mod route;
pub mod router;
pub mod store;
pub mod viewset;

// Re-export core types
pub use config::ConfigService;
pub use error::{RestError, Result};
pub use router::{RestRouter, RouteEntry, ViewSetRouter};

// Re-export macros
pub use rest_utils_macro::{action, viewset};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use rest_utils::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::ConfigService;
    pub use crate::deps::{
        AuthUser, Db, Dependency, RequestHead, auth_dep_injector, db_dep_injector, depends,
    };
    pub use crate::error::{RestError, Result};
    pub use crate::route::{HttpMethod, ResponseModel, RouteConfig, RouteOverrides};
    pub use crate::router::{RestRouter, RouteEntry, ViewSetRouter};
    pub use crate::store::{MemoryStore, ModelStore};
    pub use crate::viewset::{
        ActionSchema, CreateView, DeleteView, Endpoint, Endpoints, ListView, ModelView,
        ModelViewSet, PartialUpdateView, RetrieveView, SchemaConfig, UpdateView, ViewSet,
    };
    pub use crate::{action, viewset};
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
