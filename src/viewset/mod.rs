//! Viewset contracts.
//!
//! A viewset declares its routes through [`ViewSet::routes_config`] and hands
//! out the handler behind each route's `endpoint_name` through
//! [`Endpoints::endpoint`]. The `#[viewset]` macro implements `Endpoints` for
//! an impl block.

mod endpoint;
pub mod mixins;
mod schema;

pub use endpoint::Endpoint;
pub use mixins::{
    CreateView, DeleteView, ListView, ModelView, ModelViewSet, PartialUpdateView, RetrieveView,
    UpdateView,
};
pub use schema::{ActionSchema, SchemaConfig};

use crate::route::RouteConfig;
use std::sync::Arc;

/// Declarative description of a group of routes.
///
/// # Example
/// ```
/// use rest_utils::route::RouteConfig;
/// use rest_utils::viewset::ViewSet;
///
/// #[derive(Default)]
/// struct PingViewSet;
///
/// impl ViewSet for PingViewSet {
///     fn routes_config(&self) -> Vec<RouteConfig> {
///         vec![RouteConfig::get("/ping", "ping")]
///     }
/// }
/// ```
pub trait ViewSet: Send + Sync + 'static {
    /// Response and payload models per action name, e.g. `"list"`.
    fn schema_config(&self) -> SchemaConfig {
        SchemaConfig::default()
    }

    fn routes_config(&self) -> Vec<RouteConfig>;
}

/// Resolves handlers by endpoint name for router state `S`.
pub trait Endpoints<S>: Send + Sync + 'static {
    /// `None` when the viewset has no handler of that name.
    fn endpoint(self: Arc<Self>, name: &str) -> Option<Endpoint<S>>;
}
