mod openapi;

use crate::deps::{Dependency, DependencyLayer};
use crate::error::{RestError, Result};
use crate::route::{HttpMethod, ResponseModel, RouteConfig, RouteOverrides, dependency_names};
use crate::viewset::{Endpoint, Endpoints, ViewSet};
use axum::Router;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Routers that can register whole viewsets.
pub trait ViewSetRouter<S> {
    fn register_viewset<V>(
        &mut self,
        prefix: &str,
        tags: Option<Vec<String>>,
        overrides: RouteOverrides,
    ) -> Result<()>
    where
        V: ViewSet + Endpoints<S> + Default;
}

/// One row of the route table: a route as it was mounted.
#[derive(Clone)]
pub struct RouteEntry {
    pub path: String,
    pub method: HttpMethod,
    pub endpoint_name: String,
    pub tags: Vec<String>,
    pub response_model: Option<ResponseModel>,
    pub openapi_extra: Option<Value>,
    pub dependencies: Vec<Arc<dyn Dependency>>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub include_in_schema: bool,
    pub extra: Map<String, Value>,
}

impl RouteEntry {
    /// Entry for a route mounted as-is, with no viewset merge applied.
    pub fn new(path: impl Into<String>, method: HttpMethod, endpoint_name: impl Into<String>) -> Self {
        Self::from_config(RouteConfig::new(path, method, endpoint_name))
    }

    /// Entry carrying every field of a descriptor unchanged.
    pub fn from_config(config: RouteConfig) -> Self {
        Self {
            path: config.path,
            method: config.method,
            endpoint_name: config.endpoint_name,
            tags: config.tags,
            response_model: config.response_model,
            openapi_extra: config.openapi_extra,
            dependencies: config.dependencies,
            name: config.name,
            summary: config.summary,
            description: config.description,
            deprecated: config.deprecated.unwrap_or(false),
            include_in_schema: config.include_in_schema.unwrap_or(true),
            extra: config.kwargs,
        }
    }

    pub fn dependency_names(&self) -> Vec<&str> {
        dependency_names(&self.dependencies)
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("endpoint_name", &self.endpoint_name)
            .field("tags", &self.tags)
            .field("response_model", &self.response_model)
            .field("openapi_extra", &self.openapi_extra)
            .field("dependencies", &self.dependency_names())
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("description", &self.description)
            .field("deprecated", &self.deprecated)
            .field("include_in_schema", &self.include_in_schema)
            .field("extra", &self.extra)
            .finish()
    }
}

/// An axum [`Router`] that keeps a table of the routes mounted on it and
/// registers viewsets in bulk.
///
/// # Example
/// ```
/// use rest_utils::prelude::*;
///
/// #[derive(Default)]
/// struct TodoView;
///
/// impl ModelView for TodoView {
///     type Store = MemoryStore<serde_json::Value>;
/// }
///
/// let mut router = RestRouter::<()>::new();
/// router
///     .register_viewset::<ModelViewSet<TodoView>>("/todos", Some(vec!["todos".into()]), RouteOverrides::new())
///     .unwrap();
/// assert_eq!(router.routes().len(), 6);
/// let app: Router = router.into_router();
/// ```
pub struct RestRouter<S = ()> {
    router: Router<S>,
    routes: Vec<RouteEntry>,
    paths: matchit::Router<()>,
}

impl<S> RestRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            routes: Vec::new(),
            paths: matchit::Router::new(),
        }
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// Mounts one route.
    ///
    /// The endpoint is bound to the entry's method and wrapped with the
    /// entry's dependencies in declaration order.
    ///
    /// # Errors
    /// `InvalidPath` when the path does not start with `/`, uses `:param` /
    /// `*wildcard` segments or has a malformed `{capture}`, `RouteConflict`
    /// when it overlaps a different mounted path (`/items/{id}` against
    /// `/items/{key}`), and `DuplicateRoute` when the method and path are
    /// already mounted. Nothing is mounted on error.
    pub fn add_api_route(&mut self, entry: RouteEntry, endpoint: Endpoint<S>) -> Result<()> {
        validate_path(&entry.path)?;
        let mut known_path = false;
        for route in self.routes.iter().filter(|r| r.path == entry.path) {
            if route.method == entry.method {
                return Err(RestError::DuplicateRoute {
                    method: entry.method.to_string(),
                    path: entry.path.clone(),
                });
            }
            known_path = true;
        }
        if !known_path {
            self.paths
                .insert(entry.path.as_str(), ())
                .map_err(|err| match err {
                    matchit::InsertError::Conflict { with } => RestError::RouteConflict {
                        path: entry.path.clone(),
                        existing: with,
                    },
                    other => RestError::InvalidPath {
                        path: entry.path.clone(),
                        reason: other.to_string(),
                    },
                })?;
        }

        let mut method_router = endpoint.into_method_router(entry.method.method_filter());
        if !entry.dependencies.is_empty() {
            method_router =
                method_router.route_layer(DependencyLayer::new(entry.dependencies.clone()));
        }
        self.router = std::mem::take(&mut self.router).route(&entry.path, method_router);

        tracing::debug!(
            method = %entry.method,
            path = %entry.path,
            endpoint = %entry.endpoint_name,
            dependencies = entry.dependencies.len(),
            "registered route"
        );
        self.routes.push(entry);
        Ok(())
    }

    /// Registers every route a viewset declares under `prefix`.
    ///
    /// For each descriptor the path is `prefix` followed by the descriptor's
    /// path, the handler is resolved by name on a fresh `V::default()`, and
    /// the caller's dependencies are appended after the descriptor's own.
    /// Caller tags come before descriptor tags; other overrides replace the
    /// descriptor's values.
    ///
    /// Routes mounted before a failing descriptor stay mounted.
    pub fn register_viewset<V>(
        &mut self,
        prefix: &str,
        tags: Option<Vec<String>>,
        overrides: RouteOverrides,
    ) -> Result<()>
    where
        V: ViewSet + Endpoints<S> + Default,
    {
        let viewset = Arc::new(V::default());
        let viewset_name = std::any::type_name::<V>();
        let caller_tags = tags.unwrap_or_default();
        let routes = viewset.routes_config();
        let count = routes.len();

        for route in routes {
            let endpoint = Endpoints::<S>::endpoint(viewset.clone(), &route.endpoint_name)
                .ok_or_else(|| RestError::EndpointNotFound {
                    viewset: viewset_name.to_string(),
                    endpoint: route.endpoint_name.clone(),
                })?;

            let mut dependencies = route.dependencies;
            dependencies.extend(overrides.dependencies.iter().cloned());

            let mut tags = caller_tags.clone();
            tags.extend(route.tags);

            let mut extra = route.kwargs;
            extra.extend(overrides.extra.clone());

            let entry = RouteEntry {
                path: format!("{}{}", prefix, route.path),
                method: route.method,
                endpoint_name: route.endpoint_name,
                tags,
                response_model: route.response_model,
                openapi_extra: route.openapi_extra,
                dependencies,
                name: overrides.name.clone().or(route.name),
                summary: overrides.summary.clone().or(route.summary),
                description: overrides.description.clone().or(route.description),
                deprecated: overrides.deprecated.or(route.deprecated).unwrap_or(false),
                include_in_schema: overrides
                    .include_in_schema
                    .or(route.include_in_schema)
                    .unwrap_or(true),
                extra,
            };
            self.add_api_route(entry, endpoint)?;
        }

        tracing::info!(viewset = viewset_name, prefix, routes = count, "registered viewset");
        Ok(())
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

impl<S> ViewSetRouter<S> for RestRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn register_viewset<V>(
        &mut self,
        prefix: &str,
        tags: Option<Vec<String>>,
        overrides: RouteOverrides,
    ) -> Result<()>
    where
        V: ViewSet + Endpoints<S> + Default,
    {
        RestRouter::register_viewset::<V>(self, prefix, tags, overrides)
    }
}

impl<S> Default for RestRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> From<RestRouter<S>> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn from(router: RestRouter<S>) -> Self {
        router.into_router()
    }
}

fn validate_path(path: &str) -> Result<()> {
    let invalid = |reason: &str| RestError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if !path.starts_with('/') {
        return Err(invalid("paths must start with '/'"));
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(invalid("use '{param}' or '{*rest}' captures"));
    }
    Ok(())
}
