mod method;
mod model;
mod overrides;

pub use method::HttpMethod;
pub use model::ResponseModel;
pub use overrides::RouteOverrides;

use crate::deps::Dependency;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// One route declared by a viewset.
///
/// `path` is a suffix appended verbatim to the registration prefix, and
/// `endpoint_name` names the handler the viewset resolves through
/// [`Endpoints`](crate::viewset::Endpoints).
///
/// # Example
/// ```
/// use rest_utils::route::{RouteConfig, ResponseModel};
/// use serde_json::json;
///
/// let create = RouteConfig::post("/", "create")
///     .response_model(ResponseModel::named("Todo"))
///     .openapi_extra(json!({ "requestBody": { "required": true } }));
/// assert_eq!(create.endpoint_name, "create");
/// ```
#[derive(Clone)]
pub struct RouteConfig {
    pub path: String,
    pub method: HttpMethod,
    pub endpoint_name: String,
    pub response_model: Option<ResponseModel>,
    pub dependencies: Vec<Arc<dyn Dependency>>,
    pub tags: Vec<String>,
    pub openapi_extra: Option<Value>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: Option<bool>,
    pub include_in_schema: Option<bool>,
    pub kwargs: Map<String, Value>,
}

impl RouteConfig {
    pub fn new(
        path: impl Into<String>,
        method: HttpMethod,
        endpoint_name: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method,
            endpoint_name: endpoint_name.into(),
            response_model: None,
            dependencies: Vec::new(),
            tags: Vec::new(),
            openapi_extra: None,
            name: None,
            summary: None,
            description: None,
            deprecated: None,
            include_in_schema: None,
            kwargs: Map::new(),
        }
    }

    pub fn get(path: impl Into<String>, endpoint_name: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Get, endpoint_name)
    }

    pub fn post(path: impl Into<String>, endpoint_name: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Post, endpoint_name)
    }

    pub fn put(path: impl Into<String>, endpoint_name: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Put, endpoint_name)
    }

    pub fn patch(path: impl Into<String>, endpoint_name: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Patch, endpoint_name)
    }

    pub fn delete(path: impl Into<String>, endpoint_name: impl Into<String>) -> Self {
        Self::new(path, HttpMethod::Delete, endpoint_name)
    }

    pub fn response_model(mut self, model: ResponseModel) -> Self {
        self.response_model = Some(model);
        self
    }

    pub fn dependency(mut self, dependency: Arc<dyn Dependency>) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn dependencies(mut self, dependencies: Vec<Arc<dyn Dependency>>) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn openapi_extra(mut self, extra: Value) -> Self {
        self.openapi_extra = Some(extra);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = Some(deprecated);
        self
    }

    pub fn include_in_schema(mut self, include: bool) -> Self {
        self.include_in_schema = Some(include);
        self
    }

    pub fn kwarg(mut self, key: impl Into<String>, value: Value) -> Self {
        self.kwargs.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteConfig")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("endpoint_name", &self.endpoint_name)
            .field("response_model", &self.response_model)
            .field("dependencies", &dependency_names(&self.dependencies))
            .field("tags", &self.tags)
            .field("openapi_extra", &self.openapi_extra)
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("description", &self.description)
            .field("deprecated", &self.deprecated)
            .field("include_in_schema", &self.include_in_schema)
            .field("kwargs", &self.kwargs)
            .finish()
    }
}

pub(crate) fn dependency_names(dependencies: &[Arc<dyn Dependency>]) -> Vec<&str> {
    dependencies.iter().map(|d| d.name()).collect()
}
