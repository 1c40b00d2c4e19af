use crate::deps::Dependency;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Caller-supplied keyword overrides applied to every route of a viewset
/// during registration.
///
/// `dependencies` are appended after each route's own dependencies. Scalar
/// fields replace the descriptor's value when set, and `extra` is merged into
/// the descriptor's `kwargs` with these keys winning.
#[derive(Clone, Default)]
pub struct RouteOverrides {
    pub dependencies: Vec<Arc<dyn Dependency>>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: Option<bool>,
    pub include_in_schema: Option<bool>,
    pub extra: Map<String, Value>,
}

impl RouteOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dependency(mut self, dependency: Arc<dyn Dependency>) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn dependencies(mut self, dependencies: Vec<Arc<dyn Dependency>>) -> Self {
        self.dependencies.extend(dependencies);
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

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl std::fmt::Debug for RouteOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteOverrides")
            .field("dependencies", &super::dependency_names(&self.dependencies))
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("description", &self.description)
            .field("deprecated", &self.deprecated)
            .field("include_in_schema", &self.include_in_schema)
            .field("extra", &self.extra)
            .finish()
    }
}
