//! Request-scoped dependencies.
//!
//! A [`Dependency`] runs before a route's handler. It may reject the request
//! (the error becomes the response) or place values into the request
//! extensions, where extractors such as [`Db`] and [`AuthUser`] pick them up.

mod extractor;
mod injector;
mod layer;

pub use extractor::{AuthUser, Db};
pub use injector::{AuthInjector, DbInjector, auth_dep_injector, db_dep_injector};
pub use layer::{DependencyLayer, DependencyService};

use crate::error::Result;
use async_trait::async_trait;
use axum::http::{HeaderMap, Method, Uri, request::Parts};
use std::future::Future;
use std::sync::Arc;

/// A provider run before the handler of every route it is attached to.
#[async_trait]
pub trait Dependency: Send + Sync + 'static {
    /// Name shown in route tables and logs.
    fn name(&self) -> &str;

    async fn resolve(&self, parts: &mut Parts) -> Result<()>;
}

/// Owned snapshot of the request line and headers handed to providers.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestHead {
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Token of an `Authorization: Bearer <token>` header.
    pub fn bearer_token(&self) -> Option<&str> {
        self.header("authorization")
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
    }
}

/// A dependency built from a check over the request head.
pub struct FnDependency<F> {
    name: String,
    check: F,
}

#[async_trait]
impl<F, Fut> Dependency for FnDependency<F>
where
    F: Fn(RequestHead) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn resolve(&self, parts: &mut Parts) -> Result<()> {
        (self.check)(RequestHead::from_parts(parts)).await
    }
}

/// Wraps a check into a dependency that rejects the request when the check
/// fails.
///
/// # Example
/// ```
/// use rest_utils::deps::depends;
/// use rest_utils::RestError;
///
/// let require_key = depends("api_key", |head| async move {
///     match head.header("x-api-key") {
///         Some(_) => Ok(()),
///         None => Err(RestError::Unauthorized("missing x-api-key".into())),
///     }
/// });
/// assert_eq!(require_key.name(), "api_key");
/// ```
pub fn depends<F, Fut>(name: impl Into<String>, check: F) -> Arc<dyn Dependency>
where
    F: Fn(RequestHead) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(FnDependency {
        name: name.into(),
        check,
    })
}
