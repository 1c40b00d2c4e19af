use crate::error::RestError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Database session placed in the request by [`db_dep_injector`].
///
/// Handlers take it as a parameter, similar to FastAPI's `Depends(get_db)`.
///
/// # Example
/// ```
/// use rest_utils::deps::Db;
/// use rest_utils::store::{MemoryStore, ModelStore};
/// use axum::Json;
///
/// async fn count(db: Db<MemoryStore<serde_json::Value>>) -> Json<usize> {
///     Json(db.list().await.map(|items| items.len()).unwrap_or(0))
/// }
/// ```
///
/// [`db_dep_injector`]: crate::deps::db_dep_injector
pub struct Db<St: ?Sized>(pub Arc<St>);

/// Current user placed in the request by [`auth_dep_injector`].
///
/// [`auth_dep_injector`]: crate::deps::auth_dep_injector
pub struct AuthUser<U>(pub Arc<U>);

impl<S, St> FromRequestParts<S> for Db<St>
where
    S: Send + Sync,
    St: Send + Sync + 'static,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Db<St>>()
            .cloned()
            .ok_or_else(|| RestError::DependencyMissing {
                name: "db".to_string(),
            })
    }
}

impl<S, U> FromRequestParts<S> for AuthUser<U>
where
    S: Send + Sync,
    U: Send + Sync + 'static,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser<U>>()
            .cloned()
            .ok_or_else(|| RestError::DependencyMissing {
                name: "user".to_string(),
            })
    }
}

impl<St: ?Sized> std::ops::Deref for Db<St> {
    type Target = St;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<St: ?Sized> Clone for Db<St> {
    fn clone(&self) -> Self {
        Db(Arc::clone(&self.0))
    }
}

impl<U> std::ops::Deref for AuthUser<U> {
    type Target = U;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<U> Clone for AuthUser<U> {
    fn clone(&self) -> Self {
        AuthUser(Arc::clone(&self.0))
    }
}
