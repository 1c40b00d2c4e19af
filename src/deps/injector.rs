use super::{AuthUser, Db, Dependency, RequestHead};
use crate::error::Result;
use async_trait::async_trait;
use axum::http::request::Parts;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Dependency that opens a session from a provider and stores it as
/// [`Db<St>`](Db) on the request.
pub struct DbInjector<St, F> {
    provider: F,
    _store: PhantomData<fn() -> St>,
}

/// Dependency that resolves the current user from the request head and
/// stores it as [`AuthUser<U>`](AuthUser) on the request.
pub struct AuthInjector<U, F> {
    provider: F,
    _user: PhantomData<fn() -> U>,
}

/// Adapts a session provider into a request-scoped dependency named `db`.
///
/// # Example
/// ```
/// use rest_utils::deps::db_dep_injector;
/// use rest_utils::store::MemoryStore;
/// use std::sync::Arc;
///
/// let store: Arc<MemoryStore<serde_json::Value>> = Arc::new(MemoryStore::new());
/// let db = db_dep_injector(move || {
///     let store = store.clone();
///     async move { Ok(store) }
/// });
/// assert_eq!(db.name(), "db");
/// ```
pub fn db_dep_injector<St, F, Fut>(provider: F) -> Arc<dyn Dependency>
where
    St: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Arc<St>>> + Send + 'static,
{
    Arc::new(DbInjector {
        provider,
        _store: PhantomData,
    })
}

/// Adapts a user provider into a request-scoped dependency named `user`.
///
/// The provider receives the request head and returns the user, or an error
/// (typically [`RestError::Unauthorized`](crate::RestError::Unauthorized))
/// that becomes the response.
pub fn auth_dep_injector<U, F, Fut>(provider: F) -> Arc<dyn Dependency>
where
    U: Send + Sync + 'static,
    F: Fn(RequestHead) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<U>> + Send + 'static,
{
    Arc::new(AuthInjector {
        provider,
        _user: PhantomData,
    })
}

#[async_trait]
impl<St, F, Fut> Dependency for DbInjector<St, F>
where
    St: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Arc<St>>> + Send + 'static,
{
    fn name(&self) -> &str {
        "db"
    }

    async fn resolve(&self, parts: &mut Parts) -> Result<()> {
        let session = (self.provider)().await?;
        parts.extensions.insert(Db(session));
        Ok(())
    }
}

#[async_trait]
impl<U, F, Fut> Dependency for AuthInjector<U, F>
where
    U: Send + Sync + 'static,
    F: Fn(RequestHead) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<U>> + Send + 'static,
{
    fn name(&self) -> &str {
        "user"
    }

    async fn resolve(&self, parts: &mut Parts) -> Result<()> {
        let user = (self.provider)(RequestHead::from_parts(parts)).await?;
        parts.extensions.insert(AuthUser(Arc::new(user)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RestError;
    use axum::http::Request;

    #[derive(Debug, PartialEq)]
    struct User {
        name: String,
    }

    #[tokio::test]
    async fn test_db_injector_inserts_session() {
        let injector = db_dep_injector(|| async { Ok(Arc::new(String::from("session"))) });
        assert_eq!(injector.name(), "db");

        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        injector.resolve(&mut parts).await.unwrap();

        let Db(session) = parts.extensions.get::<Db<String>>().cloned().unwrap();
        assert_eq!(session.as_str(), "session");
    }

    #[tokio::test]
    async fn test_auth_injector_uses_request_head() {
        let injector = auth_dep_injector(|head: RequestHead| async move {
            head.bearer_token()
                .map(|token| User {
                    name: token.to_string(),
                })
                .ok_or_else(|| RestError::Unauthorized("missing token".into()))
        });
        assert_eq!(injector.name(), "user");

        let (mut parts, _) = Request::builder()
            .header("authorization", "Bearer alice")
            .body(())
            .unwrap()
            .into_parts();
        injector.resolve(&mut parts).await.unwrap();

        let user = parts.extensions.get::<AuthUser<User>>().cloned().unwrap();
        assert_eq!(user.name, "alice");

        let (mut anonymous, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(matches!(
            injector.resolve(&mut anonymous).await,
            Err(RestError::Unauthorized(_))
        ));
        assert!(anonymous.extensions.get::<AuthUser<User>>().is_none());
    }
}
