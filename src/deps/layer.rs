use super::Dependency;
use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer running a route's dependencies, in order, before its handler.
#[derive(Clone)]
pub struct DependencyLayer {
    dependencies: Arc<[Arc<dyn Dependency>]>,
}

impl DependencyLayer {
    pub fn new(dependencies: Vec<Arc<dyn Dependency>>) -> Self {
        Self {
            dependencies: dependencies.into(),
        }
    }
}

impl<I> Layer<I> for DependencyLayer {
    type Service = DependencyService<I>;

    fn layer(&self, inner: I) -> Self::Service {
        DependencyService {
            inner,
            dependencies: self.dependencies.clone(),
        }
    }
}

#[derive(Clone)]
pub struct DependencyService<I> {
    inner: I,
    dependencies: Arc<[Arc<dyn Dependency>]>,
}

impl<I> Service<Request> for DependencyService<I>
where
    I: Service<Request, Response = Response> + Clone + Send + 'static,
    I::Future: Send + 'static,
    I::Error: Send + 'static,
{
    type Response = Response;
    type Error = I::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let dependencies = self.dependencies.clone();
        // The ready service is the one `poll_ready` was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let (mut parts, body) = request.into_parts();
            for dependency in dependencies.iter() {
                if let Err(err) = dependency.resolve(&mut parts).await {
                    tracing::debug!(
                        dependency = dependency.name(),
                        path = %parts.uri.path(),
                        error = %err,
                        "dependency rejected request"
                    );
                    return Ok(err.into_response());
                }
            }
            inner.call(Request::from_parts(parts, body)).await
        })
    }
}
