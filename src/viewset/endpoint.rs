use axum::handler::Handler;
use axum::routing::{MethodFilter, MethodRouter, on};

/// A handler not yet bound to an HTTP method.
///
/// The router binds it once it knows the method from the route descriptor.
pub struct Endpoint<S> {
    bind: Box<dyn FnOnce(MethodFilter) -> MethodRouter<S> + Send>,
}

impl<S> Endpoint<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new<H, T>(handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        Self {
            bind: Box::new(move |filter| on(filter, handler)),
        }
    }

    pub fn into_method_router(self, filter: MethodFilter) -> MethodRouter<S> {
        (self.bind)(filter)
    }
}

impl<S> std::fmt::Debug for Endpoint<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}
