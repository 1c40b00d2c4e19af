use proc_macro::TokenStream;

mod viewset;

/// Attribute macro resolving a viewset's endpoints by method name
///
/// Every `async fn(&self, ..)` marked `#[action]` becomes an endpoint whose
/// parameters are axum extractors. `#[action(name = "...")]` registers it
/// under another name. Without arguments the impl is generic over the router
/// state; `#[viewset(state = AppState)]` pins it.
///
/// # Example
/// ```ignore
/// use rest_utils::prelude::*;
///
/// #[derive(Default)]
/// pub struct HealthViewSet;
///
/// #[viewset]
/// impl HealthViewSet {
///     #[action]
///     async fn ping(&self) -> &'static str {
///         "pong"
///     }
///
///     #[action(name = "echo")]
///     async fn echo_path(&self, Path(word): Path<String>) -> String {
///         word
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn viewset(attr: TokenStream, item: TokenStream) -> TokenStream {
    viewset::viewset_attribute(attr, item)
}

/// Marks a method of a `#[viewset]` impl as an endpoint
///
/// Consumed by `#[viewset]`; on its own it leaves the method untouched.
#[proc_macro_attribute]
pub fn action(_attr: TokenStream, item: TokenStream) -> TokenStream {
    // Pass-through, actual handling is done by #[viewset] macro
    item
}
