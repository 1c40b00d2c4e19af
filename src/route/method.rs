use axum::routing::MethodFilter;
use strum_macros::{AsRefStr, Display, EnumString};

/// HTTP method of a route descriptor.
///
/// Parses case-insensitively from its name, so `"get".parse::<HttpMethod>()`
/// and `"GET".parse::<HttpMethod>()` both yield [`HttpMethod::Get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn method_filter(self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Patch => MethodFilter::PATCH,
            HttpMethod::Delete => MethodFilter::DELETE,
            HttpMethod::Head => MethodFilter::HEAD,
            HttpMethod::Options => MethodFilter::OPTIONS,
            HttpMethod::Trace => MethodFilter::TRACE,
        }
    }

    /// Lower-case key used for operations in an OpenAPI path item.
    pub fn openapi_key(self) -> String {
        self.as_ref().to_ascii_lowercase()
    }
}
