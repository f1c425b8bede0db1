use http::Method;

/// A single route registration: method, path pattern, and the opaque handler
/// identifier the framework resolves after a match.
///
/// Pattern syntax:
///
/// - `/pets` - literal segments, matched case-sensitively
/// - `/pets/{id}` - named parameter, captures one non-empty segment
/// - `/pets/{id:int}` - same, annotated for caller-side integer coercion
///   (the matcher itself only deals in strings)
/// - `/files/{rest:path}` - named remainder capture, must be the final
///   segment, may be empty and may span embedded slashes
/// - `/files/*` - anonymous remainder capture, must be the final segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// HTTP method this route answers to
    pub method: Method,
    /// Path pattern text, e.g. `/pets/{id}`
    pub pattern: String,
    /// Handler identifier, opaque to the core
    pub handler: String,
}

impl RouteSpec {
    pub fn new(method: Method, pattern: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            method,
            pattern: pattern.into(),
            handler: handler.into(),
        }
    }
}
