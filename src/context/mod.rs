//! Per-request context handed to route handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Request;
use crate::storage::StaticFiles;

/// Path parameters captured by the matched route, e.g. `name` for `/files/:name`.
#[derive(Default, Debug, Clone)]
pub struct Parameters {
    map: HashMap<String, String>,
}

impl Parameters {
    /// Create a new empty parameters map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value into the parameters map
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }

    /// Get a value from the parameters map
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|value| value.as_str())
    }
}

/// Everything a handler may look at: the decoded request, the captured
/// route parameters, and the shared static-file store.
#[derive(Debug)]
pub struct Context {
    request: Request,
    params: Parameters,
    files: Arc<StaticFiles>,
}

impl Context {
    pub fn new(request: Request, params: Parameters, files: Arc<StaticFiles>) -> Self {
        Self {
            request,
            params,
            files,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Returns the captured parameter `key`, or `""` when the route has none.
    pub fn param(&self, key: &str) -> &str {
        self.params.get(key).unwrap_or_default()
    }

    pub fn files(&self) -> &StaticFiles {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_roundtrip() {
        let mut params = Parameters::new();
        assert_eq!(params.get("name"), None);
        params.insert("name", "foo.txt");
        assert_eq!(params.get("name"), Some("foo.txt"));
        assert_eq!(params.get("value"), None);
        params.insert("name", "bar.txt");
        assert_eq!(params.get("name"), Some("bar.txt"));
    }

    #[test]
    fn missing_param_is_empty() {
        let (request, _) = Request::parse(b"GET /user-agent HTTP/1.1\r\n\r\n").unwrap();
        let ctx = Context::new(request, Parameters::new(), Arc::new(StaticFiles::unconfigured()));
        assert_eq!(ctx.param("value"), "");
        assert!(ctx.files().root().is_none());
    }
}
