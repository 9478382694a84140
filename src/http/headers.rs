//! Request header map.
//!
//! Names are kept exactly as the client sent them. A repeated name replaces
//! the earlier value rather than accumulating.

/// A header map with last-write-wins semantics.
///
/// Lookups through [`get`](Headers::get) compare names byte-for-byte.
/// Framing code that must honour headers regardless of client casing uses
/// [`get_ignore_case`](Headers::get_ignore_case).
///
/// # Examples
///
/// ```
/// use tcp_http::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("User-Agent", "curl/8.0");
/// headers.insert("User-Agent", "test-client/1.0");
///
/// assert_eq!(headers.get("User-Agent"), Some("test-client/1.0"));
/// assert_eq!(headers.get("user-agent"), None);
/// assert_eq!(headers.get_ignore_case("user-agent"), Some("test-client/1.0"));
/// assert_eq!(headers.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header map with pre-allocated capacity for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Sets `name` to `value`, replacing any earlier value for the exact same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns the value stored under exactly `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value of the first-received name that matches `name`
    /// ignoring ASCII case.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of distinct header names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
