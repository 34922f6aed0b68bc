//! HTTP method vocabulary and per-route method tables.
//!
//! Request method names are resolved through a compile-time perfect hash
//! map, so unknown methods cost one failed probe and never allocate.

use bitflags::bitflags;
use phf::phf_map;

/// A request method a handler function can be registered for.
///
/// [`Method::Any`] is the wildcard: it serves every request method that has
/// no handler of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `HEAD` (request side only, never registered)
    Head,
    /// `PATCH`
    Patch,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
    /// Wildcard method.
    Any,
}

static METHODS: phf::Map<&'static str, Method> = phf_map! {
    "GET" => Method::Get,
    "POST" => Method::Post,
    "PUT" => Method::Put,
    "DELETE" => Method::Delete,
    "HEAD" => Method::Head,
    "PATCH" => Method::Patch,
    "OPTIONS" => Method::Options,
    "TRACE" => Method::Trace,
    "ANY" => Method::Any,
};

impl Method {
    /// Parse a method name. Matching is case-sensitive.
    pub fn parse(name: &str) -> Option<Self> {
        METHODS.get(name).copied()
    }

    /// The canonical upper-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Any => "ANY",
        }
    }

    const fn flag(self) -> Methods {
        match self {
            Method::Get => Methods::GET,
            Method::Post => Methods::POST,
            Method::Put => Methods::PUT,
            Method::Delete => Methods::DELETE,
            Method::Head => Methods::HEAD,
            Method::Patch => Methods::PATCH,
            Method::Options => Methods::OPTIONS,
            Method::Trace => Methods::TRACE,
            Method::Any => Methods::ANY,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// A set of methods, used to report what a matched route accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Methods: u16 {
        /// `GET`
        const GET = 1 << 0;
        /// `HEAD`
        const HEAD = 1 << 1;
        /// `POST`
        const POST = 1 << 2;
        /// `PUT`
        const PUT = 1 << 3;
        /// `DELETE`
        const DELETE = 1 << 4;
        /// `PATCH`
        const PATCH = 1 << 5;
        /// `OPTIONS`
        const OPTIONS = 1 << 6;
        /// `TRACE`
        const TRACE = 1 << 7;
        /// Wildcard.
        const ANY = 1 << 8;
    }
}

/// Order used when rendering an `Allow` header.
const ALLOW_ORDER: [Method; 8] = [
    Method::Get,
    Method::Head,
    Method::Post,
    Method::Put,
    Method::Delete,
    Method::Patch,
    Method::Options,
    Method::Trace,
];

impl From<Method> for Methods {
    fn from(method: Method) -> Self {
        method.flag()
    }
}

impl Methods {
    /// Check whether a method is in the set.
    pub fn has(self, method: Method) -> bool {
        self.contains(method.flag())
    }

    /// Format as an HTTP `Allow` header value.
    ///
    /// `GET` implies `HEAD`, since `HEAD` requests fall back to the `GET` handler.
    pub fn allow_header(self) -> String {
        let mut set = self;
        if set.contains(Methods::GET) {
            set |= Methods::HEAD;
        }
        ALLOW_ORDER
            .iter()
            .filter(|m| set.has(**m))
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Handler functions of one route, keyed by method.
#[derive(Debug, Clone)]
pub struct MethodTable<F> {
    entries: Vec<(Method, F)>,
    methods: Methods,
}

impl<F> Default for MethodTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> MethodTable<F> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            methods: Methods::empty(),
        }
    }

    /// Register `func` for `method`.
    ///
    /// Returns `false` (and keeps the table unchanged) if the method is
    /// already present.
    pub(crate) fn insert(&mut self, method: Method, func: F) -> bool {
        if self.methods.has(method) {
            return false;
        }
        self.methods |= method.flag();
        self.entries.push((method, func));
        true
    }

    /// Handler registered for exactly `method`.
    pub fn get(&self, method: Method) -> Option<&F> {
        if !self.methods.has(method) {
            return None;
        }
        self.entries
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, f)| f)
    }

    /// Resolve a request method name to a handler.
    ///
    /// Tries the exact method, then `GET` for a `HEAD` request, then `ANY`.
    /// Unrecognized method names can only be served by `ANY`.
    pub fn resolve(&self, request_method: &str) -> Option<&F> {
        let method = Method::parse(request_method);
        method
            .and_then(|m| self.get(m))
            .or_else(|| match method {
                Some(Method::Head) => self.get(Method::Get),
                _ => None,
            })
            .or_else(|| self.get(Method::Any))
    }

    /// The set of registered methods.
    pub fn methods(&self) -> Methods {
        self.methods
    }

    /// Iterate over `(method, handler)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Method, &F)> {
        self.entries.iter().map(|(m, f)| (*m, f))
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no method is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(methods: &[(Method, &'static str)]) -> MethodTable<&'static str> {
        let mut table = MethodTable::new();
        for (m, f) in methods {
            assert!(table.insert(*m, *f));
        }
        table
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(Method::parse("GET"), Some(Method::Get));
        assert_eq!(Method::parse("ANY"), Some(Method::Any));
        assert_eq!(Method::parse("get"), None);
        assert_eq!(Method::parse("PROPFIND"), None);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut table = MethodTable::new();
        assert!(table.insert(Method::Get, 1));
        assert!(!table.insert(Method::Get, 2));
        assert_eq!(table.get(Method::Get), Some(&1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_resolve_exact_method() {
        let table = table(&[(Method::Get, "show"), (Method::Put, "update")]);
        assert_eq!(table.resolve("GET"), Some(&"show"));
        assert_eq!(table.resolve("PUT"), Some(&"update"));
        assert_eq!(table.resolve("POST"), None);
    }

    #[test]
    fn test_resolve_head_falls_back_to_get() {
        let table = table(&[(Method::Get, "show")]);
        assert_eq!(table.resolve("HEAD"), Some(&"show"));

        let table = table_without_get();
        assert_eq!(table.resolve("HEAD"), None);
    }

    fn table_without_get() -> MethodTable<&'static str> {
        table(&[(Method::Post, "create")])
    }

    #[test]
    fn test_resolve_any_wildcard() {
        let table = table(&[(Method::Get, "show"), (Method::Any, "fallback")]);
        assert_eq!(table.resolve("GET"), Some(&"show"));
        assert_eq!(table.resolve("DELETE"), Some(&"fallback"));
        assert_eq!(table.resolve("PROPFIND"), Some(&"fallback"));
        assert_eq!(table.resolve("get"), Some(&"fallback"));
    }

    #[test]
    fn test_allow_header_adds_head_for_get() {
        let table = table(&[(Method::Post, "create"), (Method::Get, "index")]);
        assert_eq!(table.methods().allow_header(), "GET, HEAD, POST");

        let table = table_without_get();
        assert_eq!(table.methods().allow_header(), "POST");
    }
}
