//! Method resolution on top of [`Router::find`](crate::Router::find).

use crate::{
    method::Methods,
    param::ParamValue,
    resource::Resource,
    router::RouteMatch,
};

/// Outcome of a request lookup.
///
/// None of these is an error: each is an ordinary answer the transport
/// adapter turns into a response.
#[derive(Debug)]
pub enum Lookup<'a, F> {
    /// No route serves the path.
    NotFound,
    /// A route serves the path but has no function for the method.
    MethodNotAllowed {
        /// Handler identity of the route.
        resource: &'a Resource<F>,
        /// Methods the route does accept.
        allowed: Methods,
        /// Converted parameters.
        params: Vec<ParamValue>,
    },
    /// A handler function was found.
    Found {
        /// Handler identity of the route.
        resource: &'a Resource<F>,
        /// The function to call.
        handler: &'a F,
        /// Converted parameters.
        params: Vec<ParamValue>,
    },
}

impl<'a, F> Lookup<'a, F> {
    /// Check if a handler function was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found { .. })
    }

    /// Check if no route serves the path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }

    /// Check if the route exists but rejects the method.
    pub fn is_method_not_allowed(&self) -> bool {
        matches!(self, Lookup::MethodNotAllowed { .. })
    }

    /// The handler function, if found.
    pub fn handler(&self) -> Option<&'a F> {
        match self {
            Lookup::Found { handler, .. } => Some(*handler),
            _ => None,
        }
    }

    /// Handler identity, unless nothing matched.
    pub fn resource(&self) -> Option<&'a Resource<F>> {
        match self {
            Lookup::Found { resource, .. } | Lookup::MethodNotAllowed { resource, .. } => {
                Some(*resource)
            }
            Lookup::NotFound => None,
        }
    }

    /// Converted parameters, unless nothing matched.
    pub fn params(&self) -> Option<&[ParamValue]> {
        match self {
            Lookup::Found { params, .. } | Lookup::MethodNotAllowed { params, .. } => {
                Some(params.as_slice())
            }
            Lookup::NotFound => None,
        }
    }
}

/// Pick the handler function of a found route for a request method.
///
/// Tries the exact method, then `GET` for `HEAD`, then `ANY`.
pub fn resolve<'a, F>(found: Option<RouteMatch<'a, F>>, method: &str) -> Lookup<'a, F> {
    let Some(found) = found else {
        #[cfg(feature = "tracing")]
        tracing::trace!(method = %method, "no route");
        return Lookup::NotFound;
    };

    let methods = found.methods();
    let resource = found.resource();
    let (_, params) = found.into_parts();

    match methods.resolve(method) {
        Some(handler) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(method = %method, resource = %resource.name(), "route found");
            Lookup::Found {
                resource,
                handler,
                params,
            }
        }
        None => {
            #[cfg(feature = "tracing")]
            tracing::trace!(method = %method, resource = %resource.name(), "method not allowed");
            Lookup::MethodNotAllowed {
                resource,
                allowed: methods.methods(),
                params,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mapping::{Mapping, RouteTable},
        router::Router,
    };

    struct MockRouter {
        table: RouteTable<&'static str>,
    }

    impl Router<&'static str> for MockRouter {
        fn find(&self, path: &str) -> Option<RouteMatch<'_, &'static str>> {
            self.table.entries().iter().find_map(|e| {
                e.pattern()
                    .extract(path)
                    .map(|params| RouteMatch::new(e, params))
            })
        }
    }

    fn router() -> MockRouter {
        let show = Resource::builder("ItemAPI")
            .route("/{id:int}", |r| r.get("show").put("update"))
            .route("/{id:int}/raw", |r| r.any("raw"))
            .route("/{id:int}/form", |r| r.post("submit"))
            .build()
            .unwrap();
        let table = Mapping::new().mount("/items", show).flatten().unwrap();
        MockRouter { table }
    }

    #[test]
    fn test_found_exact_method() {
        let router = router();
        let found = router.lookup("PUT", "/items/7");
        assert_eq!(found.handler(), Some(&"update"));
        assert_eq!(found.params(), Some(&[ParamValue::Int(7)][..]));
        assert_eq!(found.resource().map(|r| r.name()), Some("ItemAPI"));
    }

    #[test]
    fn test_head_uses_get() {
        let router = router();
        assert_eq!(router.lookup("HEAD", "/items/7").handler(), Some(&"show"));
    }

    #[test]
    fn test_any_serves_everything() {
        let router = router();
        for method in ["GET", "HEAD", "DELETE", "PROPFIND"] {
            assert_eq!(router.lookup(method, "/items/7/raw").handler(), Some(&"raw"));
        }
    }

    #[test]
    fn test_method_not_allowed() {
        let router = router();
        let result = router.lookup("GET", "/items/7/form");
        match result {
            Lookup::MethodNotAllowed {
                resource,
                allowed,
                params,
            } => {
                assert_eq!(resource.name(), "ItemAPI");
                assert_eq!(allowed.allow_header(), "POST");
                assert_eq!(params, [ParamValue::Int(7)]);
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
        assert!(router.lookup("HEAD", "/items/7/form").is_method_not_allowed());
    }

    #[test]
    fn test_not_found() {
        let router = router();
        let result = router.lookup("GET", "/items/x");
        assert!(result.is_not_found());
        assert!(result.resource().is_none());
        assert!(!router.contains("/items/x"));
        assert!(router.contains("/items/1"));
    }
}
