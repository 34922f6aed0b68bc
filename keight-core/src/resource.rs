//! Handler resources and their builder.
//!
//! A [`Resource`] is one handler identity together with its routes: each
//! route is a path suffix and the functions registered for it per method.
//!
//! ```rust
//! use keight_core::Resource;
//!
//! let books = Resource::builder("BooksAPI")
//!     .route(".json", |r| r.get("do_index").post("do_create"))
//!     .route("/{id:int}.json", |r| {
//!         r.get("do_show").put("do_update").delete("do_delete")
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(books.routes().len(), 2);
//! ```

use crate::{
    error::{MethodErrorKind, RouterError},
    method::{Method, MethodTable},
};

/// One route of a resource: a path suffix and its method table.
#[derive(Debug, Clone)]
pub struct ResourceRoute<F> {
    path: String,
    methods: MethodTable<F>,
}

impl<F> ResourceRoute<F> {
    /// Path suffix, appended to the mount path of the resource.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Handler functions keyed by method.
    pub fn methods(&self) -> &MethodTable<F> {
        &self.methods
    }
}

/// A handler identity and its routes.
#[derive(Debug, Clone)]
pub struct Resource<F> {
    name: String,
    routes: Vec<ResourceRoute<F>>,
}

impl<F> Resource<F> {
    /// Start building a resource named `name`.
    pub fn builder(name: impl Into<String>) -> ResourceBuilder<F> {
        ResourceBuilder {
            name: name.into(),
            routes: Vec::new(),
        }
    }

    /// Handler identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[ResourceRoute<F>] {
        &self.routes
    }
}

/// Builder for [`Resource`].
///
/// Method names are validated on [`build`](ResourceBuilder::build), so the
/// first invalid registration is reported with the resource name.
pub struct ResourceBuilder<F> {
    name: String,
    routes: Vec<(String, Vec<(String, F)>)>,
}

impl<F> ResourceBuilder<F> {
    /// Register handler functions for one path suffix.
    pub fn route(
        mut self,
        path: impl Into<String>,
        define: impl FnOnce(RouteMethods<F>) -> RouteMethods<F>,
    ) -> Self {
        let methods = define(RouteMethods { funcs: Vec::new() });
        self.routes.push((path.into(), methods.funcs));
        self
    }

    /// Validate registrations and produce the resource.
    pub fn build(self) -> Result<Resource<F>, RouterError> {
        let mut routes = Vec::with_capacity(self.routes.len());

        for (path, funcs) in self.routes {
            let mut table = MethodTable::new();
            for (name, func) in funcs {
                let method = check_method(&name).map_err(|reason| RouterError::InvalidMethod {
                    resource: self.name.clone(),
                    method: name.clone(),
                    reason,
                })?;
                if !table.insert(method, func) {
                    return Err(RouterError::InvalidMethod {
                        resource: self.name,
                        method: name,
                        reason: MethodErrorKind::Duplicated,
                    });
                }
            }
            routes.push(ResourceRoute {
                path,
                methods: table,
            });
        }

        Ok(Resource {
            name: self.name,
            routes,
        })
    }
}

fn check_method(name: &str) -> Result<Method, MethodErrorKind> {
    if name != name.to_ascii_uppercase() {
        return Err(MethodErrorKind::NotUppercase);
    }
    match Method::parse(name) {
        Some(Method::Head) => Err(MethodErrorKind::Head),
        Some(method) => Ok(method),
        None => Err(MethodErrorKind::Unknown),
    }
}

/// Handler functions collected for one route.
pub struct RouteMethods<F> {
    funcs: Vec<(String, F)>,
}

impl<F> RouteMethods<F> {
    /// Register `func` for a method given by name (`"GET"`, `"ANY"`, ...).
    pub fn on(mut self, method: impl Into<String>, func: F) -> Self {
        self.funcs.push((method.into(), func));
        self
    }

    /// Register a `GET` handler.
    pub fn get(self, func: F) -> Self {
        self.on(Method::Get.as_str(), func)
    }

    /// Register a `POST` handler.
    pub fn post(self, func: F) -> Self {
        self.on(Method::Post.as_str(), func)
    }

    /// Register a `PUT` handler.
    pub fn put(self, func: F) -> Self {
        self.on(Method::Put.as_str(), func)
    }

    /// Register a `DELETE` handler.
    pub fn delete(self, func: F) -> Self {
        self.on(Method::Delete.as_str(), func)
    }

    /// Register a `PATCH` handler.
    pub fn patch(self, func: F) -> Self {
        self.on(Method::Patch.as_str(), func)
    }

    /// Register an `OPTIONS` handler.
    pub fn options(self, func: F) -> Self {
        self.on(Method::Options.as_str(), func)
    }

    /// Register a `TRACE` handler.
    pub fn trace(self, func: F) -> Self {
        self.on(Method::Trace.as_str(), func)
    }

    /// Register a handler for every method without its own handler.
    pub fn any(self, func: F) -> Self {
        self.on(Method::Any.as_str(), func)
    }
}
