//! Router abstraction.
//!
//! Every strategy answers the same question: which route serves a request
//! path, and with which parameter values. Strategies differ only in the
//! data structure they build up front, so they can be swapped without
//! changing callers.

use crate::{
    dispatch::{Lookup, resolve},
    error::RouterError,
    mapping::{Mapping, RouteEntry, RouteTable},
    method::MethodTable,
    param::ParamValue,
    resource::Resource,
};

/// A successful [`Router::find`].
#[derive(Debug)]
pub struct RouteMatch<'a, F> {
    entry: &'a RouteEntry<F>,
    params: Vec<ParamValue>,
}

impl<'a, F> RouteMatch<'a, F> {
    /// Pair a route with its converted parameters.
    pub fn new(entry: &'a RouteEntry<F>, params: Vec<ParamValue>) -> Self {
        Self { entry, params }
    }

    /// The matched route.
    pub fn entry(&self) -> &'a RouteEntry<F> {
        self.entry
    }

    /// Handler identity of the matched route.
    pub fn resource(&self) -> &'a Resource<F> {
        self.entry.resource()
    }

    /// Handler functions of the matched route.
    pub fn methods(&self) -> &'a MethodTable<F> {
        self.entry.methods()
    }

    /// Converted parameter values, outermost group first.
    pub fn params(&self) -> &[ParamValue] {
        &self.params
    }

    /// Split into the route and its parameters.
    pub fn into_parts(self) -> (&'a RouteEntry<F>, Vec<ParamValue>) {
        (self.entry, self.params)
    }
}

/// A path router.
///
/// Built once, then shared read-only: `find` takes `&self` and never
/// mutates, so one router can serve any number of threads.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot route request paths to `{F}` handlers",
    label = "missing `Router` implementation"
)]
pub trait Router<F>: Send + Sync {
    /// Resolve a request path.
    ///
    /// Returns `None` when no route matches, or when the winning route's
    /// parameters fail conversion.
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>>;

    /// Resolve a request method and path to a handler function.
    fn lookup(&self, method: &str, path: &str) -> Lookup<'_, F> {
        resolve(self.find(path), method)
    }

    /// Check if some route serves `path`.
    fn contains(&self, path: &str) -> bool {
        self.find(path).is_some()
    }
}

/// Construction of a router from registration data.
pub trait BuildRouter<F>: Router<F> + Sized {
    /// Build from a flattened route table.
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError>;

    /// Build from a registration tree.
    ///
    /// The default flattens the tree first. Strategies that exploit the
    /// nesting itself override this.
    fn from_mapping(mapping: &Mapping<F>) -> Result<Self, RouterError> {
        Self::from_table(mapping.flatten()?)
    }
}
