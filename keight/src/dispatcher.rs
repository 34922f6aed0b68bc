//! Runtime-selected routers and the request dispatcher.

use crate::config::{RouterConfig, RouterKind};
use keight_core::{Lookup, Mapping, RouteMatch, Router, RouterError};
use keight_std::routing::{
    FixedLinearRouter, HashedRegexpRouter, NaiveLinearRouter, NaiveRegexpRouter,
    NestedRegexpRouter, OptimizedRegexpRouter, PrefixLinearRouter, SlicedRegexpRouter,
    SmartRegexpRouter, StateMachineRouter,
};

// ============================================================================
// AnyRouter
// ============================================================================

/// One of the standard strategies, chosen by [`RouterConfig`].
pub enum AnyRouter<F> {
    /// See [`NaiveLinearRouter`].
    NaiveLinear(NaiveLinearRouter<F>),
    /// See [`PrefixLinearRouter`].
    PrefixLinear(PrefixLinearRouter<F>),
    /// See [`FixedLinearRouter`].
    FixedLinear(FixedLinearRouter<F>),
    /// See [`NaiveRegexpRouter`].
    NaiveRegexp(NaiveRegexpRouter<F>),
    /// See [`SmartRegexpRouter`].
    SmartRegexp(SmartRegexpRouter<F>),
    /// See [`NestedRegexpRouter`].
    NestedRegexp(NestedRegexpRouter<F>),
    /// See [`OptimizedRegexpRouter`].
    OptimizedRegexp(OptimizedRegexpRouter<F>),
    /// See [`SlicedRegexpRouter`].
    SlicedRegexp(SlicedRegexpRouter<F>),
    /// See [`HashedRegexpRouter`].
    HashedRegexp(HashedRegexpRouter<F>),
    /// See [`StateMachineRouter`].
    StateMachine(StateMachineRouter<F>),
}

impl<F> AnyRouter<F> {
    /// The wrapped strategy.
    pub fn kind(&self) -> RouterKind {
        match self {
            AnyRouter::NaiveLinear(_) => RouterKind::NaiveLinear,
            AnyRouter::PrefixLinear(_) => RouterKind::PrefixLinear,
            AnyRouter::FixedLinear(_) => RouterKind::FixedLinear,
            AnyRouter::NaiveRegexp(_) => RouterKind::NaiveRegexp,
            AnyRouter::SmartRegexp(_) => RouterKind::SmartRegexp,
            AnyRouter::NestedRegexp(_) => RouterKind::NestedRegexp,
            AnyRouter::OptimizedRegexp(_) => RouterKind::OptimizedRegexp,
            AnyRouter::SlicedRegexp(_) => RouterKind::SlicedRegexp,
            AnyRouter::HashedRegexp(_) => RouterKind::HashedRegexp,
            AnyRouter::StateMachine(_) => RouterKind::StateMachine,
        }
    }
}

impl<F> std::fmt::Debug for AnyRouter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AnyRouter").field(&self.kind()).finish()
    }
}

impl<F: Send + Sync> Router<F> for AnyRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        match self {
            AnyRouter::NaiveLinear(r) => r.find(path),
            AnyRouter::PrefixLinear(r) => r.find(path),
            AnyRouter::FixedLinear(r) => r.find(path),
            AnyRouter::NaiveRegexp(r) => r.find(path),
            AnyRouter::SmartRegexp(r) => r.find(path),
            AnyRouter::NestedRegexp(r) => r.find(path),
            AnyRouter::OptimizedRegexp(r) => r.find(path),
            AnyRouter::SlicedRegexp(r) => r.find(path),
            AnyRouter::HashedRegexp(r) => r.find(path),
            AnyRouter::StateMachine(r) => r.find(path),
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Request-facing entry point.
///
/// Wraps a built router. It is immutable, so share it behind an `Arc` and
/// call it from any number of threads.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::from_config(&RouterConfig::new(RouterKind::StateMachine), &mapping)?;
/// match dispatcher.lookup("GET", "/api/v1/books/123.json") {
///     Lookup::Found { handler, params, .. } => handler(params),
///     Lookup::MethodNotAllowed { allowed, .. } => method_not_allowed(allowed.allow_header()),
///     Lookup::NotFound => not_found(),
/// }
/// ```
#[derive(Debug)]
pub struct Dispatcher<F> {
    router: AnyRouter<F>,
}

impl<F: Send + Sync> Dispatcher<F> {
    /// Wrap a built router.
    pub fn new(router: AnyRouter<F>) -> Self {
        Self { router }
    }

    /// Build the configured strategy and wrap it.
    pub fn from_config(config: &RouterConfig, mapping: &Mapping<F>) -> Result<Self, RouterError> {
        config.build(mapping).map(Self::new)
    }

    /// The wrapped router.
    pub fn router(&self) -> &AnyRouter<F> {
        &self.router
    }

    /// Resolve a request path.
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        self.router.find(path)
    }

    /// Resolve a request method and path.
    pub fn lookup(&self, method: &str, path: &str) -> Lookup<'_, F> {
        self.router.lookup(method, path)
    }

    /// Where to redirect a `GET` or `HEAD` request whose path differs from a
    /// served one only by a trailing `/`.
    ///
    /// Returns `None` when the path is served as is, when the method is not
    /// `GET`/`HEAD`, or when the other spelling is not served either.
    pub fn redirect_location(&self, method: &str, path: &str) -> Option<String> {
        if method != "GET" && method != "HEAD" {
            return None;
        }
        if self.router.contains(path) {
            return None;
        }
        let location = match path.strip_suffix('/') {
            Some(trimmed) => trimmed.to_owned(),
            None => format!("{path}/"),
        };
        if !self.router.contains(&location) {
            return None;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(path, location = %location, "trailing slash redirect");

        Some(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keight_core::Resource;

    fn mapping() -> Mapping<&'static str> {
        let orders = Resource::builder("Orders")
            .route("/", |r| r.get("index"))
            .route("/{id:int}", |r| r.get("show").delete("delete"))
            .build()
            .unwrap();
        Mapping::new().mount("/orders", orders)
    }

    #[test]
    fn test_kind_is_reported() {
        for kind in RouterKind::ALL {
            let dispatcher = Dispatcher::from_config(&kind.into(), &mapping()).unwrap();
            assert_eq!(dispatcher.router().kind(), kind);
        }
    }

    #[test]
    fn test_redirect_location() {
        let dispatcher = Dispatcher::from_config(&RouterConfig::default(), &mapping()).unwrap();
        assert_eq!(dispatcher.redirect_location("GET", "/orders").as_deref(), Some("/orders/"));
        assert_eq!(dispatcher.redirect_location("HEAD", "/orders/1/").as_deref(), Some("/orders/1"));
        assert_eq!(dispatcher.redirect_location("POST", "/orders"), None);
        assert_eq!(dispatcher.redirect_location("GET", "/orders/"), None);
        assert_eq!(dispatcher.redirect_location("GET", "/customers"), None);
    }

    #[test]
    fn test_lookup_delegates() {
        let dispatcher =
            Dispatcher::from_config(&RouterKind::StateMachine.into(), &mapping()).unwrap();
        assert_eq!(dispatcher.lookup("DELETE", "/orders/7").handler(), Some(&"delete"));
        assert!(dispatcher.lookup("PUT", "/orders/7").is_method_not_allowed());
        assert!(dispatcher.lookup("GET", "/orders/x").is_not_found());
    }
}
