//! # keight - URL Path Dispatch Engine
//!
//! `keight` maps a request path and method to a handler function. Handler
//! resources are mounted into a nested [`Mapping`]; one of ten routing
//! strategies is built from it at startup and then answers lookups without
//! ever changing again.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keight::prelude::*;
//!
//! let books = Resource::builder("BooksAPI")
//!     .route(".json", |r| r.get(index).post(create))
//!     .route("/{id:int}.json", |r| r.get(show).put(update).delete(delete))
//!     .build()?;
//! let mapping = Mapping::new().nest("/api/v1", Mapping::new().mount("/books", books));
//!
//! let dispatcher = Dispatcher::from_config(&RouterConfig::new(RouterKind::HashedRegexp), &mapping)?;
//! match dispatcher.lookup("GET", "/api/v1/books/123.json") {
//!     Lookup::Found { handler, params, .. } => handler(&params),
//!     Lookup::MethodNotAllowed { allowed, .. } => respond_405(allowed.allow_header()),
//!     Lookup::NotFound => respond_404(),
//! }
//! ```
//!
//! Every strategy returns the same answers for the same mapping, so the
//! choice only affects build and lookup cost. See [`routing`] for a
//! comparison.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod config;
mod dispatcher;

pub use config::{RouterConfig, RouterKind};
pub use dispatcher::{AnyRouter, Dispatcher};

pub use keight_core::{
    // Router Traits
    BuildRouter,
    // Dispatch
    Lookup,
    // Registration
    Mapping,
    // Methods
    Method,
    // Error types
    MethodErrorKind,
    MethodTable,
    Methods,
    Mount,
    NaiveDate,
    // Parameters
    ParamType,
    ParamValue,
    // Patterns
    CompiledPattern,
    Resource,
    ResourceBuilder,
    RouteEntry,
    RouteMatch,
    RouteMethods,
    RouteTable,
    Router,
    RouterError,
};

/// Routing strategies.
pub mod routing {
    #![allow(clippy::wildcard_imports)]
    pub use keight_std::routing::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use keight_std::testing::*;
}

/// Prelude module - common imports for keight.
///
/// # Usage
///
/// ```rust,ignore
/// use keight::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BuildRouter, Dispatcher, Lookup, Mapping, ParamValue, Resource, Router, RouterConfig,
        RouterError, RouterKind,
    };
}
