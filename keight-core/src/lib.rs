//! # keight-core
//!
//! Core vocabulary for the keight path dispatch engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! router implementations that don't need the full `keight-std` set.
//!
//! # Pipeline
//!
//! Registration data flows one way:
//!
//! 1. [`Resource`]s are built with [`Resource::builder`], which validates
//!    request method names.
//! 2. Resources are mounted into a nested [`Mapping`].
//! 3. The mapping is flattened into a [`RouteTable`], compiling every full
//!    path with [`CompiledPattern`] and rejecting duplicated literal paths.
//! 4. A strategy implementing [`BuildRouter`] turns the table into an
//!    immutable [`Router`].
//! 5. [`Router::lookup`] resolves `(method, path)` to a [`Lookup`].
//!
//! # Placeholders
//!
//! | Syntax | Matches |
//! |--------|---------|
//! | `{name}` | `str`: any run without `.` or `/` |
//! | `{name:int}` | digits, converted to `i64` |
//! | `{name:date}` | `YYYY-MM-DD`, converted to a calendar date |
//! | `{name:path}` | anything, including `/` |
//! | trailing `.*` | an optional extension such as `.json` |
//!
//! # Error Types
//!
//! - [`RouterError`] - Build-time error
//! - [`MethodErrorKind`] - Reason a registered method name was rejected

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dispatch;
mod error;
mod mapping;
mod method;
mod param;
mod pattern;
mod resource;
mod router;

// Re-exports
pub use chrono::NaiveDate;
pub use dispatch::{Lookup, resolve};
pub use error::{MethodErrorKind, RouterError};
pub use mapping::{Mapping, Mount, RouteEntry, RouteTable};
pub use method::{Method, MethodTable, Methods};
pub use param::{DEFAULT_PARAM_TYPE, PARAM_TYPES, ParamType, ParamValue, is_digits, parse_date};
pub use pattern::{
    ANY_EXTENSION, ANY_EXTENSION_FRAGMENT, CompiledPattern, Token, parse_placeholder,
};
pub use resource::{Resource, ResourceBuilder, ResourceRoute, RouteMethods};
pub use router::{BuildRouter, RouteMatch, Router};
