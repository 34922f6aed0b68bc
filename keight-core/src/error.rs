//! Error types for keight.
//!
//! Every failure described here happens while a router is being built.
//! Looking up a request path never fails: "no route" and "method not
//! allowed" are ordinary [`Lookup`](crate::Lookup) values.
//!
//! - [`RouterError`] - Top-level build error for patterns, resources and strategies
//! - [`MethodErrorKind`] - Why a registered request method was rejected

use thiserror::Error;

/// Why a request method name was rejected while building a resource.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodErrorKind {
    /// The method name was not written in upper case.
    #[error("request method should be upper case")]
    NotUppercase,

    /// `HEAD` is served by the `GET` handler and cannot be registered.
    #[error("use 'GET' instead of 'HEAD'")]
    Head,

    /// Not one of the known HTTP methods or `ANY`.
    #[error("unknown request method")]
    Unknown,

    /// The same method was registered twice for one route.
    #[error("duplicated request method")]
    Duplicated,
}

/// Errors raised while compiling patterns or constructing a router.
#[derive(Error, Debug)]
pub enum RouterError {
    /// A `{...}` placeholder body is not `name` or `name:type`.
    #[error("{pattern}: invalid placeholder '{{{placeholder}}}' (expected '{{name}}' or '{{name:type}}')")]
    InvalidPlaceholder {
        /// The offending path pattern.
        pattern: String,
        /// The text between the braces.
        placeholder: String,
    },

    /// The placeholder names a parameter type that does not exist.
    #[error("{pattern}: unknown param type '{type_name}'")]
    UnknownParamType {
        /// The offending path pattern.
        pattern: String,
        /// The unknown type name.
        type_name: String,
    },

    /// The same parameter name appears twice in one pattern.
    #[error("{pattern}: parameter name '{name}' duplicated")]
    DuplicateParam {
        /// The offending path pattern.
        pattern: String,
        /// The duplicated parameter name.
        name: String,
    },

    /// The pattern uses a form the selected strategy cannot express.
    #[error("{pattern}: {reason}")]
    UnsupportedPattern {
        /// The offending path pattern.
        pattern: String,
        /// What the strategy cannot handle.
        reason: &'static str,
    },

    /// Two resources registered the same placeholder-free path.
    #[error("{path}: duplicated path in {first} and {second}")]
    DuplicatePath {
        /// The duplicated path.
        path: String,
        /// Resource that registered the path first.
        first: String,
        /// Resource that registered the path again.
        second: String,
    },

    /// Two parameterized patterns compile to the same trie leaf.
    #[error("{pattern}: ambiguous route, collides with '{existing}'")]
    DuplicateLeaf {
        /// The pattern that was being inserted.
        pattern: String,
        /// The pattern already occupying the leaf.
        existing: String,
    },

    /// A resource has no routes, or a route with no handler functions.
    #[error("{resource}: no handler funcs defined")]
    NoHandlerFuncs {
        /// Name of the resource.
        resource: String,
    },

    /// A request method registered on a resource is not acceptable.
    #[error("{resource}: on('{method}'): {reason}")]
    InvalidMethod {
        /// Name of the resource.
        resource: String,
        /// The method name as written at registration.
        method: String,
        /// Why it was rejected.
        reason: MethodErrorKind,
    },

    /// The expression selecting hashed bucket prefixes does not compile.
    #[error("invalid prefix target expression")]
    InvalidPrefixTarget {
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A strategy name in configuration is not recognized.
    #[error("unknown router kind '{0}'")]
    UnknownRouterKind(String),

    /// A combined route expression failed to compile.
    #[error("failed to compile route expression: {0}")]
    Regex(#[from] regex::Error),
}
