//! # Routing Strategies
//!
//! Nine interchangeable implementations of [`Router`]. All of them agree
//! on which route wins and which parameters it yields; they differ in what
//! they build up front.
//!
//! # Choosing a Router
//!
//! | Router | Structure | Lookup cost |
//! |--------|-----------|-------------|
//! | [`NaiveLinearRouter`] | route list | one regex per route |
//! | [`PrefixLinearRouter`] | route list + literal prefixes | one prefix check per route |
//! | [`FixedLinearRouter`] | exact map + prefix list | O(1) for literal paths |
//! | [`NaiveRegexpRouter`] | exact map + one alternation, named groups | one match + group scan |
//! | [`SmartRegexpRouter`] | exact map + one alternation, marker groups | one match + marker scan |
//! | [`NestedRegexpRouter`] | exact map + alternation factored by mount groups | as above, smaller regex |
//! | [`OptimizedRegexpRouter`] | exact map + regex serialized from a prefix trie | as above, least backtracking |
//! | [`SlicedRegexpRouter`] | optimized + precomputed parameter slices | skips the second match |
//! | [`HashedRegexpRouter`] | exact map + sliced routers bucketed by prefix | small regex per bucket |
//! | [`StateMachineRouter`] | segment transition table | one step per segment |
//!
//! Only the two linear scans honor registration order between a literal
//! path and an overlapping placeholder pattern; every router with an exact
//! map lets the literal path win.
//!
//! [`Router`]: keight_core::Router

mod hashed;
mod linear;
mod optimized;
mod regexp;
mod state_machine;

pub use hashed::{DEFAULT_PREFIX_TARGET, HashedRegexpRouter};
pub use linear::{FixedLinearRouter, NaiveLinearRouter, PrefixLinearRouter};
pub use optimized::{OptimizedRegexpRouter, SlicedRegexpRouter};
pub use regexp::{NaiveRegexpRouter, NestedRegexpRouter, SmartRegexpRouter};
pub use state_machine::StateMachineRouter;

use keight_core::{RouteEntry, RouteMatch, RouterError};
use regex::Regex;
use std::collections::HashMap;

// ============================================================================
// Exact-match map
// ============================================================================

/// Placeholder-free routes keyed by their path.
pub(crate) struct StaticMap<F> {
    map: HashMap<String, RouteEntry<F>>,
}

impl<F> StaticMap<F> {
    pub(crate) fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Route table building already rejected duplicated static paths.
    pub(crate) fn insert(&mut self, entry: RouteEntry<F>) {
        self.map.insert(entry.path().to_owned(), entry);
    }

    pub(crate) fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        self.map.get(path).map(|entry| RouteMatch::new(entry, Vec::new()))
    }

    #[cfg(feature = "tracing")]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}

/// Split entries into the exact map and the parameterized rest, keeping
/// registration order for the latter.
pub(crate) fn split_static<F>(
    entries: Vec<RouteEntry<F>>,
) -> (StaticMap<F>, Vec<RouteEntry<F>>) {
    let mut fixed = StaticMap::new();
    let mut dynamic = Vec::new();
    for entry in entries {
        if entry.pattern().is_static() {
            fixed.insert(entry);
        } else {
            dynamic.push(entry);
        }
    }
    (fixed, dynamic)
}

/// Run `entry`'s own matcher and convert its parameters.
pub(crate) fn extract<'a, F>(entry: &'a RouteEntry<F>, path: &str) -> Option<RouteMatch<'a, F>> {
    entry
        .pattern()
        .extract(path)
        .map(|params| RouteMatch::new(entry, params))
}

// ============================================================================
// Combined expressions
// ============================================================================

/// A combined regex whose alternatives are told apart by marker groups.
///
/// Exactly one marker participates in a successful match. Marker group
/// indices are fixed when the expression is built.
#[derive(Debug, Clone)]
pub(crate) struct Alternation {
    regex: Regex,
    markers: Vec<usize>,
}

impl Alternation {
    /// Compile `expr` whose capture groups `1..=n` are all markers.
    pub(crate) fn markers_only(expr: &str, n: usize) -> Result<Self, RouterError> {
        Ok(Self::with_markers(Regex::new(expr)?, (1..=n).collect()))
    }

    /// Use explicit group indices as markers.
    pub(crate) fn with_markers(regex: Regex, markers: Vec<usize>) -> Self {
        debug_assert!(markers.iter().all(|&g| g < regex.captures_len()));
        Self { regex, markers }
    }

    /// Index of the alternative that matched `path`.
    pub(crate) fn winner(&self, path: &str) -> Option<usize> {
        let mut locs = self.regex.capture_locations();
        self.regex.captures_read(&mut locs, path)?;
        self.markers.iter().position(|&g| locs.get(g).is_some())
    }

    pub(crate) fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Exact map plus a marker-tagged alternation over the remaining routes.
pub(crate) struct Combined<F> {
    pub(crate) fixed: StaticMap<F>,
    pub(crate) routes: Vec<RouteEntry<F>>,
    pub(crate) alternation: Option<Alternation>,
}

impl<F> Combined<F> {
    pub(crate) fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        if let Some(found) = self.fixed.find(path) {
            return Some(found);
        }
        let index = self.alternation.as_ref()?.winner(path)?;
        extract(&self.routes[index], path)
    }

    pub(crate) fn expression(&self) -> Option<&str> {
        self.alternation.as_ref().map(Alternation::as_str)
    }

    #[cfg(feature = "tracing")]
    pub(crate) fn log(&self, name: &str) {
        tracing::info!(
            fixed = self.fixed.len(),
            dynamic = self.routes.len(),
            regex_len = self.expression().map_or(0, str::len),
            "built {name} router"
        );
    }
}
