//! Strategy selection.
//!
//! A router strategy is chosen once, at startup, by name or by value, and
//! built from the registration tree through [`RouterConfig::build`].

use crate::dispatcher::AnyRouter;
use keight_core::{BuildRouter, Mapping, RouterError};
use keight_std::routing::{
    DEFAULT_PREFIX_TARGET, FixedLinearRouter, HashedRegexpRouter, NaiveLinearRouter,
    NaiveRegexpRouter, NestedRegexpRouter, OptimizedRegexpRouter, PrefixLinearRouter,
    SlicedRegexpRouter, SmartRegexpRouter, StateMachineRouter,
};
use regex::Regex;
use std::{fmt, str::FromStr};

/// The routing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RouterKind {
    /// Registration-order scan, one anchored regex per route.
    #[default]
    NaiveLinear,
    /// Registration-order scan skipping routes by literal prefix.
    PrefixLinear,
    /// Exact map, then a prefix-filtered scan.
    FixedLinear,
    /// One alternation of named groups.
    NaiveRegexp,
    /// One alternation of marker groups.
    SmartRegexp,
    /// Alternation factored along mount groups.
    NestedRegexp,
    /// Alternation serialized from a prefix trie.
    OptimizedRegexp,
    /// Trie alternation with precomputed parameter slices.
    SlicedRegexp,
    /// Sliced routers bucketed by a fixed-length prefix.
    HashedRegexp,
    /// Segment-by-segment automaton.
    StateMachine,
}

impl RouterKind {
    /// Every strategy, in declaration order.
    pub const ALL: [RouterKind; 10] = [
        RouterKind::NaiveLinear,
        RouterKind::PrefixLinear,
        RouterKind::FixedLinear,
        RouterKind::NaiveRegexp,
        RouterKind::SmartRegexp,
        RouterKind::NestedRegexp,
        RouterKind::OptimizedRegexp,
        RouterKind::SlicedRegexp,
        RouterKind::HashedRegexp,
        RouterKind::StateMachine,
    ];

    /// Configuration name, in kebab case.
    pub fn as_str(self) -> &'static str {
        match self {
            RouterKind::NaiveLinear => "naive-linear",
            RouterKind::PrefixLinear => "prefix-linear",
            RouterKind::FixedLinear => "fixed-linear",
            RouterKind::NaiveRegexp => "naive-regexp",
            RouterKind::SmartRegexp => "smart-regexp",
            RouterKind::NestedRegexp => "nested-regexp",
            RouterKind::OptimizedRegexp => "optimized-regexp",
            RouterKind::SlicedRegexp => "sliced-regexp",
            RouterKind::HashedRegexp => "hashed-regexp",
            RouterKind::StateMachine => "state-machine",
        }
    }
}

impl fmt::Display for RouterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouterKind {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RouterError::UnknownRouterKind(s.to_owned()))
    }
}

/// Router construction settings.
///
/// # Example
///
/// ```rust,ignore
/// let router = RouterConfig::new(RouterKind::HashedRegexp)
///     .prefix_target(Some(r"^/api/"))
///     .build(&mapping)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    kind: RouterKind,
    prefix_target: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new(RouterKind::default())
    }
}

impl RouterConfig {
    /// Settings for the given strategy.
    pub fn new(kind: RouterKind) -> Self {
        Self {
            kind,
            prefix_target: Some(DEFAULT_PREFIX_TARGET.to_owned()),
        }
    }

    /// Select the strategy.
    pub fn kind(mut self, kind: RouterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Expression choosing which patterns decide the hashed bucket prefix
    /// length. `None` lets every pattern take part.
    ///
    /// Ignored by the other strategies.
    pub fn prefix_target(mut self, target: Option<&str>) -> Self {
        self.prefix_target = target.map(str::to_owned);
        self
    }

    /// The selected strategy.
    pub fn router_kind(&self) -> RouterKind {
        self.kind
    }

    /// Build the selected strategy from a registration tree.
    pub fn build<F: Send + Sync>(&self, mapping: &Mapping<F>) -> Result<AnyRouter<F>, RouterError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %self.kind, "building router");

        let router = match self.kind {
            RouterKind::NaiveLinear => AnyRouter::NaiveLinear(NaiveLinearRouter::from_mapping(mapping)?),
            RouterKind::PrefixLinear => {
                AnyRouter::PrefixLinear(PrefixLinearRouter::from_mapping(mapping)?)
            }
            RouterKind::FixedLinear => AnyRouter::FixedLinear(FixedLinearRouter::from_mapping(mapping)?),
            RouterKind::NaiveRegexp => AnyRouter::NaiveRegexp(NaiveRegexpRouter::from_mapping(mapping)?),
            RouterKind::SmartRegexp => AnyRouter::SmartRegexp(SmartRegexpRouter::from_mapping(mapping)?),
            RouterKind::NestedRegexp => {
                AnyRouter::NestedRegexp(NestedRegexpRouter::from_mapping(mapping)?)
            }
            RouterKind::OptimizedRegexp => {
                AnyRouter::OptimizedRegexp(OptimizedRegexpRouter::from_mapping(mapping)?)
            }
            RouterKind::SlicedRegexp => {
                AnyRouter::SlicedRegexp(SlicedRegexpRouter::from_mapping(mapping)?)
            }
            RouterKind::HashedRegexp => {
                let target = self
                    .prefix_target
                    .as_deref()
                    .map(Regex::new)
                    .transpose()
                    .map_err(|source| RouterError::InvalidPrefixTarget { source })?;
                AnyRouter::HashedRegexp(HashedRegexpRouter::with_prefix_target(
                    mapping.flatten()?,
                    target.as_ref(),
                )?)
            }
            RouterKind::StateMachine => {
                AnyRouter::StateMachine(StateMachineRouter::from_mapping(mapping)?)
            }
        };
        Ok(router)
    }
}

impl From<RouterKind> for RouterConfig {
    fn from(kind: RouterKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in RouterKind::ALL {
            assert_eq!(kind.to_string().parse::<RouterKind>().unwrap(), kind);
        }
        assert_eq!("state-machine".parse::<RouterKind>().unwrap(), RouterKind::StateMachine);
    }

    #[test]
    fn test_unknown_kind() {
        let err = "fastest".parse::<RouterKind>().unwrap_err();
        assert!(matches!(err, RouterError::UnknownRouterKind(ref name) if name == "fastest"));
    }

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.router_kind(), RouterKind::NaiveLinear);
        assert_eq!(config.prefix_target.as_deref(), Some(DEFAULT_PREFIX_TARGET));
    }

    #[test]
    fn test_invalid_prefix_target() {
        let mapping: Mapping<&'static str> = Mapping::new();
        let result = RouterConfig::new(RouterKind::HashedRegexp)
            .prefix_target(Some("("))
            .build(&mapping);
        assert!(matches!(result, Err(RouterError::InvalidPrefixTarget { .. })));

        // Other strategies ignore the target.
        assert!(
            RouterConfig::new(RouterKind::SmartRegexp)
                .prefix_target(Some("("))
                .build(&mapping)
                .is_ok()
        );
    }
}
