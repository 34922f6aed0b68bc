//! Routers matching one combined regular expression.
//!
//! Parameterized routes are merged into a single alternation. A successful
//! match only tells which alternative won; the winner's own matcher then
//! runs again to extract and convert its parameters.

use super::{Alternation, Combined, split_static};
use keight_core::{
    BuildRouter, CompiledPattern, Mapping, Mount, RouteMatch, RouteTable, Router, RouterError,
};
use regex::Regex;

// ============================================================================
// Naive
// ============================================================================

/// One alternation whose alternatives are whole patterns in named groups.
///
/// The winner is found by scanning the named groups for the one that
/// participated in the match.
pub struct NaiveRegexpRouter<F> {
    inner: Combined<F>,
}

impl<F> NaiveRegexpRouter<F> {
    /// The combined expression, if any route has placeholders.
    pub fn expression(&self) -> Option<&str> {
        self.inner.expression()
    }
}

impl<F: Send + Sync> Router<F> for NaiveRegexpRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        self.inner.find(path)
    }
}

impl<F: Send + Sync> BuildRouter<F> for NaiveRegexpRouter<F> {
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        let (fixed, routes) = split_static(table.into_entries());

        let alternation = if routes.is_empty() {
            None
        } else {
            let expr = routes
                .iter()
                .enumerate()
                .map(|(i, e)| format!("(?P<_{i}>{})", e.pattern().regex().as_str()))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&expr)?;

            let mut markers = vec![0; routes.len()];
            for (group, name) in regex.capture_names().enumerate() {
                let index = name
                    .and_then(|n| n.strip_prefix('_'))
                    .and_then(|n| n.parse::<usize>().ok());
                if let Some(i) = index {
                    markers[i] = group;
                }
            }
            Some(Alternation::with_markers(regex, markers))
        };

        let inner = Combined {
            fixed,
            routes,
            alternation,
        };
        #[cfg(feature = "tracing")]
        inner.log("naive regexp");
        Ok(Self { inner })
    }
}

// ============================================================================
// Smart
// ============================================================================

/// One alternation where each alternative ends in an empty marker group.
///
/// Placeholders are non-capturing, so marker `i` is capture group `i + 1`.
pub struct SmartRegexpRouter<F> {
    inner: Combined<F>,
}

impl<F> SmartRegexpRouter<F> {
    /// The combined expression, if any route has placeholders.
    pub fn expression(&self) -> Option<&str> {
        self.inner.expression()
    }
}

impl<F: Send + Sync> Router<F> for SmartRegexpRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        self.inner.find(path)
    }
}

impl<F: Send + Sync> BuildRouter<F> for SmartRegexpRouter<F> {
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        let (fixed, routes) = split_static(table.into_entries());
        let alternatives: Vec<String> = routes
            .iter()
            .map(|e| format!("^{}($)", e.pattern().expression(false)))
            .collect();
        let alternation = marked(&alternatives.join("|"), routes.len())?;

        let inner = Combined {
            fixed,
            routes,
            alternation,
        };
        #[cfg(feature = "tracing")]
        inner.log("smart regexp");
        Ok(Self { inner })
    }
}

fn marked(expr: &str, n: usize) -> Result<Option<Alternation>, RouterError> {
    if n == 0 {
        return Ok(None);
    }
    Alternation::markers_only(expr, n).map(Some)
}

// ============================================================================
// Nested
// ============================================================================

/// Like [`SmartRegexpRouter`], but the mount path of every group and
/// resource is written once in front of its routes' alternatives.
///
/// Factoring follows the registration tree, so it only pays off where
/// routes were declared under a common group.
pub struct NestedRegexpRouter<F> {
    inner: Combined<F>,
}

impl<F: Send + Sync> Router<F> for NestedRegexpRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        self.inner.find(path)
    }
}

impl<F: Send + Sync> NestedRegexpRouter<F> {
    /// The combined expression, if any route has placeholders.
    pub fn expression(&self) -> Option<&str> {
        self.inner.expression()
    }

    fn build(table: RouteTable<F>, alternatives: Vec<String>) -> Result<Self, RouterError> {
        let (fixed, routes) = split_static(table.into_entries());
        debug_assert_eq!(count_markers(&alternatives), routes.len());

        let expr = format!("^(?:{})", alternatives.join("|"));
        let alternation = marked(&expr, routes.len())?;

        let inner = Combined {
            fixed,
            routes,
            alternation,
        };
        #[cfg(feature = "tracing")]
        inner.log("nested regexp");
        Ok(Self { inner })
    }
}

impl<F: Send + Sync> BuildRouter<F> for NestedRegexpRouter<F> {
    /// Without the registration tree every route is its own group.
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        let alternatives = flat(&table);
        Self::build(table, alternatives)
    }

    fn from_mapping(mapping: &Mapping<F>) -> Result<Self, RouterError> {
        let table = mapping.flatten()?;
        let mut alternatives = Vec::new();
        if !factor(mapping, "", "", &mut alternatives)? {
            #[cfg(feature = "tracing")]
            tracing::debug!("mount paths do not factor, building flat alternatives");
            alternatives = flat(&table);
        }
        Self::build(table, alternatives)
    }
}

fn flat<F>(table: &RouteTable<F>) -> Vec<String> {
    table
        .entries()
        .iter()
        .filter(|e| !e.pattern().is_static())
        .map(|e| format!("{}($)", e.pattern().expression(false)))
        .collect()
}

/// Collect one alternative per mapping entry that has parameterized routes.
///
/// A resource contributes `base(?:suffix1($)|suffix2($))`, a group
/// contributes `base(?:...)` over its own entries.
///
/// Returns `false` when some mount path and route suffix do not compile to
/// the full route pattern on their own, as with a brace opened in a mount
/// path and closed in a route path. `out` is then incomplete.
fn factor<F>(
    mapping: &Mapping<F>,
    root: &str,
    root_expr: &str,
    out: &mut Vec<String>,
) -> Result<bool, RouterError> {
    for (base, mount) in mapping.entries() {
        let prefix = format!("{root}{base}");
        let Ok(base) = CompiledPattern::compile(base) else {
            return Ok(false);
        };
        let base = base.expression(false);
        let prefix_expr = format!("{root_expr}{base}");
        let mut alternatives = Vec::new();

        match mount {
            Mount::Group(group) => {
                if !factor(group, &prefix, &prefix_expr, &mut alternatives)? {
                    return Ok(false);
                }
            }
            Mount::Resource(resource) => {
                for route in resource.routes() {
                    let full = CompiledPattern::compile(&format!("{prefix}{}", route.path()))?;
                    if full.is_static() {
                        continue;
                    }
                    let Ok(suffix) = CompiledPattern::compile(route.path()) else {
                        return Ok(false);
                    };
                    let suffix = suffix.expression(false);
                    if format!("{prefix_expr}{suffix}") != full.expression(false) {
                        return Ok(false);
                    }
                    alternatives.push(format!("{suffix}($)"));
                }
            }
        }

        match alternatives.as_slice() {
            [] => {}
            [single] => out.push(format!("{base}{single}")),
            _ => out.push(format!("{base}(?:{})", alternatives.join("|"))),
        }
    }
    Ok(true)
}

fn count_markers(alternatives: &[String]) -> usize {
    alternatives.iter().map(|a| a.matches("($)").count()).sum()
}
