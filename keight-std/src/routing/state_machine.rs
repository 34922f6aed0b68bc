//! Segment transition table router.
//!
//! Patterns are split on `/` and each segment becomes one transition:
//! either a literal segment or one of the placeholder kinds `int`, `date`
//! and `str`. The last segment's extension (from its last `.`) is split
//! off and checked at the final state.
//!
//! A lookup never backtracks. At each state the literal transition is
//! taken if present, otherwise the first placeholder kind whose converter
//! accepts the segment. So here a segment is claimed by type precedence,
//! not by registration order.

use super::{StaticMap, split_static};
use keight_core::{
    ANY_EXTENSION, BuildRouter, ParamType, ParamValue, RouteEntry, RouteMatch, RouteTable, Router,
    RouterError, is_digits, parse_date, parse_placeholder,
};
use std::collections::{HashMap, HashSet};

type StateId = usize;

const START: StateId = 0;

/// Placeholder kinds in the order they are tried.
const SEGMENT_TYPES: [(&str, fn(&str) -> Option<ParamValue>); 3] = [
    ("int", segment_int),
    ("date", segment_date),
    ("str", segment_str),
];

fn segment_int(segment: &str) -> Option<ParamValue> {
    if !is_digits(segment) {
        return None;
    }
    segment.parse().ok().map(ParamValue::Int)
}

fn segment_date(segment: &str) -> Option<ParamValue> {
    let lengths: Vec<usize> = segment.split('-').map(str::len).collect();
    if lengths != [4, 2, 2] {
        return None;
    }
    parse_date(segment).map(ParamValue::Date)
}

fn segment_str(segment: &str) -> Option<ParamValue> {
    if segment.is_empty() || segment.contains('.') {
        return None;
    }
    Some(ParamValue::Str(segment.to_owned()))
}

/// What a final state expects after the last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Suffix {
    /// No extension.
    Absent,
    /// Exactly this extension, dot included.
    Exact(String),
    /// Any single extension, or none.
    Any,
}

impl Suffix {
    fn accepts(&self, actual: Option<&str>) -> bool {
        match (self, actual) {
            (Suffix::Absent, None) => true,
            (Suffix::Exact(expected), Some(actual)) => expected == actual,
            (Suffix::Any, None) => true,
            (Suffix::Any, Some(actual)) => is_extension(actual),
            _ => false,
        }
    }
}

/// `.` followed by one or more word characters.
fn is_extension(suffix: &str) -> bool {
    suffix
        .strip_prefix('.')
        .is_some_and(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_alphanumeric() || c == '_'))
}

#[derive(Debug)]
struct Leaf {
    suffix: Suffix,
    route: usize,
}

#[derive(Debug, Default)]
struct State {
    literals: HashMap<String, StateId>,
    params: [Option<StateId>; 3],
    leaves: Vec<Leaf>,
}

/// Split a path into segments and the last segment's extension.
fn split(path: &str) -> Option<(Vec<&str>, Option<&str>)> {
    let body = path.strip_prefix('/')?;
    let mut segments: Vec<&str> = body.split('/').collect();
    let mut suffix = None;
    if let Some(last) = segments.pop() {
        match last.rfind('.') {
            Some(pos) => {
                suffix = Some(&last[pos..]);
                segments.push(&last[..pos]);
            }
            None => segments.push(last),
        }
    }
    Some((segments, suffix))
}

/// Walks the request path segment by segment.
pub struct StateMachineRouter<F> {
    fixed: StaticMap<F>,
    routes: Vec<RouteEntry<F>>,
    states: Vec<State>,
}

impl<F> StateMachineRouter<F> {
    fn new(fixed: StaticMap<F>) -> Self {
        Self {
            fixed,
            routes: Vec::new(),
            states: vec![State::default()],
        }
    }

    fn push_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    fn register(&mut self, entry: RouteEntry<F>) -> Result<(), RouterError> {
        let source = entry.path();
        let unsupported = |reason| RouterError::UnsupportedPattern {
            pattern: source.to_owned(),
            reason,
        };

        let (segments, suffix) = match source.strip_suffix(ANY_EXTENSION) {
            Some(body) => {
                let body = body
                    .strip_prefix('/')
                    .ok_or_else(|| unsupported("pattern must start with '/'"))?;
                (body.split('/').collect::<Vec<_>>(), Suffix::Any)
            }
            None => {
                let (segments, suffix) =
                    split(source).ok_or_else(|| unsupported("pattern must start with '/'"))?;
                let suffix = suffix.map_or(Suffix::Absent, |s| Suffix::Exact(s.to_owned()));
                (segments, suffix)
            }
        };

        let mut names = HashSet::new();
        let mut state = START;
        for segment in segments {
            let next = match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(body) => {
                    let (name, type_name) = parse_placeholder(source, body)?;
                    let kind = match SEGMENT_TYPES.iter().position(|(t, _)| *t == type_name) {
                        Some(kind) => kind,
                        None if ParamType::lookup(type_name).is_some() => {
                            return Err(unsupported("param type cannot match a single segment"));
                        }
                        None => {
                            return Err(RouterError::UnknownParamType {
                                pattern: source.to_owned(),
                                type_name: type_name.to_owned(),
                            });
                        }
                    };
                    if !names.insert(name) {
                        return Err(RouterError::DuplicateParam {
                            pattern: source.to_owned(),
                            name: name.to_owned(),
                        });
                    }
                    match self.states[state].params[kind] {
                        Some(next) => next,
                        None => {
                            let next = self.push_state();
                            self.states[state].params[kind] = Some(next);
                            next
                        }
                    }
                }
                None if segment.contains('{') => {
                    return Err(unsupported("placeholder must span a whole path segment"));
                }
                None => match self.states[state].literals.get(segment) {
                    Some(&next) => next,
                    None => {
                        let next = self.push_state();
                        self.states[state].literals.insert(segment.to_owned(), next);
                        next
                    }
                },
            };
            state = next;
        }

        if let Some(leaf) = self.states[state].leaves.iter().find(|l| l.suffix == suffix) {
            return Err(RouterError::DuplicateLeaf {
                pattern: source.to_owned(),
                existing: self.routes[leaf.route].path().to_owned(),
            });
        }

        let route = self.routes.len();
        self.states[state].leaves.push(Leaf { suffix, route });
        self.routes.push(entry);
        Ok(())
    }
}

impl<F: Send + Sync> Router<F> for StateMachineRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        if let Some(found) = self.fixed.find(path) {
            return Some(found);
        }

        let (segments, suffix) = split(path)?;
        let mut params = Vec::new();
        let mut state = &self.states[START];

        for segment in segments {
            let next = match state.literals.get(segment) {
                Some(&next) => next,
                None => SEGMENT_TYPES.iter().zip(state.params).find_map(|((_, convert), next)| {
                    let next = next?;
                    let value = convert(segment)?;
                    params.push(value);
                    Some(next)
                })?,
            };
            state = &self.states[next];
        }

        // Exact expectations before the wildcard.
        let leaf = state
            .leaves
            .iter()
            .filter(|l| l.suffix != Suffix::Any)
            .chain(state.leaves.iter().filter(|l| l.suffix == Suffix::Any))
            .find(|l| l.suffix.accepts(suffix))?;

        Some(RouteMatch::new(&self.routes[leaf.route], params))
    }
}

impl<F: Send + Sync> BuildRouter<F> for StateMachineRouter<F> {
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        let (fixed, dynamic) = split_static(table.into_entries());
        let mut router = Self::new(fixed);
        for entry in dynamic {
            router.register(entry)?;
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            fixed = router.fixed.len(),
            dynamic = router.routes.len(),
            states = router.states.len(),
            "built state machine router"
        );

        Ok(router)
    }
}
