//! Routers backed by a prefix trie serialized into one regex.
//!
//! Every parameterized route is inserted into a trie whose edges are either
//! literal text or a placeholder fragment. Literal edges sharing a first
//! character are split at their common prefix, so `/books/` and `/blog/`
//! become `/b` followed by `ooks/` and `log/`. The trie is then written out
//! as nested alternations with one empty marker group per leaf:
//!
//! ```text
//! ^/b(?:ooks/(?:[0-9]+)($)|log/(?:[^./]+)($))
//! ```

use super::{Alternation, Combined, StaticMap, extract, split_static};
use keight_core::{
    ANY_EXTENSION_FRAGMENT, BuildRouter, RouteEntry, RouteMatch, RouteTable, Router, RouterError,
    Token,
};

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
enum Key {
    Text(String),
    Fragment(&'static str),
}

#[derive(Debug)]
enum Child {
    Branch(Key, NodeId),
    /// Terminal marker for the route at this index.
    Leaf(usize),
}

/// Arena of trie nodes; node `0` is the root.
#[derive(Debug)]
struct Trie {
    nodes: Vec<Vec<Child>>,
}

impl Trie {
    fn new() -> Self {
        Self {
            nodes: vec![Vec::new()],
        }
    }

    fn push(&mut self, children: Vec<Child>) -> NodeId {
        self.nodes.push(children);
        self.nodes.len() - 1
    }

    /// Insert route `index` along the edges of `entry`'s pattern.
    fn insert<F>(
        &mut self,
        entry: &RouteEntry<F>,
        index: usize,
        routes: &[RouteEntry<F>],
    ) -> Result<(), RouterError> {
        let pattern = entry.pattern();
        let mut node = ROOT;
        for token in pattern.tokens() {
            node = match token {
                Token::Literal(text) => self.descend_text(node, text),
                Token::Param { kind, .. } => self.descend_fragment(node, kind.fragment()),
            };
        }
        if pattern.has_any_extension() {
            node = self.descend_fragment(node, ANY_EXTENSION_FRAGMENT);
        }

        let existing = self.nodes[node].iter().find_map(|c| match c {
            Child::Leaf(i) => Some(*i),
            Child::Branch(..) => None,
        });
        if let Some(existing) = existing {
            return Err(RouterError::DuplicateLeaf {
                pattern: pattern.source().to_owned(),
                existing: routes[existing].path().to_owned(),
            });
        }
        self.nodes[node].push(Child::Leaf(index));
        Ok(())
    }

    fn descend_text(&mut self, mut node: NodeId, mut text: &str) -> NodeId {
        'walk: loop {
            for i in 0..self.nodes[node].len() {
                let Child::Branch(Key::Text(key), child) = &self.nodes[node][i] else {
                    continue;
                };
                if key.chars().next() != text.chars().next() {
                    continue;
                }
                let child = *child;
                let n = common_prefix_len(key, text);
                let (prefix, rest1) = key.split_at(n);
                let rest2 = &text[n..];

                if rest1.is_empty() {
                    if rest2.is_empty() {
                        return child;
                    }
                    node = child;
                    text = rest2;
                    continue 'walk;
                }

                let (prefix, rest1) = (prefix.to_owned(), rest1.to_owned());
                let mid = self.push(vec![Child::Branch(Key::Text(rest1), child)]);
                self.nodes[node][i] = Child::Branch(Key::Text(prefix), mid);
                if rest2.is_empty() {
                    return mid;
                }
                let next = self.push(Vec::new());
                self.nodes[mid].push(Child::Branch(Key::Text(rest2.to_owned()), next));
                return next;
            }

            let next = self.push(Vec::new());
            self.nodes[node].push(Child::Branch(Key::Text(text.to_owned()), next));
            return next;
        }
    }

    fn descend_fragment(&mut self, node: NodeId, fragment: &'static str) -> NodeId {
        let found = self.nodes[node].iter().find_map(|c| match c {
            Child::Branch(Key::Fragment(f), child) if *f == fragment => Some(*child),
            _ => None,
        });
        if let Some(child) = found {
            return child;
        }
        let next = self.push(Vec::new());
        self.nodes[node].push(Child::Branch(Key::Fragment(fragment), next));
        next
    }

    /// Write the trie as a regex; `leaves` receives route indices in marker order.
    fn serialize(&self, leaves: &mut Vec<usize>) -> String {
        let mut out = String::from("^");
        self.write(ROOT, &mut out, leaves);
        out
    }

    fn write(&self, node: NodeId, out: &mut String, leaves: &mut Vec<usize>) {
        let children = &self.nodes[node];
        let grouped = children.len() > 1;
        if grouped {
            out.push_str("(?:");
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push('|');
            }
            match child {
                Child::Leaf(route) => {
                    out.push_str("($)");
                    leaves.push(*route);
                }
                Child::Branch(Key::Text(text), next) => {
                    out.push_str(&regex::escape(text));
                    self.write(*next, out, leaves);
                }
                Child::Branch(Key::Fragment(fragment), next) => {
                    out.push_str("(?:");
                    out.push_str(fragment);
                    out.push(')');
                    self.write(*next, out, leaves);
                }
            }
        }
        if grouped {
            out.push(')');
        }
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i)
}

type Compiled<F> = (StaticMap<F>, Vec<RouteEntry<F>>, Option<Alternation>);

/// Build the trie for parameterized `entries`, returning them in marker order.
fn compile<F>(entries: Vec<RouteEntry<F>>) -> Result<Compiled<F>, RouterError> {
    let (fixed, dynamic) = split_static(entries);
    if dynamic.is_empty() {
        return Ok((fixed, dynamic, None));
    }

    let mut trie = Trie::new();
    for (index, entry) in dynamic.iter().enumerate() {
        trie.insert(entry, index, &dynamic)?;
    }

    let mut leaves = Vec::with_capacity(dynamic.len());
    let expr = trie.serialize(&mut leaves);
    let alternation = Alternation::markers_only(&expr, leaves.len())?;

    let mut slots: Vec<Option<RouteEntry<F>>> = dynamic.into_iter().map(Some).collect();
    let routes = leaves
        .iter()
        .filter_map(|&i| slots[i].take())
        .collect();
    Ok((fixed, routes, Some(alternation)))
}

// ============================================================================
// Optimized
// ============================================================================

/// One regex serialized from a prefix trie over all parameterized routes.
///
/// Two patterns reaching the same trie leaf are rejected with
/// [`RouterError::DuplicateLeaf`].
pub struct OptimizedRegexpRouter<F> {
    inner: Combined<F>,
}

impl<F> OptimizedRegexpRouter<F> {
    /// The serialized trie, if any route has placeholders.
    pub fn expression(&self) -> Option<&str> {
        self.inner.expression()
    }
}

impl<F: Send + Sync> Router<F> for OptimizedRegexpRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        self.inner.find(path)
    }
}

impl<F: Send + Sync> BuildRouter<F> for OptimizedRegexpRouter<F> {
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        let (fixed, routes, alternation) = compile(table.into_entries())?;
        let inner = Combined {
            fixed,
            routes,
            alternation,
        };
        #[cfg(feature = "tracing")]
        inner.log("optimized regexp");
        Ok(Self { inner })
    }
}

// ============================================================================
// Sliced
// ============================================================================

/// Byte offsets of the only parameter, counted from both ends of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParamSlice {
    start: usize,
    end_trim: usize,
}

impl ParamSlice {
    /// Routes with exactly one placeholder and no `.*` have fixed offsets.
    fn of<F>(entry: &RouteEntry<F>) -> Option<Self> {
        let pattern = entry.pattern();
        if pattern.param_names().len() != 1 || pattern.has_any_extension() {
            return None;
        }
        Some(Self {
            start: pattern.literal_prefix().len(),
            end_trim: pattern.literal_suffix().len(),
        })
    }

    fn apply<'p>(&self, path: &'p str) -> Option<&'p str> {
        let end = path.len().checked_sub(self.end_trim)?;
        path.get(self.start..end)
    }
}

/// [`OptimizedRegexpRouter`] that skips the second match for routes with
/// a single placeholder, slicing the value straight out of the path.
pub struct SlicedRegexpRouter<F> {
    inner: Combined<F>,
    slices: Vec<Option<ParamSlice>>,
}

impl<F> SlicedRegexpRouter<F> {
    /// The serialized trie, if any route has placeholders.
    pub fn expression(&self) -> Option<&str> {
        self.inner.expression()
    }

    /// Build from flattened entries.
    pub(crate) fn from_entries(entries: Vec<RouteEntry<F>>) -> Result<Self, RouterError> {
        let (fixed, routes, alternation) = compile(entries)?;
        let slices = routes.iter().map(ParamSlice::of).collect();
        Ok(Self {
            inner: Combined {
                fixed,
                routes,
                alternation,
            },
            slices,
        })
    }
}

impl<F: Send + Sync> Router<F> for SlicedRegexpRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        let inner = &self.inner;
        if let Some(found) = inner.fixed.find(path) {
            return Some(found);
        }
        let index = inner.alternation.as_ref()?.winner(path)?;
        let entry = &inner.routes[index];
        match self.slices[index] {
            Some(slice) => {
                let kind = entry.pattern().param_types()[0];
                let value = kind.convert(slice.apply(path)?)?;
                Some(RouteMatch::new(entry, vec![value]))
            }
            None => extract(entry, path),
        }
    }
}

impl<F: Send + Sync> BuildRouter<F> for SlicedRegexpRouter<F> {
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        let router = Self::from_entries(table.into_entries())?;
        #[cfg(feature = "tracing")]
        {
            router.inner.log("sliced regexp");
            tracing::debug!(
                sliced = router.slices.iter().filter(|s| s.is_some()).count(),
                "precomputed parameter slices"
            );
        }
        Ok(router)
    }
}
