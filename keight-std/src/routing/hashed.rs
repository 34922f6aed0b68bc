//! Prefix-bucketed router.

use super::{StaticMap, optimized::SlicedRegexpRouter, split_static};
use keight_core::{BuildRouter, RouteEntry, RouteMatch, RouteTable, Router, RouterError};
use regex::Regex;
use std::collections::HashMap;

/// Patterns matching this expression decide the bucket prefix length.
pub const DEFAULT_PREFIX_TARGET: &str = r"^/\w";

/// Splits parameterized routes into small [`SlicedRegexpRouter`]s keyed by
/// a fixed-length literal prefix.
///
/// The prefix length is the shortest literal prefix among patterns matching
/// the prefix target. Routes whose literal prefix is shorter than that go to
/// the catch-all bucket `""`, which is consulted when the path's own bucket
/// is missing or misses.
pub struct HashedRegexpRouter<F> {
    fixed: StaticMap<F>,
    prefix_len: usize,
    buckets: HashMap<String, SlicedRegexpRouter<F>>,
}

impl<F> HashedRegexpRouter<F> {
    /// Build with a custom prefix target.
    ///
    /// With `None`, every pattern takes part in choosing the prefix length.
    pub fn with_prefix_target(
        table: RouteTable<F>,
        target: Option<&Regex>,
    ) -> Result<Self, RouterError> {
        let entries = table.into_entries();

        let prefix_len = entries
            .iter()
            .filter(|e| target.is_none_or(|t| t.is_match(e.path())))
            .map(|e| e.pattern().literal_prefix().len())
            .min()
            .unwrap_or(0);

        let (fixed, dynamic) = split_static(entries);

        let mut groups: Vec<(String, Vec<RouteEntry<F>>)> = Vec::new();
        for entry in dynamic {
            let key = bucket_key(entry.pattern().literal_prefix(), prefix_len);
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(entry),
                None => groups.push((key.to_owned(), vec![entry])),
            }
        }

        let mut buckets = HashMap::with_capacity(groups.len());
        for (key, members) in groups {
            buckets.insert(key, SlicedRegexpRouter::from_entries(members)?);
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            fixed = fixed.len(),
            prefix_len,
            buckets = buckets.len(),
            "built hashed regexp router"
        );

        Ok(Self {
            fixed,
            prefix_len,
            buckets,
        })
    }

    /// Length in bytes of the bucket prefix.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Bucket prefixes, in no particular order.
    pub fn bucket_keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }
}

/// Bucket of a pattern with the given literal prefix.
///
/// Too-short prefixes (and prefixes not cut on a character boundary) go to
/// the catch-all bucket.
fn bucket_key(literal_prefix: &str, prefix_len: usize) -> &str {
    literal_prefix.get(..prefix_len).unwrap_or("")
}

impl<F: Send + Sync> Router<F> for HashedRegexpRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        if let Some(found) = self.fixed.find(path) {
            return Some(found);
        }
        let key = path.get(..self.prefix_len).unwrap_or("");
        if !key.is_empty() {
            if let Some(found) = self.buckets.get(key).and_then(|b| b.find(path)) {
                return Some(found);
            }
        }
        self.buckets.get("")?.find(path)
    }
}

impl<F: Send + Sync> BuildRouter<F> for HashedRegexpRouter<F> {
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        let target = Regex::new(DEFAULT_PREFIX_TARGET)
            .map_err(|source| RouterError::InvalidPrefixTarget { source })?;
        Self::with_prefix_target(table, Some(&target))
    }
}
