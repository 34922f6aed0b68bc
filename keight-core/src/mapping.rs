//! Registration tree and the flattened route table.
//!
//! A [`Mapping`] is an ordered list of `(path, mount)` pairs where a mount
//! is either a [`Resource`] or a nested [`Mapping`]. Flattening it with
//! [`RouteTable::build`] concatenates the paths along the way and yields
//! one [`RouteEntry`] per resource route, in registration order.

use crate::{
    error::RouterError,
    method::MethodTable,
    pattern::CompiledPattern,
    resource::Resource,
};
use std::{collections::HashMap, sync::Arc};

/// Target of one mapping entry.
#[derive(Debug)]
pub enum Mount<F> {
    /// A handler resource.
    Resource(Arc<Resource<F>>),
    /// A nested group sharing the entry's path as prefix.
    Group(Mapping<F>),
}

/// Ordered registration tree.
#[derive(Debug)]
pub struct Mapping<F> {
    entries: Vec<(String, Mount<F>)>,
}

impl<F> Default for Mapping<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Mapping<F> {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Mount a resource at `path`.
    pub fn mount(mut self, path: impl Into<String>, resource: impl Into<Arc<Resource<F>>>) -> Self {
        self.entries
            .push((path.into(), Mount::Resource(resource.into())));
        self
    }

    /// Mount a nested group at `path`.
    pub fn nest(mut self, path: impl Into<String>, group: Mapping<F>) -> Self {
        self.entries.push((path.into(), Mount::Group(group)));
        self
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[(String, Mount<F>)] {
        &self.entries
    }

    /// Check if nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into a [`RouteTable`].
    pub fn flatten(&self) -> Result<RouteTable<F>, RouterError> {
        RouteTable::build(self)
    }
}

/// One flattened route: full pattern plus the resource route it serves.
#[derive(Debug)]
pub struct RouteEntry<F> {
    pattern: CompiledPattern,
    resource: Arc<Resource<F>>,
    index: usize,
}

impl<F> Clone for RouteEntry<F> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            resource: Arc::clone(&self.resource),
            index: self.index,
        }
    }
}

impl<F> RouteEntry<F> {
    /// Create an entry for route `index` of `resource`.
    pub(crate) fn new(pattern: CompiledPattern, resource: Arc<Resource<F>>, index: usize) -> Self {
        debug_assert!(index < resource.routes().len(), "route index out of range");
        Self {
            pattern,
            resource,
            index,
        }
    }

    /// The compiled full path pattern.
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// The full path pattern as written.
    pub fn path(&self) -> &str {
        self.pattern.source()
    }

    /// The resource this route belongs to.
    pub fn resource(&self) -> &Resource<F> {
        &self.resource
    }

    /// Handler functions of this route.
    pub fn methods(&self) -> &MethodTable<F> {
        self.resource.routes()[self.index].methods()
    }
}

/// Flat, ordered route list.
///
/// No two entries share the same placeholder-free path.
#[derive(Debug)]
pub struct RouteTable<F> {
    entries: Vec<RouteEntry<F>>,
}

impl<F> Clone for RouteTable<F> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<F> RouteTable<F> {
    /// Flatten a mapping, compiling every full pattern.
    pub fn build(mapping: &Mapping<F>) -> Result<Self, RouterError> {
        let mut entries = Vec::new();
        traverse(mapping, "", &mut entries)?;
        Self::from_entries(entries)
    }

    /// Build from already flattened entries, checking for duplicated paths.
    pub fn from_entries(entries: Vec<RouteEntry<F>>) -> Result<Self, RouterError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for entry in &entries {
            if !entry.pattern.is_static() {
                continue;
            }
            if let Some(first) = seen.insert(entry.path(), entry.resource.name()) {
                return Err(RouterError::DuplicatePath {
                    path: entry.path().to_owned(),
                    first: first.to_owned(),
                    second: entry.resource.name().to_owned(),
                });
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(routes = entries.len(), "flattened route table");

        Ok(Self { entries })
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[RouteEntry<F>] {
        &self.entries
    }

    /// Consume into the entry list.
    pub fn into_entries(self) -> Vec<RouteEntry<F>> {
        self.entries
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn traverse<F>(
    mapping: &Mapping<F>,
    root: &str,
    out: &mut Vec<RouteEntry<F>>,
) -> Result<(), RouterError> {
    for (base, mount) in mapping.entries() {
        let prefix = format!("{root}{base}");
        match mount {
            Mount::Group(group) => traverse(group, &prefix, out)?,
            Mount::Resource(resource) => {
                validate(resource)?;
                for (index, route) in resource.routes().iter().enumerate() {
                    let full = format!("{prefix}{}", route.path());
                    let pattern = CompiledPattern::compile(&full)?;
                    out.push(RouteEntry::new(pattern, Arc::clone(resource), index));
                }
            }
        }
    }
    Ok(())
}

fn validate<F>(resource: &Resource<F>) -> Result<(), RouterError> {
    let empty = resource.routes().is_empty()
        || resource.routes().iter().any(|r| r.methods().is_empty());
    if empty {
        return Err(RouterError::NoHandlerFuncs {
            resource: resource.name().to_owned(),
        });
    }
    Ok(())
}
