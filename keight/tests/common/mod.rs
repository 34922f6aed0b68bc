#![allow(dead_code)]

use keight::{
    AnyRouter, Mapping, Resource, RouterConfig, RouterError, RouterKind, testing::Action,
};

lazy_static::lazy_static! {
    /// The shared Home/Books/BookComments/Orders mapping.
    pub static ref SAMPLE: Mapping<Action> =
        keight::testing::sample_mapping().expect("sample mapping should build");
}

// ============================================================================
// Router Builders
// ============================================================================

/// Build every strategy from one mapping.
pub fn build_all(mapping: &Mapping<Action>) -> Vec<AnyRouter<Action>> {
    RouterKind::ALL
        .into_iter()
        .map(|kind| {
            RouterConfig::new(kind)
                .build(mapping)
                .unwrap_or_else(|e| panic!("{kind}: {e}"))
        })
        .collect()
}

/// Build every strategy, keeping each outcome.
pub fn try_build_all(
    mapping: &Mapping<Action>,
) -> Vec<(RouterKind, Result<AnyRouter<Action>, RouterError>)> {
    RouterKind::ALL
        .into_iter()
        .map(|kind| (kind, RouterConfig::new(kind).build(mapping)))
        .collect()
}

// ============================================================================
// Mapping Helpers
// ============================================================================

/// One resource per path, each serving `GET` with a handler named after
/// the resource.
pub fn single_routes(paths: &[(&'static str, &'static str)]) -> Mapping<Action> {
    paths.iter().fold(Mapping::new(), |mapping, (name, path)| {
        let resource = Resource::builder(*name)
            .route("", |r| r.get(*name))
            .build()
            .expect("resource should build");
        mapping.mount(*path, resource)
    })
}

/// Name of the resource serving `path`.
pub fn resource_name(router: &AnyRouter<Action>, path: &str) -> Option<String> {
    use keight::Router;
    router.find(path).map(|m| m.resource().name().to_owned())
}
