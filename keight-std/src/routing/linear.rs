//! Scan-based routers.

use super::{StaticMap, split_static};
use keight_core::{BuildRouter, RouteEntry, RouteMatch, RouteTable, Router, RouterError};

/// Tries every route's matcher in registration order.
///
/// The reference semantics every other router reproduces.
pub struct NaiveLinearRouter<F> {
    routes: Vec<RouteEntry<F>>,
}

impl<F: Send + Sync> Router<F> for NaiveLinearRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        for entry in &self.routes {
            if let Some(caps) = entry.pattern().captures(path) {
                let params = entry.pattern().convert(&caps)?;
                return Some(RouteMatch::new(entry, params));
            }
        }
        None
    }
}

impl<F: Send + Sync> BuildRouter<F> for NaiveLinearRouter<F> {
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        #[cfg(feature = "tracing")]
        tracing::info!(routes = table.len(), "built naive linear router");

        Ok(Self {
            routes: table.into_entries(),
        })
    }
}

/// Like [`NaiveLinearRouter`], but skips routes whose literal prefix the
/// path does not start with.
pub struct PrefixLinearRouter<F> {
    routes: Vec<RouteEntry<F>>,
}

fn scan_prefixed<'a, F>(routes: &'a [RouteEntry<F>], path: &str) -> Option<RouteMatch<'a, F>> {
    for entry in routes {
        let pattern = entry.pattern();
        if !path.starts_with(pattern.literal_prefix()) {
            continue;
        }
        if let Some(caps) = pattern.captures(path) {
            let params = pattern.convert(&caps)?;
            return Some(RouteMatch::new(entry, params));
        }
    }
    None
}

impl<F: Send + Sync> Router<F> for PrefixLinearRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        scan_prefixed(&self.routes, path)
    }
}

impl<F: Send + Sync> BuildRouter<F> for PrefixLinearRouter<F> {
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        #[cfg(feature = "tracing")]
        tracing::info!(routes = table.len(), "built prefix linear router");

        Ok(Self {
            routes: table.into_entries(),
        })
    }
}

/// Exact map for placeholder-free paths, prefix scan for the rest.
///
/// A literal path always beats an overlapping placeholder pattern.
pub struct FixedLinearRouter<F> {
    fixed: StaticMap<F>,
    routes: Vec<RouteEntry<F>>,
}

impl<F: Send + Sync> Router<F> for FixedLinearRouter<F> {
    fn find(&self, path: &str) -> Option<RouteMatch<'_, F>> {
        self.fixed
            .find(path)
            .or_else(|| scan_prefixed(&self.routes, path))
    }
}

impl<F: Send + Sync> BuildRouter<F> for FixedLinearRouter<F> {
    fn from_table(table: RouteTable<F>) -> Result<Self, RouterError> {
        let (fixed, routes) = split_static(table.into_entries());

        #[cfg(feature = "tracing")]
        tracing::info!(
            fixed = fixed.len(),
            dynamic = routes.len(),
            "built fixed linear router"
        );

        Ok(Self { fixed, routes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keight_core::{Mapping, ParamValue, Resource};

    fn overlap() -> Mapping<&'static str> {
        let param = Resource::builder("Param")
            .route("/{a}", |r| r.get("param"))
            .build()
            .unwrap();
        let fixed = Resource::builder("Fixed")
            .route("/fixed", |r| r.get("fixed"))
            .build()
            .unwrap();
        Mapping::new().mount("", param).mount("", fixed)
    }

    fn winner<R: Router<&'static str>>(router: &R, path: &str) -> Option<String> {
        router.find(path).map(|m| m.resource().name().to_owned())
    }

    #[test]
    fn test_naive_first_registered_wins() {
        let router = NaiveLinearRouter::from_mapping(&overlap()).unwrap();
        assert_eq!(winner(&router, "/fixed").as_deref(), Some("Param"));
        assert_eq!(
            router.find("/abc").map(|m| m.params().to_vec()),
            Some(vec![ParamValue::from("abc")])
        );
    }

    #[test]
    fn test_prefix_first_registered_wins() {
        let router = PrefixLinearRouter::from_mapping(&overlap()).unwrap();
        assert_eq!(winner(&router, "/fixed").as_deref(), Some("Param"));
    }

    #[test]
    fn test_fixed_literal_wins() {
        let router = FixedLinearRouter::from_mapping(&overlap()).unwrap();
        assert_eq!(winner(&router, "/fixed").as_deref(), Some("Fixed"));
        assert_eq!(winner(&router, "/other").as_deref(), Some("Param"));
    }

    #[test]
    fn test_conversion_failure_stops_scan() {
        let date = Resource::builder("Date")
            .route("/{d:date}", |r| r.get("date"))
            .build()
            .unwrap();
        let any = Resource::builder("Any")
            .route("/{s:path}", |r| r.get("any"))
            .build()
            .unwrap();
        let mapping = Mapping::new().mount("", date).mount("", any);
        let router = NaiveLinearRouter::from_mapping(&mapping).unwrap();
        assert!(router.find("/2024-02-30").is_none());
        assert_eq!(winner(&router, "/2024-02-29").as_deref(), Some("Date"));
        assert_eq!(winner(&router, "/x/y").as_deref(), Some("Any"));
    }
}
