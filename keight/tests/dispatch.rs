//! Method resolution and redirects through the dispatcher.

mod common;

use common::SAMPLE;
use keight::{
    Dispatcher, Lookup, Mapping, Methods, ParamValue, Resource, RouterConfig, RouterKind,
};

fn dispatchers() -> Vec<Dispatcher<&'static str>> {
    RouterKind::ALL
        .into_iter()
        .map(|kind| Dispatcher::from_config(&kind.into(), &SAMPLE).unwrap())
        .collect()
}

#[test]
fn test_exact_method() {
    for d in dispatchers() {
        match d.lookup("PUT", "/api/v1/books/123.json") {
            Lookup::Found {
                resource,
                handler,
                params,
            } => {
                assert_eq!(resource.name(), "BooksAPI");
                assert_eq!(*handler, "do_update");
                assert_eq!(params, [ParamValue::Int(123)]);
            }
            other => panic!("{}: unexpected {other:?}", d.router().kind()),
        }
        assert_eq!(
            d.lookup("POST", "/api/v1/orders/123/edit.html").handler(),
            Some(&"post_edit_form")
        );
    }
}

#[test]
fn test_head_falls_back_to_get() {
    for d in dispatchers() {
        assert_eq!(d.lookup("HEAD", "/").handler(), Some(&"do_home"));
        assert_eq!(
            d.lookup("HEAD", "/api/v1/books/123/comments/abcd").handler(),
            Some(&"do_show")
        );
    }
}

#[test]
fn test_method_not_allowed() {
    for d in dispatchers() {
        match d.lookup("PATCH", "/api/v1/books/123.json") {
            Lookup::MethodNotAllowed {
                resource,
                allowed,
                params,
            } => {
                assert_eq!(resource.name(), "BooksAPI");
                assert_eq!(allowed, Methods::GET | Methods::PUT | Methods::DELETE);
                assert_eq!(allowed.allow_header(), "GET, HEAD, PUT, DELETE");
                assert_eq!(params, [ParamValue::Int(123)]);
            }
            other => panic!("{}: unexpected {other:?}", d.router().kind()),
        }
        assert!(d.lookup("DELETE", "/").is_method_not_allowed());
    }
}

#[test]
fn test_not_found_ignores_method() {
    for d in dispatchers() {
        assert!(d.lookup("GET", "/api/v1/books/abc.json").is_not_found());
        assert!(d.lookup("PROPFIND", "/nowhere").is_not_found());
    }
}

#[test]
fn test_any_serves_unknown_methods() {
    let webdav = Resource::builder("WebDAV")
        .route("/{name}", |r| r.get("read").any("fallback"))
        .build()
        .unwrap();
    let mapping = Mapping::new().mount("/dav", webdav);

    for kind in RouterKind::ALL {
        let d = Dispatcher::from_config(&kind.into(), &mapping).unwrap();
        assert_eq!(d.lookup("GET", "/dav/x").handler(), Some(&"read"));
        assert_eq!(d.lookup("HEAD", "/dav/x").handler(), Some(&"read"));
        assert_eq!(d.lookup("PROPFIND", "/dav/x").handler(), Some(&"fallback"));
        assert_eq!(d.lookup("DELETE", "/dav/x").handler(), Some(&"fallback"));
    }
}

#[test]
fn test_trailing_slash_redirect() {
    for d in dispatchers() {
        assert_eq!(
            d.redirect_location("GET", "/api/v1/orders").as_deref(),
            Some("/api/v1/orders/")
        );
        assert_eq!(
            d.redirect_location("HEAD", "/api/v1/books/123/comments/").as_deref(),
            Some("/api/v1/books/123/comments")
        );
        assert_eq!(d.redirect_location("POST", "/api/v1/orders"), None);
        assert_eq!(d.redirect_location("GET", "/api/v1/orders/"), None);
        assert_eq!(d.redirect_location("GET", "/api/v1/books/"), None);
    }
}

#[test]
fn test_hashed_with_custom_prefix_target() {
    let config = RouterConfig::new(RouterKind::HashedRegexp).prefix_target(Some(r"^/api/"));
    let d = Dispatcher::from_config(&config, &SAMPLE).unwrap();
    assert_eq!(d.lookup("GET", "/api/v1/orders/5").handler(), Some(&"do_show"));

    let d = Dispatcher::from_config(&config.prefix_target(None), &SAMPLE).unwrap();
    assert_eq!(d.lookup("GET", "/api/v1/orders/5").handler(), Some(&"do_show"));
}
