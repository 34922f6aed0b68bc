//! Testing utilities for keight routers.
//!
//! Every strategy must give the same answers for the same registration
//! data. This module provides one shared mapping and a request corpus so
//! all of them can be checked against identical inputs.
//!
//! # Features
//!
//! - [`sample_mapping`]: Home, Books, BookComments and Orders resources
//! - [`FOUND`], [`NOT_FOUND`], [`SUFFIXED`]: request paths with expected outcomes
//! - [`summarize`]: Reduce a lookup to comparable plain data

use keight_core::{Mapping, ParamValue, Resource, RouteMatch, RouterError};

/// Handler functions in the sample mapping are their own names.
pub type Action = &'static str;

// ============================================================================
// Sample Mapping
// ============================================================================

/// `/` serving a home page.
pub fn home_api() -> Result<Resource<Action>, RouterError> {
    Resource::builder("HomeAPI")
        .route("", |r| r.get("do_home"))
        .build()
}

/// Books collection with JSON endpoints.
pub fn books_api() -> Result<Resource<Action>, RouterError> {
    Resource::builder("BooksAPI")
        .route(".json", |r| r.get("do_index").post("do_create"))
        .route("/{id:int}.json", |r| {
            r.get("do_show").put("do_update").delete("do_delete")
        })
        .build()
}

/// Comments nested under a book.
pub fn book_comments_api() -> Result<Resource<Action>, RouterError> {
    Resource::builder("BookCommentsAPI")
        .route("", |r| r.get("do_index").post("do_create"))
        .route("/{code}", |r| {
            r.get("do_show").put("do_update").delete("do_delete")
        })
        .build()
}

/// Orders with an optional extension on the item route.
pub fn orders_api() -> Result<Resource<Action>, RouterError> {
    Resource::builder("OrdersAPI")
        .route("/", |r| r.get("do_index").post("do_create"))
        .route("/{id:int}.*", |r| {
            r.get("do_show").put("do_update").delete("do_delete")
        })
        .route("/{id:int}/edit.html", |r| {
            r.get("show_edit_form").post("post_edit_form")
        })
        .build()
}

/// The shared registration tree.
///
/// ```text
/// /                                        HomeAPI
/// /api/v1/books.json                       BooksAPI
/// /api/v1/books/{id:int}.json              BooksAPI
/// /api/v1/books/{book_id:int}/comments     BookCommentsAPI
/// /api/v1/books/{book_id:int}/comments/{code}
/// /api/v1/orders/                          OrdersAPI
/// /api/v1/orders/{id:int}.*
/// /api/v1/orders/{id:int}/edit.html
/// ```
pub fn sample_mapping() -> Result<Mapping<Action>, RouterError> {
    Ok(Mapping::new().mount("/", home_api()?).nest(
        "/api/v1",
        Mapping::new()
            .mount("/books", books_api()?)
            .mount("/books/{book_id:int}/comments", book_comments_api()?)
            .mount("/orders", orders_api()?),
    ))
}

// ============================================================================
// Request Corpus
// ============================================================================

/// An expected parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// `int` parameter.
    Int(i64),
    /// `str` parameter.
    Str(&'static str),
}

impl From<Expected> for ParamValue {
    fn from(value: Expected) -> Self {
        match value {
            Expected::Int(v) => ParamValue::Int(v),
            Expected::Str(v) => ParamValue::Str(v.to_owned()),
        }
    }
}

/// A path some route must serve: `(path, resource, params)`.
pub type FoundCase = (&'static str, &'static str, &'static [Expected]);

/// Paths served by the sample mapping.
pub const FOUND: &[FoundCase] = &[
    ("/", "HomeAPI", &[]),
    ("/api/v1/books.json", "BooksAPI", &[]),
    ("/api/v1/books/123.json", "BooksAPI", &[Expected::Int(123)]),
    ("/api/v1/orders/", "OrdersAPI", &[]),
    ("/api/v1/orders/123.json", "OrdersAPI", &[Expected::Int(123)]),
    ("/api/v1/orders/123/edit.html", "OrdersAPI", &[Expected::Int(123)]),
    ("/api/v1/books/123/comments", "BookCommentsAPI", &[Expected::Int(123)]),
    (
        "/api/v1/books/123/comments/abcd",
        "BookCommentsAPI",
        &[Expected::Int(123), Expected::Str("abcd")],
    ),
];

/// Paths no route of the sample mapping serves.
pub const NOT_FOUND: &[&str] = &[
    "",
    "/api/v1/books/",
    "/api/v1/books/abc.json",
    "/api/v1/books/123.html",
    "/api/v1/orders",
    "/api/v1/orders/abc.html",
    "/api/v1/orders/123.html/",
    "/api/v1/books/123/comments/abcd.json",
    "/api/v1/books/123/comments/abcd/",
];

/// Paths that must all reach the `.*` route with `id = 123`.
pub const SUFFIXED: &[&str] = &[
    "/api/v1/orders/123.json",
    "/api/v1/orders/123.html",
    "/api/v1/orders/123",
];

/// Resource name and parameters of a match, for comparing routers.
pub fn summarize<F>(found: Option<RouteMatch<'_, F>>) -> Option<(String, Vec<ParamValue>)> {
    found.map(|m| (m.resource().name().to_owned(), m.params().to_vec()))
}

/// Expected summary of a [`FoundCase`].
pub fn expected(case: &FoundCase) -> Option<(String, Vec<ParamValue>)> {
    let (_, resource, params) = case;
    Some((
        (*resource).to_owned(),
        params.iter().copied().map(ParamValue::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keight_core::RouteTable;

    #[test]
    fn test_sample_mapping_flattens() {
        let table = RouteTable::build(&sample_mapping().unwrap()).unwrap();
        let paths: Vec<_> = table.entries().iter().map(|e| e.path()).collect();
        assert_eq!(
            paths,
            [
                "/",
                "/api/v1/books.json",
                "/api/v1/books/{id:int}.json",
                "/api/v1/books/{book_id:int}/comments",
                "/api/v1/books/{book_id:int}/comments/{code}",
                "/api/v1/orders/",
                "/api/v1/orders/{id:int}.*",
                "/api/v1/orders/{id:int}/edit.html",
            ]
        );
    }

    #[test]
    fn test_expected_summary() {
        let case = FOUND[7];
        assert_eq!(
            expected(&case),
            Some((
                "BookCommentsAPI".to_string(),
                vec![ParamValue::Int(123), ParamValue::from("abcd")]
            ))
        );
    }
}
