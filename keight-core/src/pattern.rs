//! Path pattern compiler.
//!
//! A pattern is literal text interleaved with placeholders:
//!
//! - `{name}` captures a `str` parameter
//! - `{name:type}` captures a parameter of a registered [`ParamType`]
//! - a trailing `.*` accepts one optional extension (`.json`, `.html`, or none)
//!
//! ```rust
//! use keight_core::{CompiledPattern, ParamValue};
//!
//! let pattern = CompiledPattern::compile("/books/{id:int}.*").unwrap();
//! assert_eq!(pattern.param_names(), ["id"]);
//! assert_eq!(pattern.literal_prefix(), "/books/");
//! assert_eq!(pattern.extract("/books/12.json"), Some(vec![ParamValue::Int(12)]));
//! ```

use crate::{
    error::RouterError,
    param::{DEFAULT_PARAM_TYPE, ParamType, ParamValue},
};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt::Write;

/// Trailing marker meaning "optional extension".
pub const ANY_EXTENSION: &str = ".*";

/// Fragment matched by [`ANY_EXTENSION`].
pub const ANY_EXTENSION_FRAGMENT: &str = r"(?:\.\w+)?";

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([^}]*)\}").expect("placeholder scanner");
    static ref PLACEHOLDER_BODY: Regex =
        Regex::new(r"^(\w+)(?::(\w+))?$").expect("placeholder body");
}

/// One piece of a scanned pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, matched as-is.
    Literal(String),
    /// A typed placeholder.
    Param {
        /// Parameter name.
        name: String,
        /// Placeholder kind.
        kind: &'static ParamType,
    },
}

/// Split a placeholder body into `(name, type_name)`.
///
/// `name` must be word characters; a missing type defaults to `str`.
pub fn parse_placeholder<'a>(
    pattern: &str,
    body: &'a str,
) -> Result<(&'a str, &'a str), RouterError> {
    let caps = PLACEHOLDER_BODY
        .captures(body)
        .ok_or_else(|| RouterError::InvalidPlaceholder {
            pattern: pattern.to_owned(),
            placeholder: body.to_owned(),
        })?;
    let name = caps.get(1).map_or("", |m| m.as_str());
    let type_name = caps.get(2).map_or(DEFAULT_PARAM_TYPE, |m| m.as_str());
    Ok((name, type_name))
}

/// Scan a pattern (without its `.*` marker) into tokens.
fn scan(pattern: &str, body: &str) -> Result<Vec<Token>, RouterError> {
    let mut tokens = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(body) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            tokens.push(Token::Literal(body[last..whole.start()].to_owned()));
        }
        let (name, type_name) = parse_placeholder(pattern, inner.as_str())?;
        let kind = ParamType::lookup(type_name).ok_or_else(|| RouterError::UnknownParamType {
            pattern: pattern.to_owned(),
            type_name: type_name.to_owned(),
        })?;
        if names.contains(&name) {
            return Err(RouterError::DuplicateParam {
                pattern: pattern.to_owned(),
                name: name.to_owned(),
            });
        }
        names.push(name);
        tokens.push(Token::Param {
            name: name.to_owned(),
            kind,
        });
        last = whole.end();
    }

    if last < body.len() {
        tokens.push(Token::Literal(body[last..].to_owned()));
    }
    Ok(tokens)
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    tokens: Vec<Token>,
    any_extension: bool,
    regex: Regex,
    names: Vec<String>,
    kinds: Vec<&'static ParamType>,
}

impl CompiledPattern {
    /// Compile a pattern string.
    ///
    /// Fails on malformed placeholders, unknown types and duplicated
    /// parameter names.
    pub fn compile(pattern: &str) -> Result<Self, RouterError> {
        let (body, any_extension) = match pattern.strip_suffix(ANY_EXTENSION) {
            Some(body) => (body, true),
            None => (pattern, false),
        };
        let tokens = scan(pattern, body)?;

        let mut names = Vec::new();
        let mut kinds = Vec::new();
        for token in &tokens {
            if let Token::Param { name, kind } = token {
                names.push(name.clone());
                kinds.push(*kind);
            }
        }

        let regex = Regex::new(&format!(
            "^{}$",
            render(&tokens, any_extension, true)
        ))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(pattern = %pattern, regex = %regex.as_str(), "compiled path pattern");

        Ok(Self {
            source: pattern.to_owned(),
            tokens,
            any_extension,
            regex,
            names,
            kinds,
        })
    }

    /// The pattern as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Literal and placeholder tokens, without the `.*` marker.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Parameter names in order of appearance.
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    /// Parameter kinds in order of appearance.
    pub fn param_types(&self) -> &[&'static ParamType] {
        &self.kinds
    }

    /// Whether the pattern ends in the `.*` marker.
    pub fn has_any_extension(&self) -> bool {
        self.any_extension
    }

    /// Whether the pattern has neither placeholders nor a `.*` marker.
    pub fn is_static(&self) -> bool {
        self.names.is_empty() && !self.any_extension
    }

    /// Literal text before the first placeholder.
    pub fn literal_prefix(&self) -> &str {
        match self.tokens.first() {
            Some(Token::Literal(text)) => text,
            _ => "",
        }
    }

    /// Literal text after the last placeholder (excluding the `.*` marker).
    pub fn literal_suffix(&self) -> &str {
        match self.tokens.last() {
            Some(Token::Literal(text)) if !self.names.is_empty() => text,
            _ => "",
        }
    }

    /// The anchored matcher. Each placeholder is one capture group.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Unanchored expression for embedding in a combined regex.
    ///
    /// With `grouping == false` placeholders are non-capturing, so the
    /// expression adds no capture groups of its own.
    pub fn expression(&self, grouping: bool) -> String {
        render(&self.tokens, self.any_extension, grouping)
    }

    /// Run the matcher.
    pub fn captures<'p>(&self, path: &'p str) -> Option<Captures<'p>> {
        self.regex.captures(path)
    }

    /// Convert the capture groups of a successful match.
    ///
    /// `None` if any converter rejects its text.
    pub fn convert(&self, caps: &Captures<'_>) -> Option<Vec<ParamValue>> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| kind.convert(caps.get(i + 1)?.as_str()))
            .collect()
    }

    /// Match `path` and convert its parameters in one step.
    pub fn extract(&self, path: &str) -> Option<Vec<ParamValue>> {
        self.captures(path).and_then(|caps| self.convert(&caps))
    }
}

fn render(tokens: &[Token], any_extension: bool, grouping: bool) -> String {
    let mut expr = String::new();
    for token in tokens {
        match token {
            Token::Literal(text) => expr.push_str(&regex::escape(text)),
            Token::Param { kind, .. } if grouping => {
                let _ = write!(expr, "({})", kind.fragment());
            }
            Token::Param { kind, .. } => {
                let _ = write!(expr, "(?:{})", kind.fragment());
            }
        }
    }
    if any_extension {
        expr.push_str(ANY_EXTENSION_FRAGMENT);
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_tokens() {
        let p = CompiledPattern::compile("/books/{book_id:int}/comments/{code}").unwrap();
        assert_eq!(p.tokens().len(), 4);
        assert_eq!(p.param_names(), ["book_id", "code"]);
        let kinds: Vec<_> = p.param_types().iter().map(|k| k.name()).collect();
        assert_eq!(kinds, ["int", "str"]);
        assert_eq!(p.literal_prefix(), "/books/");
        assert_eq!(p.literal_suffix(), "");
        assert!(!p.is_static());
    }

    #[test]
    fn test_static_pattern() {
        let p = CompiledPattern::compile("/books.json").unwrap();
        assert!(p.is_static());
        assert_eq!(p.literal_prefix(), "/books.json");
        assert_eq!(p.regex().as_str(), r"^/books\.json$");
        assert_eq!(p.extract("/books.json"), Some(vec![]));
        assert_eq!(p.extract("/booksxjson"), None);
    }

    #[test]
    fn test_unclosed_brace_is_literal() {
        let p = CompiledPattern::compile("/x{").unwrap();
        assert!(p.is_static());
        assert_eq!(p.regex().as_str(), r"^/x\{$");
        assert_eq!(p.extract("/x{"), Some(vec![]));
    }

    #[test]
    fn test_typed_extraction() {
        let p = CompiledPattern::compile("/{id:int}.json").unwrap();
        assert_eq!(p.extract("/123.json"), Some(vec![ParamValue::Int(123)]));
        assert_eq!(p.extract("/123"), None);
        assert_eq!(p.extract("/abc.json"), None);
        assert_eq!(p.literal_suffix(), ".json");
    }

    #[test]
    fn test_any_extension() {
        let p = CompiledPattern::compile("/orders/{id:int}.*").unwrap();
        assert!(p.has_any_extension());
        assert!(!CompiledPattern::compile("/orders.*").unwrap().is_static());
        for path in ["/orders/123", "/orders/123.json", "/orders/123.html"] {
            assert_eq!(p.extract(path), Some(vec![ParamValue::Int(123)]), "{path}");
        }
        assert_eq!(p.extract("/orders/123.html/"), None);
        assert_eq!(p.expression(false), r"/orders/(?:[0-9]+)(?:\.\w+)?");
    }

    #[test]
    fn test_conversion_failure_is_no_match() {
        let p = CompiledPattern::compile("/{d:date}").unwrap();
        assert!(p.captures("/2024-02-30").is_some());
        assert_eq!(p.extract("/2024-02-30"), None);
        assert!(p.extract("/2024-02-29").is_some());
    }

    #[test]
    fn test_metacharacters_are_escaped() {
        let p = CompiledPattern::compile("/a+b/(x)/{id:int}").unwrap();
        assert!(p.extract("/a+b/(x)/5").is_some());
        assert!(p.extract("/aab/(x)/5").is_none());
        assert!(p.extract("/a+b/x/5").is_none());
    }

    #[test]
    fn test_str_stops_at_dot_and_slash() {
        let p = CompiledPattern::compile("/{name}").unwrap();
        assert!(p.extract("/abc").is_some());
        assert!(p.extract("/a.c").is_none());
        assert!(p.extract("/a/c").is_none());
    }

    #[test]
    fn test_path_spans_slashes() {
        let p = CompiledPattern::compile("/static/{rest:path}").unwrap();
        assert_eq!(p.extract("/static/css/a.css"), Some(vec!["css/a.css".into()]));
    }

    #[test]
    fn test_unknown_type() {
        let err = CompiledPattern::compile("/{id:float}").unwrap_err();
        assert!(matches!(err, RouterError::UnknownParamType { ref type_name, .. } if type_name == "float"));
    }

    #[test]
    fn test_duplicate_param() {
        let err = CompiledPattern::compile("/{id}/x/{id:int}").unwrap_err();
        assert!(matches!(err, RouterError::DuplicateParam { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_invalid_placeholder() {
        let err = CompiledPattern::compile("/{id-x}").unwrap_err();
        assert!(matches!(err, RouterError::InvalidPlaceholder { .. }));
        let err = CompiledPattern::compile("/{}").unwrap_err();
        assert!(matches!(err, RouterError::InvalidPlaceholder { .. }));
    }
}
