//! Placeholder types and typed parameter values.
//!
//! A [`ParamType`] pairs the regular-expression fragment a placeholder
//! matches with the converter that turns the matched text into a
//! [`ParamValue`]. The registry is fixed and process-wide:
//!
//! | Name | Fragment | Value |
//! |------|----------|-------|
//! | `int` | `[0-9]+` | [`ParamValue::Int`] |
//! | `str` | `[^./]+` | [`ParamValue::Str`] |
//! | `date` | `[0-9]{4}-[0-9]{2}-[0-9]{2}` | [`ParamValue::Date`], fails on invalid calendar dates |
//! | `path` | `.*` | [`ParamValue::Str`], may contain `/` |

use chrono::NaiveDate;
use std::fmt;

/// Type used by a `{name}` placeholder without an explicit type.
pub const DEFAULT_PARAM_TYPE: &str = "str";

/// A converted path parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    /// Value of an `int` placeholder.
    Int(i64),
    /// Value of a `str` or `path` placeholder.
    Str(String),
    /// Value of a `date` placeholder.
    Date(NaiveDate),
}

impl ParamValue {
    /// The integer value, if this is an `int` parameter.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The string value, if this is a `str` or `path` parameter.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// The date value, if this is a `date` parameter.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ParamValue::Date(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Str(v) => f.write_str(v),
            ParamValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(v: NaiveDate) -> Self {
        ParamValue::Date(v)
    }
}

/// A named placeholder kind.
#[derive(Debug, Clone, Copy)]
pub struct ParamType {
    name: &'static str,
    fragment: &'static str,
    convert: fn(&str) -> Option<ParamValue>,
}

/// Built-in placeholder kinds.
pub static PARAM_TYPES: [ParamType; 4] = [
    ParamType::new("int", "[0-9]+", convert_int),
    ParamType::new("str", "[^./]+", convert_str),
    ParamType::new("date", "[0-9]{4}-[0-9]{2}-[0-9]{2}", convert_date),
    ParamType::new("path", ".*", convert_str),
];

impl ParamType {
    /// Define a placeholder kind.
    pub const fn new(
        name: &'static str,
        fragment: &'static str,
        convert: fn(&str) -> Option<ParamValue>,
    ) -> Self {
        Self {
            name,
            fragment,
            convert,
        }
    }

    /// Look up a built-in kind by name.
    pub fn lookup(name: &str) -> Option<&'static ParamType> {
        PARAM_TYPES.iter().find(|t| t.name == name)
    }

    /// The type name used in `{name:type}`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Regular-expression fragment matched by this kind (never capturing).
    pub fn fragment(&self) -> &'static str {
        self.fragment
    }

    /// Convert matched text, or `None` if the text is not a valid value.
    pub fn convert(&self, text: &str) -> Option<ParamValue> {
        (self.convert)(text)
    }
}

impl PartialEq for ParamType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ParamType {}

/// Parse `YYYY-MM-DD` into a calendar date.
///
/// Each part must be ASCII digits; invalid calendar values (e.g. Feb 30)
/// yield `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if ![year, month, day].iter().all(|p| is_digits(p)) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Check that `text` is a non-empty run of ASCII digits.
pub fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn convert_int(text: &str) -> Option<ParamValue> {
    // Out-of-range values fail conversion instead of wrapping.
    text.parse().ok().map(ParamValue::Int)
}

fn convert_str(text: &str) -> Option<ParamValue> {
    Some(ParamValue::Str(text.to_owned()))
}

fn convert_date(text: &str) -> Option<ParamValue> {
    parse_date(text).map(ParamValue::Date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lookup_builtin_types() {
        for name in ["int", "str", "date", "path"] {
            assert_eq!(ParamType::lookup(name).unwrap().name(), name);
        }
        assert!(ParamType::lookup("float").is_none());
        assert!(ParamType::lookup(DEFAULT_PARAM_TYPE).is_some());
    }

    #[test]
    fn test_int_conversion() {
        let int = ParamType::lookup("int").unwrap();
        assert_eq!(int.convert("123"), Some(ParamValue::Int(123)));
        assert_eq!(int.convert("0042"), Some(ParamValue::Int(42)));
        assert_eq!(int.convert("99999999999999999999"), None);
    }

    #[test]
    fn test_str_and_path_are_identity() {
        let s = ParamType::lookup("str").unwrap();
        let p = ParamType::lookup("path").unwrap();
        assert_eq!(s.convert("abcd"), Some("abcd".into()));
        assert_eq!(p.convert("a/b/c.css"), Some("a/b/c.css".into()));
    }

    #[test]
    fn test_date_conversion_checks_calendar() {
        let d = ParamType::lookup("date").unwrap();
        assert_eq!(d.convert("2024-02-29"), Some(ParamValue::Date(date(2024, 2, 29))));
        assert_eq!(d.convert("2023-02-29"), None);
        assert_eq!(d.convert("2024-02-30"), None);
        assert_eq!(d.convert("2024-13-01"), None);
    }

    #[test]
    fn test_parse_date_shape() {
        assert_eq!(parse_date("2024-1-5"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01"), None);
        assert_eq!(parse_date("2024-01-01-01"), None);
        assert_eq!(parse_date("2024-+1-01"), None);
        assert_eq!(parse_date("abcd-01-01"), None);
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::Int(7).to_string(), "7");
        assert_eq!(ParamValue::from("x").to_string(), "x");
        assert_eq!(ParamValue::Date(date(2024, 2, 9)).to_string(), "2024-02-09");
    }
}
