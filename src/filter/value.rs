//! Scalar and range values shared by filters, facet rows and stored fields.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Date format accepted for date-valued filters and fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator for `"low..high"` range strings.
pub const RANGE_SEPARATOR: &str = "..";

/// A single comparable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    Text(String),
}

impl Scalar {
    /// Parse a textual token. Numbers and `YYYY-MM-DD` dates are recognized,
    /// everything else stays text. Empty tokens are rejected.
    pub fn parse(token: &str) -> Option<Scalar> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Ok(value) = token.parse::<i64>() {
            return Some(Scalar::Integer(value));
        }
        if let Ok(value) = token.parse::<f64>()
            && value.is_finite()
        {
            return Some(Scalar::Float(value));
        }
        if let Ok(date) = NaiveDate::parse_from_str(token, DATE_FORMAT) {
            return Some(Scalar::Date(date));
        }
        Some(Scalar::Text(token.to_string()))
    }

    /// Convert a JSON value. Arrays, objects and null have no scalar form.
    pub fn from_json(value: &Value) -> Option<Scalar> {
        match value {
            Value::Bool(b) => Some(Scalar::Boolean(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Scalar::Integer(i)),
                None => n.as_f64().filter(|f| f.is_finite()).map(Scalar::Float),
            },
            Value::String(s) => Scalar::parse(s),
            _ => None,
        }
    }

    /// Whether the value can bound a range: numbers and dates.
    pub fn is_ordinal(&self) -> bool {
        matches!(self, Scalar::Integer(_) | Scalar::Float(_) | Scalar::Date(_))
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Compare two scalars of compatible types. Integers and floats compare
    /// numerically; any other mix is incomparable.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Integer(a), Scalar::Integer(b)) => Some(a.cmp(b)),
            (Scalar::Date(a), Scalar::Date(b)) => Some(a.cmp(b)),
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
            (Scalar::Boolean(a), Scalar::Boolean(b)) => Some(a.cmp(b)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Equality used for exact-match filters: typed equality, falling back
    /// to the rendered form so `"42"` stored as text matches a numeric 42.
    pub fn matches(&self, other: &Scalar) -> bool {
        match self.compare(other) {
            Some(ordering) => ordering == Ordering::Equal,
            None => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Boolean(b) => write!(f, "{b}"),
            Scalar::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Scalar::Date(value)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Scalar::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("not a scalar value: {value}")))
    }
}

/// An inclusive `[low, high]` range over numbers or dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeValue {
    low: Scalar,
    high: Scalar,
}

impl RangeValue {
    /// Create a range. Returns `None` when a bound is neither a number nor a
    /// date, or the bounds are incomparable or out of order.
    pub fn new(low: Scalar, high: Scalar) -> Option<Self> {
        if !low.is_ordinal() || !high.is_ordinal() {
            return None;
        }
        match low.compare(&high)? {
            Ordering::Greater => None,
            _ => Some(RangeValue { low, high }),
        }
    }

    /// Parse a two-element JSON array or a `"low..high"` string.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(pair) if pair.len() == 2 => {
                RangeValue::new(Scalar::from_json(&pair[0])?, Scalar::from_json(&pair[1])?)
            }
            Value::String(s) => RangeValue::parse(s),
            _ => None,
        }
    }

    /// Parse a `"low..high"` string.
    pub fn parse(token: &str) -> Option<Self> {
        let (low, high) = token.split_once(RANGE_SEPARATOR)?;
        RangeValue::new(Scalar::parse(low)?, Scalar::parse(high)?)
    }

    pub fn low(&self) -> &Scalar {
        &self.low
    }

    pub fn high(&self) -> &Scalar {
        &self.high
    }

    /// Check if a value falls within this range (both ends inclusive).
    pub fn contains(&self, value: &Scalar) -> bool {
        matches!(
            value.compare(&self.low),
            Some(Ordering::Greater | Ordering::Equal)
        ) && matches!(
            value.compare(&self.high),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    /// Whether the two ranges share at least one point.
    pub fn overlaps(&self, other: &RangeValue) -> bool {
        self.contains(&other.low)
            || self.contains(&other.high)
            || other.contains(&self.low)
    }
}

impl fmt::Display for RangeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RANGE_SEPARATOR}{}", self.low, self.high)
    }
}

#[derive(Deserialize)]
struct RawRange {
    low: Scalar,
    high: Scalar,
}

impl<'de> Deserialize<'de> for RangeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawRange::deserialize(deserializer)?;
        RangeValue::new(raw.low, raw.high)
            .ok_or_else(|| serde::de::Error::custom("range bounds are out of order"))
    }
}

/// One value of a filter: a scalar or a range pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(Scalar),
    Range(RangeValue),
}

impl FilterValue {
    /// Classify a raw JSON filter value.
    ///
    /// Two-element number/date arrays and `"a..b"` strings with number/date
    /// bounds become ranges. Other strings containing `..` stay text
    /// scalars; other arrays have no filter form.
    pub fn from_json(value: &Value) -> Option<FilterValue> {
        match value {
            Value::Array(_) => RangeValue::from_json(value).map(FilterValue::Range),
            Value::String(s) => match s.split_once(RANGE_SEPARATOR) {
                Some((low, high)) => match (Scalar::parse(low), Scalar::parse(high)) {
                    (Some(low), Some(high)) if low.is_ordinal() && high.is_ordinal() => {
                        RangeValue::new(low, high).map(FilterValue::Range)
                    }
                    _ => Scalar::parse(s).map(FilterValue::Scalar),
                },
                None => Scalar::parse(s).map(FilterValue::Scalar),
            },
            _ => Scalar::from_json(value).map(FilterValue::Scalar),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_scalar_parse() {
        assert_eq!(Scalar::parse("42"), Some(Scalar::Integer(42)));
        assert_eq!(Scalar::parse(" 9.5 "), Some(Scalar::Float(9.5)));
        assert_eq!(
            Scalar::parse("2024-03-01"),
            Some(Scalar::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
        );
        assert_eq!(Scalar::parse("red"), Some(Scalar::Text("red".to_string())));
        assert_eq!(Scalar::parse("   "), None);
        assert_eq!(Scalar::parse("NaN"), Some(Scalar::Text("NaN".to_string())));
    }

    #[test]
    fn test_scalar_compare_and_match() {
        assert_eq!(
            Scalar::Integer(10).compare(&Scalar::Float(10.5)),
            Some(Ordering::Less)
        );
        assert_eq!(Scalar::Text("a".into()).compare(&Scalar::Integer(1)), None);
        assert!(Scalar::Integer(42).matches(&Scalar::Text("42".into())));
        assert!(Scalar::Integer(10).matches(&Scalar::Float(10.0)));
        assert!(!Scalar::Text("red".into()).matches(&Scalar::Text("blue".into())));
    }

    #[test]
    fn test_scalar_deserialize() {
        let values: Vec<Scalar> = serde_json::from_value(json!([1, 2.5, "x", true])).unwrap();
        assert_eq!(
            values,
            vec![
                Scalar::Integer(1),
                Scalar::Float(2.5),
                Scalar::Text("x".into()),
                Scalar::Boolean(true)
            ]
        );
        assert!(serde_json::from_value::<Scalar>(json!(null)).is_err());
    }

    #[test]
    fn test_range_value() {
        let range = RangeValue::parse("10..20").unwrap();
        assert!(range.contains(&Scalar::Integer(10)));
        assert!(range.contains(&Scalar::Float(19.99)));
        assert!(range.contains(&Scalar::Integer(20)));
        assert!(!range.contains(&Scalar::Integer(21)));
        assert!(!range.contains(&Scalar::Text("15".into())));
        assert_eq!(range.to_string(), "10..20");

        assert!(RangeValue::parse("20..10").is_none());
        assert!(RangeValue::parse("a..5").is_none());
        assert!(RangeValue::parse("a..z").is_none());
        assert!(RangeValue::from_json(&json!(["L", "XL"])).is_none());
        assert!(RangeValue::from_json(&json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_range_overlap() {
        let a = RangeValue::parse("0..10").unwrap();
        let b = RangeValue::parse("10..20").unwrap();
        let c = RangeValue::parse("21..30").unwrap();
        let inner = RangeValue::parse("2..3").unwrap();
        assert!(a.overlaps(&b));
        assert!(!b.overlaps(&c));
        assert!(a.overlaps(&inner));
        assert!(inner.overlaps(&a));
    }

    #[test]
    fn test_date_range() {
        let range = RangeValue::from_json(&json!(["2024-01-01", "2024-01-31"])).unwrap();
        assert!(range.contains(&Scalar::parse("2024-01-15").unwrap()));
        assert!(!range.contains(&Scalar::parse("2024-02-01").unwrap()));
    }

    #[test]
    fn test_filter_value_classification() {
        assert!(matches!(
            FilterValue::from_json(&json!([5, 10])),
            Some(FilterValue::Range(_))
        ));
        assert!(matches!(
            FilterValue::from_json(&json!("5..10")),
            Some(FilterValue::Range(_))
        ));
        assert!(matches!(
            FilterValue::from_json(&json!("red")),
            Some(FilterValue::Scalar(_))
        ));
        assert_eq!(FilterValue::from_json(&json!({"a": 1})), None);
        assert_eq!(FilterValue::from_json(&json!([10, 5])), None);
        assert_eq!(FilterValue::from_json(&json!("10..5")), None);
        assert_eq!(FilterValue::from_json(&json!(["L", "XL"])), None);
        assert_eq!(
            FilterValue::from_json(&json!("Loading...")),
            Some(FilterValue::Scalar(Scalar::Text("Loading...".into())))
        );
        assert_eq!(
            FilterValue::from_json(&json!("a..z")),
            Some(FilterValue::Scalar(Scalar::Text("a..z".into())))
        );
    }
}
