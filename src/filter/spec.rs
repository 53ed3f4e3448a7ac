//! Typed filters parsed from the raw request filter map.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::filter::condition::{Condition, ExclusionMarker, Predicate};
use crate::filter::value::{FilterValue, RangeValue, Scalar};

/// Raw filters as supplied by the caller: facet key to raw values.
pub type RawFilters = BTreeMap<String, Vec<Value>>;

/// Key prefix selecting exclusion semantics (`"-color": ["red"]`).
pub const EXCLUDE_PREFIX: char = '-';

/// How a filter constrains its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Exact,
    Exclude,
    Range,
}

/// A single filter condition on one facet.
///
/// All values share the filter's kind. Range values are ordered by lower
/// bound and never overlap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    name: String,
    kind: FilterKind,
    values: Vec<FilterValue>,
}

impl FilterSpec {
    /// Build a filter from one raw map entry.
    ///
    /// The kind is decided by the first value that parses; values of the
    /// other kind, unparseable values, duplicates and overlapping ranges are
    /// dropped. Returns `None` when nothing usable remains.
    pub fn parse(key: &str, raw_values: &[Value]) -> Option<FilterSpec> {
        let (name, exclude) = match key.strip_prefix(EXCLUDE_PREFIX) {
            Some(name) => (name.trim(), true),
            None => (key.trim(), false),
        };
        if name.is_empty() {
            debug!("dropping filter with empty key {key:?}");
            return None;
        }

        let mut parsed = raw_values.iter().filter_map(|raw| {
            let value = FilterValue::from_json(raw);
            if value.is_none() {
                debug!("dropping unparseable value {raw} for filter {name}");
            }
            value
        });

        let first = parsed.next()?;
        let spec = match first {
            FilterValue::Range(range) if !exclude => {
                let mut ranges = vec![range];
                ranges.extend(parsed.filter_map(|value| match value {
                    FilterValue::Range(range) => Some(range),
                    FilterValue::Scalar(scalar) => {
                        debug!("dropping scalar {scalar} from range filter {name}");
                        None
                    }
                }));
                FilterSpec {
                    name: name.to_string(),
                    kind: FilterKind::Range,
                    values: disjoint_ranges(name, ranges)
                        .into_iter()
                        .map(FilterValue::Range)
                        .collect(),
                }
            }
            FilterValue::Range(range) => {
                debug!("dropping range {range} from exclusion filter {name}");
                return FilterSpec::parse_scalars(name, parsed, exclude);
            }
            FilterValue::Scalar(scalar) => {
                let rest = std::iter::once(FilterValue::Scalar(scalar)).chain(parsed);
                return FilterSpec::parse_scalars(name, rest, exclude);
            }
        };
        Some(spec)
    }

    fn parse_scalars(
        name: &str,
        values: impl Iterator<Item = FilterValue>,
        exclude: bool,
    ) -> Option<FilterSpec> {
        let mut scalars: Vec<Scalar> = Vec::new();
        for value in values {
            match value {
                FilterValue::Scalar(scalar) => {
                    if !scalars.contains(&scalar) {
                        scalars.push(scalar);
                    }
                }
                FilterValue::Range(range) => {
                    debug!("dropping range {range} from scalar filter {name}");
                }
            }
        }
        if scalars.is_empty() {
            return None;
        }
        Some(FilterSpec {
            name: name.to_string(),
            kind: if exclude {
                FilterKind::Exclude
            } else {
                FilterKind::Exact
            },
            values: scalars.into_iter().map(FilterValue::Scalar).collect(),
        })
    }

    /// Facet key this filter applies to.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn values(&self) -> &[FilterValue] {
        &self.values
    }

    /// Tag identifying the condition this filter compiles to. Exclusions get
    /// the prefixed key so `color` and `-color` never collide.
    pub fn tag(&self) -> String {
        match self.kind {
            FilterKind::Exclude => format!("{EXCLUDE_PREFIX}{}", self.name),
            _ => self.name.clone(),
        }
    }

    /// Encode this filter as an index condition on its field.
    pub fn to_condition(&self) -> Condition {
        let scalars = || {
            self.values
                .iter()
                .filter_map(|value| match value {
                    FilterValue::Scalar(scalar) => Some(scalar.clone()),
                    FilterValue::Range(_) => None,
                })
                .collect::<Vec<_>>()
        };
        let predicate = match self.kind {
            FilterKind::Exact => Predicate::AnyOf(scalars()),
            FilterKind::Exclude => Predicate::NoneOf(scalars()),
            FilterKind::Range => Predicate::WithinAny(
                self.values
                    .iter()
                    .filter_map(|value| match value {
                        FilterValue::Range(range) => Some(range.clone()),
                        FilterValue::Scalar(_) => None,
                    })
                    .collect(),
            ),
        };
        Condition::new(self.tag(), self.name.clone(), predicate)
    }
}

/// Sort ranges by lower bound and drop any that overlap a range kept
/// before them.
fn disjoint_ranges(name: &str, ranges: Vec<RangeValue>) -> Vec<RangeValue> {
    let mut kept: Vec<RangeValue> = Vec::with_capacity(ranges.len());
    for range in ranges {
        let comparable = kept
            .first()
            .is_none_or(|first| first.low().compare(range.low()).is_some());
        if !comparable {
            debug!("dropping range {range} of mismatched type from filter {name}");
        } else if kept.iter().any(|k| k.overlaps(&range)) {
            debug!("dropping overlapping range {range} from filter {name}");
        } else {
            kept.push(range);
        }
    }
    kept.sort_by(|a, b| {
        a.low()
            .compare(b.low())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    kept
}

/// The ordered set of filters of one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSet {
    specs: Vec<FilterSpec>,
}

impl FilterSet {
    /// Parse every entry of the raw map, silently dropping the unusable ones.
    pub fn from_raw(raw: &RawFilters) -> Self {
        let specs = raw
            .iter()
            .filter_map(|(key, values)| FilterSpec::parse(key, values))
            .collect();
        FilterSet { specs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Look up the filters selected under an exclusion rule name.
    ///
    /// A facet whose rule names a selected filter must not let that filter
    /// narrow its own counts; the returned marker carries the tags of the
    /// conditions to ignore. Blank rules and unselected filters yield `None`.
    pub fn matches_exclusion_rule(&self, rule: Option<&str>) -> Option<ExclusionMarker> {
        let rule = rule.map(str::trim).filter(|r| !r.is_empty())?;
        let tags: Vec<String> = self
            .specs
            .iter()
            .filter(|spec| spec.name == rule)
            .map(FilterSpec::tag)
            .collect();
        if tags.is_empty() {
            None
        } else {
            Some(ExclusionMarker { tags })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawFilters {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_exact_filter() {
        let values = [json!("red"), json!("blue"), json!("red")];
        let spec = FilterSpec::parse("color", &values).unwrap();
        assert_eq!(spec.name(), "color");
        assert_eq!(spec.kind(), FilterKind::Exact);
        assert_eq!(spec.values().len(), 2);
        assert_eq!(
            spec.to_condition().predicate,
            Predicate::AnyOf(vec![Scalar::from("red"), Scalar::from("blue")])
        );
    }

    #[test]
    fn test_exclude_filter() {
        let spec = FilterSpec::parse("-brand", &[json!("acme"), json!([1, 2])]).unwrap();
        assert_eq!(spec.name(), "brand");
        assert_eq!(spec.kind(), FilterKind::Exclude);
        assert_eq!(spec.tag(), "-brand");
        assert_eq!(spec.values().len(), 1);
        assert!(matches!(spec.to_condition().predicate, Predicate::NoneOf(_)));
    }

    #[test]
    fn test_range_filter() {
        let spec = FilterSpec::parse(
            "price",
            &[json!("50..100"), json!([0, 10]), json!("red"), json!([5, 20])],
        )
        .unwrap();
        assert_eq!(spec.kind(), FilterKind::Range);
        let ranges: Vec<String> = spec
            .values()
            .iter()
            .map(|v| match v {
                FilterValue::Range(r) => r.to_string(),
                FilterValue::Scalar(s) => s.to_string(),
            })
            .collect();
        // [5, 20] overlaps [0, 10]; "red" is not a range.
        assert_eq!(ranges, vec!["0..10", "50..100"]);
    }

    #[test]
    fn test_text_with_dots_stays_exact() {
        let spec = FilterSpec::parse("brand", &[json!("Loading...")]).unwrap();
        assert_eq!(spec.kind(), FilterKind::Exact);
        assert_eq!(
            spec.to_condition().predicate,
            Predicate::AnyOf(vec![Scalar::from("Loading...")])
        );

        let spec = FilterSpec::parse("initial", &[json!("a..z")]).unwrap();
        assert_eq!(spec.kind(), FilterKind::Exact);
        assert_eq!(spec.values(), &[FilterValue::Scalar(Scalar::from("a..z"))]);
    }

    #[test]
    fn test_text_pairs_are_not_ranges() {
        assert!(FilterSpec::parse("size", &[json!(["L", "XL"])]).is_none());

        let spec = FilterSpec::parse("size", &[json!(["L", "XL"]), json!("M")]).unwrap();
        assert_eq!(spec.kind(), FilterKind::Exact);
        assert_eq!(spec.values(), &[FilterValue::Scalar(Scalar::from("M"))]);
    }

    #[test]
    fn test_unparseable_filters_dropped() {
        assert!(FilterSpec::parse("color", &[]).is_none());
        assert!(FilterSpec::parse("color", &[json!(null), json!({"x": 1})]).is_none());
        assert!(FilterSpec::parse("-", &[json!("red")]).is_none());
        assert!(FilterSpec::parse("price", &[json!([10, 5])]).is_none());
        assert!(FilterSpec::parse("-price", &[json!("1..5")]).is_none());
    }

    #[test]
    fn test_filter_set_from_raw() {
        let filters = FilterSet::from_raw(&raw(json!({
            "color": ["red"],
            "size": [null],
            "price": [[10, 20]]
        })));
        assert_eq!(filters.len(), 2);
        let names: Vec<&str> = filters.iter().map(FilterSpec::name).collect();
        assert_eq!(names, vec!["color", "price"]);
    }

    #[test]
    fn test_matches_exclusion_rule() {
        let filters = FilterSet::from_raw(&raw(json!({
            "color": ["red"],
            "-color": ["green"],
            "size": ["m"]
        })));

        let marker = filters.matches_exclusion_rule(Some("color")).unwrap();
        assert_eq!(marker.tags, vec!["-color".to_string(), "color".to_string()]);

        assert!(filters.matches_exclusion_rule(Some("brand")).is_none());
        assert!(filters.matches_exclusion_rule(Some("  ")).is_none());
        assert!(filters.matches_exclusion_rule(None).is_none());
    }
}
