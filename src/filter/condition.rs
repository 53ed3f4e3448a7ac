//! Index-side encoding of filters.

use serde::Serialize;

use crate::filter::value::{RangeValue, Scalar};

/// What a condition requires of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "op", content = "values")]
pub enum Predicate {
    /// Field must equal at least one of the values.
    AnyOf(Vec<Scalar>),
    /// Field must equal none of the values.
    NoneOf(Vec<Scalar>),
    /// Field must fall inside at least one of the ranges.
    WithinAny(Vec<RangeValue>),
}

impl Predicate {
    /// Evaluate the predicate against the (possibly multi-valued) field.
    pub fn matches(&self, field_values: &[Scalar]) -> bool {
        match self {
            Predicate::AnyOf(wanted) => field_values
                .iter()
                .any(|v| wanted.iter().any(|w| w.matches(v))),
            Predicate::NoneOf(unwanted) => !field_values
                .iter()
                .any(|v| unwanted.iter().any(|u| u.matches(v))),
            Predicate::WithinAny(ranges) => field_values
                .iter()
                .any(|v| ranges.iter().any(|r| r.contains(v))),
        }
    }
}

/// A filter condition on one index field.
///
/// The tag names the request filter the condition came from. Facet
/// exclusion markers refer to conditions by tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub tag: String,
    pub field: String,
    pub predicate: Predicate,
}

impl Condition {
    pub fn new<T: Into<String>, F: Into<String>>(tag: T, field: F, predicate: Predicate) -> Self {
        Condition {
            tag: tag.into(),
            field: field.into(),
            predicate,
        }
    }
}

/// Names the conditions a discrete facet should ignore when counting, so
/// that selecting a value does not hide its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionMarker {
    pub tags: Vec<String>,
}

impl ExclusionMarker {
    pub fn excludes(&self, condition: &Condition) -> bool {
        self.tags.iter().any(|tag| *tag == condition.tag)
    }
}
