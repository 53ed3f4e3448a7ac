//! Facet counts returned by the index alongside the main result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Count of documents for one facet value or row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    /// Field value, or row label for range facets.
    pub value: String,
    /// Number of documents matching this value.
    pub count: u64,
}

impl FacetCount {
    pub fn new<S: Into<String>>(value: S, count: u64) -> Self {
        FacetCount {
            value: value.into(),
            count,
        }
    }
}

/// Facet counts grouped by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetResults {
    pub field_facets: BTreeMap<String, Vec<FacetCount>>,
}

impl FacetResults {
    /// Create empty facet results.
    pub fn empty() -> Self {
        FacetResults {
            field_facets: BTreeMap::new(),
        }
    }

    /// Record the counts of one field. Discrete counts are sorted by count
    /// (descending) then value; pass `sort = false` to keep row order.
    pub fn insert<S: Into<String>>(&mut self, field: S, mut counts: Vec<FacetCount>, sort: bool) {
        if sort {
            counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        }
        self.field_facets.insert(field.into(), counts);
    }

    /// Get facet counts for a specific field.
    pub fn get_field_facets(&self, field_name: &str) -> Option<&Vec<FacetCount>> {
        self.field_facets.get(field_name)
    }

    /// Count for one value of one field, zero when absent.
    pub fn count_of(&self, field_name: &str, value: &str) -> u64 {
        self.get_field_facets(field_name)
            .and_then(|counts| counts.iter().find(|c| c.value == value))
            .map_or(0, |c| c.count)
    }

    /// Get the total number of unique facet values across all fields.
    pub fn total_facet_count(&self) -> usize {
        self.field_facets.values().map(|facets| facets.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_results() {
        let mut results = FacetResults::empty();
        assert_eq!(results.total_facet_count(), 0);

        results.insert(
            "color",
            vec![
                FacetCount::new("blue", 2),
                FacetCount::new("red", 5),
                FacetCount::new("green", 2),
            ],
            true,
        );

        let colors = results.get_field_facets("color").unwrap();
        let values: Vec<&str> = colors.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["red", "blue", "green"]);
        assert_eq!(results.count_of("color", "green"), 2);
        assert_eq!(results.count_of("color", "purple"), 0);
        assert!(results.get_field_facets("nonexistent").is_none());
        assert_eq!(results.total_facet_count(), 3);
    }

    #[test]
    fn test_row_order_kept() {
        let mut results = FacetResults::empty();
        results.insert(
            "price",
            vec![FacetCount::new("0..10", 1), FacetCount::new("11..50", 4)],
            false,
        );
        assert_eq!(results.get_field_facets("price").unwrap()[0].value, "0..10");
    }
}
