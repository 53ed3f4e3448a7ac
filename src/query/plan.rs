//! The query plan handed to the search index, and its builder.

use serde::Serialize;

use crate::facet::FacetRow;
use crate::filter::{Condition, ExclusionMarker};
use crate::query::ordering::{Pagination, SortOrder};

/// Facet metadata requested alongside the main result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetClause {
    /// Count distinct values of a field, ignoring the conditions named by
    /// the exclusion marker.
    Field {
        field: String,
        exclude: Option<ExclusionMarker>,
    },
    /// Count documents inside each row's range. Rows are mutually
    /// exclusive buckets.
    Rows { field: String, rows: Vec<FacetRow> },
}

impl FacetClause {
    pub fn field(&self) -> &str {
        match self {
            FacetClause::Field { field, .. } | FacetClause::Rows { field, .. } => field,
        }
    }
}

/// Everything the index needs to run one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    pub entity_type: String,
    /// Keyword text, passed through untouched; the index does its own
    /// analysis.
    pub keywords: String,
    pub ordering: SortOrder,
    pub pagination: Pagination,
    pub conditions: Vec<Condition>,
    pub facets: Vec<FacetClause>,
}

impl QueryPlan {
    /// Conditions that still apply when counting the given facet.
    pub fn conditions_for<'a>(
        &'a self,
        exclude: Option<&'a ExclusionMarker>,
    ) -> impl Iterator<Item = &'a Condition> + 'a {
        self.conditions
            .iter()
            .filter(move |c| exclude.is_none_or(|marker| !marker.excludes(c)))
    }
}

/// Staged builder for [`QueryPlan`]. Each call consumes and returns the
/// builder, so no plan state outlives a single construction.
#[derive(Debug, Clone)]
pub struct QueryPlanBuilder {
    plan: QueryPlan,
}

impl QueryPlanBuilder {
    pub fn new<S: Into<String>>(entity_type: S) -> Self {
        QueryPlanBuilder {
            plan: QueryPlan {
                entity_type: entity_type.into(),
                keywords: String::new(),
                ordering: SortOrder::relevance(),
                pagination: Pagination::new(1, 1),
                conditions: Vec::new(),
                facets: Vec::new(),
            },
        }
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: S) -> Self {
        self.plan.keywords = keywords.into();
        self
    }

    pub fn with_ordering(mut self, ordering: SortOrder) -> Self {
        self.plan.ordering = ordering;
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.plan.pagination = pagination;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.plan.conditions.push(condition);
        self
    }

    pub fn with_facet(mut self, facet: FacetClause) -> Self {
        self.plan.facets.push(facet);
        self
    }

    pub fn build(self) -> QueryPlan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Predicate, Scalar};
    use crate::query::ordering::Direction;

    #[test]
    fn test_builder_stages() {
        let plan = QueryPlanBuilder::new("product")
            .with_keywords("red shirt")
            .with_ordering(SortOrder::new("price", Direction::Asc))
            .with_pagination(Pagination::new(2, 20))
            .with_condition(Condition::new(
                "color",
                "color",
                Predicate::AnyOf(vec![Scalar::from("red")]),
            ))
            .with_facet(FacetClause::Field {
                field: "color".to_string(),
                exclude: None,
            })
            .build();

        assert_eq!(plan.entity_type, "product");
        assert_eq!(plan.keywords, "red shirt");
        assert_eq!(plan.ordering.field, "price");
        assert_eq!(plan.pagination.page(), 2);
        assert_eq!(plan.conditions.len(), 1);
        assert_eq!(plan.facets[0].field(), "color");
    }

    #[test]
    fn test_conditions_for_respects_exclusion() {
        let plan = QueryPlanBuilder::new("product")
            .with_condition(Condition::new("color", "color", Predicate::AnyOf(vec![])))
            .with_condition(Condition::new("size", "size", Predicate::AnyOf(vec![])))
            .build();

        let marker = ExclusionMarker {
            tags: vec!["color".to_string()],
        };
        let remaining: Vec<&str> = plan
            .conditions_for(Some(&marker))
            .map(|c| c.tag.as_str())
            .collect();
        assert_eq!(remaining, vec!["size"]);
        assert_eq!(plan.conditions_for(None).count(), 2);
    }
}
