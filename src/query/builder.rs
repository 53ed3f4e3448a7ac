//! Builds the query plan for a search request.

use log::debug;

use crate::config::SearchConfig;
use crate::facet::{FacetCatalog, FacetCompiler};
use crate::query::ordering::{Pagination, SortOrder};
use crate::query::plan::{QueryPlan, QueryPlanBuilder};
use crate::request::SearchRequest;

/// Entity type searched when none is configured.
pub const DEFAULT_ENTITY_TYPE: &str = "product";

/// Translates search requests into query plans.
///
/// Holds no per-request state: the same request always yields the same
/// plan.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    entity_type: String,
    config: SearchConfig,
}

impl QueryBuilder {
    pub fn new<S: Into<String>>(entity_type: S, config: SearchConfig) -> Self {
        QueryBuilder {
            entity_type: entity_type.into(),
            config,
        }
    }

    /// Keywords go through verbatim, ordering defaults to relevance,
    /// pagination to the configured page size, and every filter becomes a
    /// tagged condition. Every facet in the catalog gets a clause.
    pub fn build(&self, request: &SearchRequest, catalog: &FacetCatalog) -> QueryPlan {
        let ordering = request
            .order_by
            .clone()
            .unwrap_or_else(SortOrder::relevance);
        let pagination = Pagination::resolve(request.page, request.per_page, &self.config);

        let builder = request.filters.iter().fold(
            QueryPlanBuilder::new(self.entity_type.clone())
                .with_keywords(request.keywords.clone())
                .with_ordering(ordering)
                .with_pagination(pagination),
            |builder, filter| builder.with_condition(filter.to_condition()),
        );
        let plan = FacetCompiler::apply(catalog, &request.filters, builder).build();

        debug!(
            "built plan for {:?}: {} conditions, {} facets, order {} {}, page {}x{}",
            plan.keywords,
            plan.conditions.len(),
            plan.facets.len(),
            plan.ordering.field,
            plan.ordering.direction,
            plan.pagination.page(),
            plan.pagination.per_page()
        );
        plan
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        QueryBuilder::new(DEFAULT_ENTITY_TYPE, SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::facet::FacetDefinition;
    use crate::filter::{Predicate, RawFilters};
    use crate::query::Direction;
    use crate::query::plan::FacetClause;

    fn catalog() -> FacetCatalog {
        FacetCatalog::new(vec![
            FacetDefinition::discrete("color").with_exclusion("color"),
            FacetDefinition::discrete("brand"),
        ])
    }

    fn raw(value: serde_json::Value) -> RawFilters {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults() {
        let plan = QueryBuilder::default().build(&SearchRequest::new("Red  Shirt "), &catalog());
        assert_eq!(plan.entity_type, "product");
        assert_eq!(plan.keywords, "Red  Shirt ");
        assert_eq!(plan.ordering, SortOrder::relevance());
        assert_eq!(plan.pagination, Pagination::new(1, 12));
        assert!(plan.conditions.is_empty());
        assert_eq!(plan.facets.len(), 2);
    }

    #[test]
    fn test_request_values() {
        let request = SearchRequest::new("shirt")
            .with_order_by("price,asc")
            .with_page(3, 5)
            .with_filters(&raw(json!({"color": ["red"], "-brand": ["acme"]})));
        let plan = QueryBuilder::default().build(&request, &catalog());

        assert_eq!(plan.ordering, SortOrder::new("price", Direction::Asc));
        assert_eq!(plan.pagination, Pagination::new(3, 5));
        assert_eq!(plan.conditions.len(), 2);
        assert!(matches!(plan.conditions[0].predicate, Predicate::NoneOf(_)));
        assert!(matches!(plan.conditions[1].predicate, Predicate::AnyOf(_)));
        assert!(matches!(
            &plan.facets[0],
            FacetClause::Field { exclude: Some(_), .. }
        ));
    }

    #[test]
    fn test_configured_page_size() {
        let config = SearchConfig {
            products_per_page: 30,
            ..SearchConfig::default()
        };
        let mut request = SearchRequest::new("");
        request.per_page = Some(0);
        let plan = QueryBuilder::new("variant", config).build(&request, &catalog());
        assert_eq!(plan.entity_type, "variant");
        assert_eq!(plan.pagination.per_page(), 30);
    }

    #[test]
    fn test_build_is_idempotent() {
        let request = SearchRequest::new("shirt")
            .with_filters(&raw(json!({"color": ["red", "blue"], "price": [[0, 10]]})));
        let builder = QueryBuilder::default();
        assert_eq!(
            builder.build(&request, &catalog()),
            builder.build(&request, &catalog())
        );
    }
}
