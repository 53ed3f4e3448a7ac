//! Compiles the facet catalog into facet clauses on a query plan.

use crate::facet::catalog::{FacetCatalog, FacetDefinition, FacetKind};
use crate::filter::FilterSet;
use crate::query::plan::{FacetClause, QueryPlanBuilder};

/// Emits one facet clause per catalog definition, selected or not, so the
/// caller can always render the full facet panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetCompiler;

impl FacetCompiler {
    /// Clause for a single definition.
    pub fn clause(definition: &FacetDefinition, filters: &FilterSet) -> FacetClause {
        match &definition.kind {
            FacetKind::Range { rows } => FacetClause::Rows {
                field: definition.search_param.clone(),
                rows: rows.clone(),
            },
            FacetKind::Discrete => FacetClause::Field {
                field: definition.search_param.clone(),
                exclude: filters.matches_exclusion_rule(definition.exclusion.as_deref()),
            },
        }
    }

    /// Clauses for the whole catalog, in catalog order.
    pub fn compile(catalog: &FacetCatalog, filters: &FilterSet) -> Vec<FacetClause> {
        catalog
            .iter()
            .map(|definition| Self::clause(definition, filters))
            .collect()
    }

    /// Add the catalog's clauses to a plan under construction.
    pub fn apply(
        catalog: &FacetCatalog,
        filters: &FilterSet,
        builder: QueryPlanBuilder,
    ) -> QueryPlanBuilder {
        Self::compile(catalog, filters)
            .into_iter()
            .fold(builder, QueryPlanBuilder::with_facet)
    }
}
