//! Search executor: runs the plan against the index and reconciles the hits
//! with the store.

use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::config::{SearchConfig, SettingsHandle};
use crate::error::Result;
use crate::facet::FacetResults;
use crate::index::{SearchIndex, SearchResult};
use crate::query::{DEFAULT_ENTITY_TYPE, QueryBuilder, QueryPlan};
use crate::request::{SearchRequest, SimilarityRequest, resolve_similar_count};
use crate::search::reconcile::{ReconciledPage, order_by_hits, restrict_to_hits};
use crate::similar::SimilarityEngine;
use crate::store::{Product, ProductStore, ScopeRegistry, StoreScope};

/// Result of one search: the reconciled page and the facet panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub page: ReconciledPage,
    pub facets: FacetResults,
}

/// Faceted catalog search over an index and a product store.
pub struct CatalogSearch {
    entity_type: String,
    settings: SettingsHandle,
    index: Arc<dyn SearchIndex>,
    store: Arc<dyn ProductStore>,
    registry: ScopeRegistry,
}

impl CatalogSearch {
    /// Create a search over the given collaborators with the built-in
    /// extra scopes.
    pub fn new(
        settings: SettingsHandle,
        index: Arc<dyn SearchIndex>,
        store: Arc<dyn ProductStore>,
    ) -> Self {
        CatalogSearch {
            entity_type: DEFAULT_ENTITY_TYPE.to_string(),
            settings,
            index,
            store,
            registry: ScopeRegistry::with_defaults(),
        }
    }

    pub fn with_registry(mut self, registry: ScopeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_entity_type<S: Into<String>>(mut self, entity_type: S) -> Self {
        self.entity_type = entity_type.into();
        self
    }

    pub fn settings(&self) -> &SettingsHandle {
        &self.settings
    }

    /// The plan a request compiles to under the current settings.
    pub fn plan(&self, request: &SearchRequest) -> QueryPlan {
        let settings = self.settings.snapshot();
        QueryBuilder::new(self.entity_type.clone(), settings.config.clone())
            .build(request, &settings.facets)
    }

    /// Run a search.
    ///
    /// The base scope is composed in a fixed order: active, taxon, index
    /// hits (or the no-match sentinel), stock, then the request's extra
    /// scopes. Records come back in index order; the total is the index's.
    /// Index transport failures propagate; zero hits yield an empty page.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let settings = self.settings.snapshot();
        let plan = QueryBuilder::new(self.entity_type.clone(), settings.config.clone())
            .build(request, &settings.facets);

        let result = self.index.execute(&plan)?;
        let scope = self.base_scope(&settings.config, request, &result)?;
        let records = self.store.load(&scope)?;
        let items = order_by_hits(records, &result.ordered_ids);

        if items.len() < result.ordered_ids.len() {
            debug!(
                "store kept {} of {} indexed ids for {:?}",
                items.len(),
                result.ordered_ids.len(),
                plan.keywords
            );
        }

        let total = if result.is_empty() { 0 } else { result.total };
        Ok(SearchOutcome {
            page: ReconciledPage::new(items, total, plan.pagination),
            facets: result.facets,
        })
    }

    fn base_scope(
        &self,
        config: &SearchConfig,
        request: &SearchRequest,
        result: &SearchResult,
    ) -> Result<StoreScope> {
        let mut scope = StoreScope::new().active();
        if let Some(taxon) = &request.taxon {
            scope = scope.in_taxon(taxon.clone());
        }
        scope = restrict_to_hits(scope, result);
        if !config.show_zero_stock_products {
            scope = scope.on_hand();
        }
        self.registry.apply_all(scope, &request.scopes)
    }

    /// Similarity engine bound to the current settings.
    pub fn similarity(&self) -> SimilarityEngine {
        self.similarity_with(self.settings.snapshot().config.clone())
    }

    fn similarity_with(&self, config: SearchConfig) -> SimilarityEngine {
        SimilarityEngine::new(config, Arc::clone(&self.index), Arc::clone(&self.store))
            .with_entity_type(self.entity_type.clone())
    }

    /// Products similar to `reference` on the given fields. `count` falls
    /// back to the configured number when absent or non-positive.
    pub fn similar_products<S: AsRef<str>>(
        &self,
        reference: &Product,
        field_names: &[S],
        count: Option<i64>,
    ) -> Result<Vec<Product>> {
        let config = self.settings.snapshot().config.clone();
        let max_candidates = resolve_similar_count(count, &config);
        self.find_similar(config, reference, field_names, max_candidates)
    }

    /// Products similar to `reference`, as many as the request's
    /// `total_similar_items` asks for.
    pub fn similar_products_for<S: AsRef<str>>(
        &self,
        request: &SearchRequest,
        reference: &Product,
        field_names: &[S],
    ) -> Result<Vec<Product>> {
        let config = self.settings.snapshot().config.clone();
        let max_candidates = request.similar_count(&config);
        self.find_similar(config, reference, field_names, max_candidates)
    }

    /// Count and engine both come from the one `config` snapshot.
    fn find_similar<S: AsRef<str>>(
        &self,
        config: SearchConfig,
        reference: &Product,
        field_names: &[S],
        max_candidates: usize,
    ) -> Result<Vec<Product>> {
        let request = SimilarityRequest::new(
            reference.clone(),
            field_names.iter().map(|f| f.as_ref().to_string()),
            &config,
        )
        .with_max_candidates(max_candidates);
        self.similarity_with(config).find_similar(&request)
    }
}
