//! "Find similar items": neighbors from the index, filtered by the store,
//! ranked by neighbor order.

use std::sync::Arc;

use log::debug;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::{NeighborQuery, SearchIndex};
use crate::query::{DEFAULT_ENTITY_TYPE, Pagination};
use crate::request::SimilarityRequest;
use crate::search::reconcile::{order_by_hits, restrict_to_hits};
use crate::store::{Product, ProductStore, StoreScope};

/// Neighbors requested per wanted result, so enough survive store-side
/// business filtering.
pub const OVERFETCH_FACTOR: usize = 4;

/// Ranks similar products for a reference product.
#[derive(Clone)]
pub struct SimilarityEngine {
    entity_type: String,
    config: SearchConfig,
    index: Arc<dyn SearchIndex>,
    store: Arc<dyn ProductStore>,
}

impl SimilarityEngine {
    pub fn new(
        config: SearchConfig,
        index: Arc<dyn SearchIndex>,
        store: Arc<dyn ProductStore>,
    ) -> Self {
        SimilarityEngine {
            entity_type: DEFAULT_ENTITY_TYPE.to_string(),
            config,
            index,
            store,
        }
    }

    pub fn with_entity_type<S: Into<String>>(mut self, entity_type: S) -> Self {
        self.entity_type = entity_type.into();
        self
    }

    /// Active products, in stock unless zero-stock display is enabled.
    /// No taxonomy or index restriction.
    pub fn base_scope(&self) -> StoreScope {
        let scope = StoreScope::new().active();
        if self.config.show_zero_stock_products {
            scope
        } else {
            scope.on_hand()
        }
    }

    /// The neighbor query for a request: one page of
    /// `max_candidates * OVERFETCH_FACTOR` candidates.
    pub fn neighbor_query(&self, request: &SimilarityRequest) -> NeighborQuery {
        let overfetch = request.max_candidates.max(1).saturating_mul(OVERFETCH_FACTOR);
        NeighborQuery {
            entity_type: self.entity_type.clone(),
            reference_id: request.reference.id,
            fields: request.field_names.clone(),
            pagination: Pagination::new(1, overfetch),
        }
    }

    /// Up to `max_candidates` products, most similar first.
    ///
    /// Candidates are restricted by the base scope, re-ranked by their
    /// position in the neighbor list and only then trimmed.
    pub fn find_similar(&self, request: &SimilarityRequest) -> Result<Vec<Product>> {
        let query = self.neighbor_query(request);
        let neighbors = self.index.more_like_this(&query)?;

        let scope = restrict_to_hits(self.base_scope(), &neighbors);
        let records = self.store.load(&scope)?;
        let mut ranked = order_by_hits(records, &neighbors.ordered_ids);

        debug!(
            "similar to {}: {} neighbors, {} survive the base scope, keeping {}",
            request.reference.id,
            neighbors.ordered_ids.len(),
            ranked.len(),
            request.max_candidates
        );
        ranked.truncate(request.max_candidates);
        Ok(ranked)
    }
}
