//! Search index seam.
//!
//! The index ranks and counts; it knows identifiers, not records. Results
//! carry ids in relevance (or requested) order, the total number of hits,
//! and facet counts.

pub mod memory;

pub use memory::{IndexDocument, MemoryIndex};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::facet::FacetResults;
use crate::query::{Pagination, QueryPlan};

/// Answer to one executed query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Ids of the requested page, in index order.
    pub ordered_ids: Vec<i64>,
    /// Hits across all pages.
    pub total: u64,
    #[serde(default)]
    pub facets: FacetResults,
}

impl SearchResult {
    pub fn new(ordered_ids: Vec<i64>, total: u64) -> Self {
        SearchResult {
            ordered_ids,
            total,
            facets: FacetResults::empty(),
        }
    }

    /// No hits at all.
    pub fn empty() -> Self {
        SearchResult::default()
    }

    pub fn with_facets(mut self, facets: FacetResults) -> Self {
        self.facets = facets;
        self
    }

    /// True when the index found nothing.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// "More like this" query for a reference item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborQuery {
    pub entity_type: String,
    pub reference_id: i64,
    /// Fields whose terms define similarity.
    pub fields: Vec<String>,
    pub pagination: Pagination,
}

/// Client for the external search index.
///
/// Implementations must keep relevance order in `ordered_ids` and report
/// transport or protocol failure as
/// [`CatalogSearchError::IndexUnavailable`](crate::error::CatalogSearchError::IndexUnavailable),
/// never as an empty result.
pub trait SearchIndex: Send + Sync {
    /// Run a query plan.
    fn execute(&self, plan: &QueryPlan) -> Result<SearchResult>;

    /// Find neighbors of a reference item.
    fn more_like_this(&self, query: &NeighborQuery) -> Result<SearchResult>;
}
