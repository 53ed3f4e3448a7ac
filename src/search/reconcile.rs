//! Reconciliation of index ids with store records.

use ahash::AHashMap;
use serde::Serialize;

use crate::index::SearchResult;
use crate::query::Pagination;
use crate::store::{Product, StoreScope};

/// Narrow a base scope to the index hits.
///
/// When the index found nothing the sentinel no-match filter is added, so
/// an empty search can never fall through to the unfiltered catalog.
pub fn restrict_to_hits(scope: StoreScope, result: &SearchResult) -> StoreScope {
    if result.is_empty() {
        scope.match_nothing()
    } else {
        scope.id_in(result.ordered_ids.clone())
    }
}

/// Re-sort store records by the position of their id in `ordered_ids`.
///
/// Records whose id is not listed are dropped. Listed ids without a record
/// simply leave no entry. The first occurrence of a repeated id decides its
/// position.
pub fn order_by_hits(records: Vec<Product>, ordered_ids: &[i64]) -> Vec<Product> {
    let mut positions: AHashMap<i64, usize> = AHashMap::with_capacity(ordered_ids.len());
    for (position, id) in ordered_ids.iter().enumerate() {
        positions.entry(*id).or_insert(position);
    }

    let mut ranked: Vec<(usize, Product)> = records
        .into_iter()
        .filter_map(|record| positions.get(&record.id).map(|p| (*p, record)))
        .collect();
    ranked.sort_by_key(|(position, _)| *position);
    ranked.into_iter().map(|(_, record)| record).collect()
}

/// One page of reconciled records.
///
/// `total` is the index's hit count, which can exceed what the store still
/// holds when the index is stale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledPage {
    pub items: Vec<Product>,
    pub total: u64,
    pub page: usize,
    pub per_page: usize,
}

impl ReconciledPage {
    pub fn new(items: Vec<Product>, total: u64, pagination: Pagination) -> Self {
        ReconciledPage {
            items,
            total,
            page: pagination.page(),
            per_page: pagination.per_page(),
        }
    }

    /// An empty page with total zero.
    pub fn empty(pagination: Pagination) -> Self {
        ReconciledPage::new(Vec::new(), 0, pagination)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids of the items, in page order.
    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|p| p.id).collect()
    }

    /// Number of pages implied by the total.
    pub fn total_pages(&self) -> u64 {
        let per_page = self.per_page.max(1) as u64;
        self.total.div_ceil(per_page)
    }

    /// Number of results before this page.
    pub fn offset(&self) -> usize {
        Pagination::new(self.page, self.per_page).offset()
    }
}
