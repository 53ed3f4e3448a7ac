//! Search and similarity requests.
//!
//! [`RawSearchParams`] mirrors the wire shape of a search call. It is turned
//! into a [`SearchRequest`] without ever failing: malformed filters and
//! ordering tokens are dropped or defaulted. Page, page size and similar
//! count stay optional here and are resolved against the configuration when
//! the query plan is built.

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::filter::{FilterSet, RawFilters, Scalar};
use crate::query::SortOrder;
use crate::store::{ExtraScope, Product};

/// Search call parameters as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSearchParams {
    pub keywords: Option<String>,
    pub taxon: Option<String>,
    #[serde(alias = "s")]
    pub filters: RawFilters,
    /// `"field,direction"`.
    pub order_by: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total_similar_items: Option<i64>,
    pub scopes: Vec<ExtraScope>,
}

/// One search, parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub keywords: String,
    pub taxon: Option<String>,
    pub filters: FilterSet,
    pub order_by: Option<SortOrder>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total_similar_items: Option<i64>,
    pub scopes: Vec<ExtraScope>,
}

impl SearchRequest {
    /// A keyword search with everything else defaulted.
    pub fn new<S: Into<String>>(keywords: S) -> Self {
        SearchRequest {
            keywords: keywords.into(),
            ..SearchRequest::default()
        }
    }

    /// Parse raw parameters.
    pub fn from_params(params: &RawSearchParams) -> Self {
        SearchRequest {
            keywords: params.keywords.clone().unwrap_or_default(),
            taxon: params
                .taxon
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            filters: FilterSet::from_raw(&params.filters),
            order_by: params
                .order_by
                .as_deref()
                .filter(|o| !o.trim().is_empty())
                .map(SortOrder::parse),
            page: params.page,
            per_page: params.per_page,
            total_similar_items: params.total_similar_items,
            scopes: params.scopes.clone(),
        }
    }

    pub fn with_filters(mut self, raw: &RawFilters) -> Self {
        self.filters = FilterSet::from_raw(raw);
        self
    }

    pub fn with_taxon<S: Into<String>>(mut self, taxon: S) -> Self {
        self.taxon = Some(taxon.into());
        self
    }

    pub fn with_order_by(mut self, order_by: &str) -> Self {
        self.order_by = Some(SortOrder::parse(order_by));
        self
    }

    pub fn with_page(mut self, page: i64, per_page: i64) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    pub fn with_scope<S: Into<String>>(mut self, name: S, args: Vec<Scalar>) -> Self {
        self.scopes.push(ExtraScope::new(name, args));
        self
    }

    /// Number of similar products to return: the request's value when
    /// positive, the configured default otherwise.
    pub fn similar_count(&self, config: &SearchConfig) -> usize {
        resolve_similar_count(self.total_similar_items, config)
    }
}

impl From<&RawSearchParams> for SearchRequest {
    fn from(params: &RawSearchParams) -> Self {
        SearchRequest::from_params(params)
    }
}

/// Resolve a requested similar-items count against the configured default.
pub fn resolve_similar_count(requested: Option<i64>, config: &SearchConfig) -> usize {
    requested
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(config.total_similar_products)
        .max(1)
}

/// "More like this" request for a reference product.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityRequest {
    pub reference: Product,
    pub field_names: Vec<String>,
    pub max_candidates: usize,
}

impl SimilarityRequest {
    /// Create a request returning the configured number of products.
    pub fn new<I, S>(reference: Product, field_names: I, config: &SearchConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SimilarityRequest {
            reference,
            field_names: field_names.into_iter().map(Into::into).collect(),
            max_candidates: config.total_similar_products.max(1),
        }
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.max(1);
        self
    }
}
