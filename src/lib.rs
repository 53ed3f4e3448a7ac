//! # catalog-search
//!
//! Faceted product search for a storefront, split between a full-text
//! search index and the persistent product store.
//!
//! ## Features
//!
//! - Fail-soft parsing of raw request filters into typed conditions
//! - Facet panel declared in settings, with per-facet exclusion of its own filter
//! - Query plans that are plain data and can be inspected before execution
//! - Reconciliation of index hits with store records, preserving index order
//! - "Find similar items" with over-fetching and store-side business filters
//! - In-memory index and store for tests and the CLI
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use catalog_search::config::{Settings, SettingsHandle};
//! use catalog_search::index::{IndexDocument, MemoryIndex};
//! use catalog_search::request::SearchRequest;
//! use catalog_search::search::CatalogSearch;
//! use catalog_search::store::{MemoryStore, Product};
//!
//! let index = MemoryIndex::from_documents(
//!     "product",
//!     vec![IndexDocument::new(1).field("name", "Red Shirt")],
//! );
//! let store = MemoryStore::from_products(vec![Product::new(1, "Red Shirt").with_stock(2)]);
//! let search = CatalogSearch::new(
//!     SettingsHandle::new(Settings::default()),
//!     Arc::new(index),
//!     Arc::new(store),
//! );
//!
//! let outcome = search.search(&SearchRequest::new("shirt")).unwrap();
//! assert_eq!(outcome.page.ids(), vec![1]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod facet;
pub mod filter;
pub mod index;
pub mod query;
pub mod request;
pub mod search;
pub mod similar;
pub mod store;

pub mod prelude {
    pub use crate::config::{SearchConfig, Settings, SettingsHandle};
    pub use crate::error::{CatalogSearchError, Result};
    pub use crate::facet::{FacetCatalog, FacetDefinition, FacetResults};
    pub use crate::index::{SearchIndex, SearchResult};
    pub use crate::query::{QueryBuilder, QueryPlan};
    pub use crate::request::{RawSearchParams, SearchRequest};
    pub use crate::search::{CatalogSearch, SearchOutcome};
    pub use crate::store::{Product, ProductStore, StoreScope};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
