//! Faceted catalog search: query execution and result reconciliation.

pub mod engine;
pub mod reconcile;

pub use engine::{CatalogSearch, SearchOutcome};
pub use reconcile::{ReconciledPage, order_by_hits, restrict_to_hits};
