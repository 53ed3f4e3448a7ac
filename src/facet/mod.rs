//! Faceted search support: the configured facet catalog, its compilation
//! into facet clauses, and the counts the index returns.

pub mod catalog;
pub mod compiler;
pub mod results;

pub use catalog::{FacetCatalog, FacetDefinition, FacetKind, FacetRow};
pub use compiler::FacetCompiler;
pub use results::{FacetCount, FacetResults};
