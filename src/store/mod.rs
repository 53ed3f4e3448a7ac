//! Persistent record store seam.
//!
//! The store is authoritative for product records and business rules
//! (active, stock, taxonomy). Searches narrow it through a [`StoreScope`]
//! built in a fixed order by the search executor.

pub mod memory;
pub mod product;
pub mod registry;
pub mod scope;
pub mod taxon;

pub use memory::MemoryStore;
pub use product::Product;
pub use registry::{ExtraScope, ScopeFn, ScopeRegistry};
pub use scope::{ScopePredicate, StoreScope};
pub use taxon::TaxonPath;

use crate::error::Result;

/// Access to stored products.
pub trait ProductStore: Send + Sync {
    /// Load every product matching the scope, in the store's own order.
    fn load(&self, scope: &StoreScope) -> Result<Vec<Product>>;

    /// Look up one product by id.
    fn find(&self, id: i64) -> Result<Option<Product>>;
}
