//! In-memory product store.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::store::ProductStore;
use crate::store::product::Product;
use crate::store::scope::StoreScope;

/// Product store kept in memory, keyed and iterated by id.
///
/// Records come back in id order, never in index relevance order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    products: Arc<RwLock<BTreeMap<i64, Product>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Create a store holding the given products.
    pub fn from_products<I: IntoIterator<Item = Product>>(products: I) -> Self {
        let store = MemoryStore::new();
        for product in products {
            store.insert(product);
        }
        store
    }

    /// Insert or replace a product.
    pub fn insert(&self, product: Product) {
        self.products.write().insert(product.id, product);
    }

    /// Remove a product, returning whether it existed.
    pub fn remove(&self, id: i64) -> bool {
        self.products.write().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

impl ProductStore for MemoryStore {
    fn load(&self, scope: &StoreScope) -> Result<Vec<Product>> {
        if scope.is_match_nothing() {
            return Ok(Vec::new());
        }
        Ok(self
            .products
            .read()
            .values()
            .filter(|product| scope.matches(product))
            .cloned()
            .collect())
    }

    fn find(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.products.read().get(&id).cloned())
    }
}
