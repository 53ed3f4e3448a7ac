//! Process-wide search configuration.
//!
//! Defaults are resolved once, when [`Settings`] are loaded. Requests only
//! ever see an immutable snapshot; a reload installs a whole new snapshot
//! through [`SettingsHandle::install`] instead of mutating the current one.

use std::path::Path;
use std::sync::Arc;

use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::facet::FacetCatalog;

/// Configuration flags consumed by the query builder and the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Keep out-of-stock products in results.
    pub show_zero_stock_products: bool,
    /// Page size used when a request supplies none.
    pub products_per_page: usize,
    /// Number of similar products returned when a request supplies none.
    pub total_similar_products: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            show_zero_stock_products: false,
            products_per_page: 12,
            total_similar_products: 10,
        }
    }
}

impl SearchConfig {
    /// Coerce zero counts to one so later arithmetic never sees them.
    pub fn normalized(mut self) -> Self {
        self.products_per_page = self.products_per_page.max(1);
        self.total_similar_products = self.total_similar_products.max(1);
        self
    }
}

/// Everything a request reads from process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub config: SearchConfig,
    pub facets: FacetCatalog,
}

impl Settings {
    pub fn new(config: SearchConfig, facets: FacetCatalog) -> Self {
        Settings {
            config: config.normalized(),
            facets,
        }
    }

    /// Parse settings from JSON (`{"config": {...}, "facets": [...]}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.facets.validate()?;
        Ok(Settings::new(settings.config, settings.facets))
    }

    /// Load settings from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Shared handle to the current settings snapshot.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    current: Arc<RwLock<Arc<Settings>>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        SettingsHandle {
            current: Arc::new(RwLock::new(Arc::new(settings))),
        }
    }

    /// The snapshot to use for one request.
    pub fn snapshot(&self) -> Arc<Settings> {
        Arc::clone(&self.current.read())
    }

    /// Replace the snapshot. Requests already holding the old one finish
    /// with it.
    pub fn install(&self, settings: Settings) {
        info!(
            "installing settings snapshot with {} facet definitions",
            settings.facets.len()
        );
        *self.current.write() = Arc::new(settings);
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
