//! Hierarchical taxon paths (e.g. `Clothing/Shirts/Polos`).

use serde::{Deserialize, Serialize};

/// Delimiter between taxon path components.
pub const TAXON_DELIMITER: &str = "/";

/// A taxon path split into its components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonPath {
    path: Vec<String>,
}

impl TaxonPath {
    /// Create a taxon path from a delimited string. Blank components are
    /// skipped, so `"/Clothing//Shirts/"` equals `"Clothing/Shirts"`.
    pub fn parse(path_str: &str) -> Self {
        let path = path_str
            .split(TAXON_DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        TaxonPath { path }
    }

    /// Get the depth of this path.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Check if this path is a strict ancestor of another path.
    pub fn is_parent_of(&self, other: &TaxonPath) -> bool {
        if self.depth() >= other.depth() {
            return false;
        }
        self.path.iter().zip(other.path.iter()).all(|(a, b)| a == b)
    }

    /// Whether a product classified under `other` belongs to this taxon.
    pub fn covers(&self, other: &TaxonPath) -> bool {
        self.depth() > 0 && (self == other || self.is_parent_of(other))
    }

    /// Get the parent path (one level up).
    pub fn parent(&self) -> Option<TaxonPath> {
        if self.path.len() > 1 {
            let mut parent_path = self.path.clone();
            parent_path.pop();
            Some(TaxonPath { path: parent_path })
        } else {
            None
        }
    }

    /// Convert to a string representation.
    pub fn to_delimited(&self) -> String {
        self.path.join(TAXON_DELIMITER)
    }
}
