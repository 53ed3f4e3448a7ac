//! The catalog record held by the persistent store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::Scalar;

fn default_active() -> bool {
    true
}

/// A product as stored, with the business attributes base scopes filter on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Taxon paths the product is classified under.
    #[serde(default)]
    pub taxons: Vec<String>,
    /// Units in stock.
    #[serde(default)]
    pub on_hand: i64,
    #[serde(default)]
    pub attributes: BTreeMap<String, Scalar>,
}

impl Product {
    /// Create an active product with no stock.
    pub fn new<S: Into<String>>(id: i64, name: S) -> Self {
        Product {
            id,
            name: name.into(),
            active: true,
            taxons: Vec::new(),
            on_hand: 0,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_stock(mut self, on_hand: i64) -> Self {
        self.on_hand = on_hand;
        self
    }

    pub fn with_taxon<S: Into<String>>(mut self, taxon: S) -> Self {
        self.taxons.push(taxon.into());
        self
    }

    pub fn with_attribute<S: Into<String>, V: Into<Scalar>>(mut self, name: S, value: V) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn in_stock(&self) -> bool {
        self.on_hand > 0
    }
}
