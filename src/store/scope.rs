//! Composable store-side query scopes.

use serde::Serialize;

use crate::filter::{RangeValue, Scalar};
use crate::store::product::Product;
use crate::store::taxon::TaxonPath;

/// One business constraint on stored products.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "args")]
pub enum ScopePredicate {
    /// Only active products.
    Active,
    /// Products under the taxon or any of its descendants.
    InTaxon(String),
    /// Only products with stock on hand.
    OnHand,
    /// Products whose id is in the set.
    IdIn(Vec<i64>),
    /// Sentinel matching nothing at all.
    NoMatch,
    AttributeEquals { field: String, value: Scalar },
    AttributeWithin { field: String, range: RangeValue },
    NameContains(String),
}

impl ScopePredicate {
    /// Evaluate against one product.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ScopePredicate::Active => product.active,
            ScopePredicate::InTaxon(taxon) => {
                let taxon = TaxonPath::parse(taxon);
                product
                    .taxons
                    .iter()
                    .any(|t| taxon.covers(&TaxonPath::parse(t)))
            }
            ScopePredicate::OnHand => product.in_stock(),
            ScopePredicate::IdIn(ids) => ids.contains(&product.id),
            ScopePredicate::NoMatch => false,
            ScopePredicate::AttributeEquals { field, value } => product
                .attributes
                .get(field)
                .is_some_and(|v| value.matches(v)),
            ScopePredicate::AttributeWithin { field, range } => product
                .attributes
                .get(field)
                .is_some_and(|v| range.contains(v)),
            ScopePredicate::NameContains(text) => product
                .name
                .to_lowercase()
                .contains(&text.to_lowercase()),
        }
    }
}

/// A base scope: an ordered conjunction of predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreScope {
    predicates: Vec<ScopePredicate>,
}

impl StoreScope {
    /// The unrestricted scope.
    pub fn new() -> Self {
        StoreScope::default()
    }

    pub fn with(mut self, predicate: ScopePredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn active(self) -> Self {
        self.with(ScopePredicate::Active)
    }

    pub fn in_taxon<S: Into<String>>(self, taxon: S) -> Self {
        self.with(ScopePredicate::InTaxon(taxon.into()))
    }

    pub fn on_hand(self) -> Self {
        self.with(ScopePredicate::OnHand)
    }

    pub fn id_in(self, ids: Vec<i64>) -> Self {
        self.with(ScopePredicate::IdIn(ids))
    }

    pub fn match_nothing(self) -> Self {
        self.with(ScopePredicate::NoMatch)
    }

    pub fn predicates(&self) -> &[ScopePredicate] {
        &self.predicates
    }

    /// True when the sentinel is present; stores may skip the query.
    pub fn is_match_nothing(&self) -> bool {
        self.predicates.contains(&ScopePredicate::NoMatch)
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.predicates.iter().all(|p| p.matches(product))
    }
}
