//! In-memory search index.
//!
//! A small, complete stand-in for an external full-text/facet engine:
//! keyword scoring over text fields, tagged filter conditions, ordering,
//! pagination, facet counts with exclusions and range rows, and
//! "more like this" by shared terms.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{CatalogSearchError, Result};
use crate::facet::{FacetCount, FacetResults};
use crate::filter::Scalar;
use crate::index::{NeighborQuery, SearchIndex, SearchResult};
use crate::query::{Direction, FacetClause, Pagination, QueryPlan};

/// An indexed document: an id and multi-valued fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: i64,
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<Scalar>>,
}

impl IndexDocument {
    pub fn new(id: i64) -> Self {
        IndexDocument {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Append a value to a field.
    pub fn field<S: Into<String>, V: Into<Scalar>>(mut self, name: S, value: V) -> Self {
        self.fields.entry(name.into()).or_default().push(value.into());
        self
    }

    /// Values of a field, empty when the field is absent.
    pub fn values(&self, name: &str) -> &[Scalar] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Lowercased terms of the given fields (all fields when `None`).
    /// Text values are split into words; other scalars count as one term.
    fn terms<'a>(&'a self, fields: Option<&'a [String]>) -> impl Iterator<Item = String> + 'a {
        self.fields
            .iter()
            .filter(move |(name, _)| fields.is_none_or(|wanted| wanted.contains(*name)))
            .flat_map(|(_, values)| values.iter())
            .flat_map(|value| match value {
                Scalar::Text(text) => tokenize(text),
                other => vec![other.to_string().to_lowercase()],
            })
    }
}

/// Split text into lowercased words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// Search index held in memory.
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    entity_type: String,
    documents: Arc<RwLock<BTreeMap<i64, IndexDocument>>>,
}

impl MemoryIndex {
    /// Create an empty index for one entity type.
    pub fn new<S: Into<String>>(entity_type: S) -> Self {
        MemoryIndex {
            entity_type: entity_type.into(),
            documents: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create an index holding the given documents.
    pub fn from_documents<S, I>(entity_type: S, documents: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = IndexDocument>,
    {
        let index = MemoryIndex::new(entity_type);
        for document in documents {
            index.add_document(document);
        }
        index
    }

    /// Add or replace a document.
    pub fn add_document(&self, document: IndexDocument) {
        self.documents.write().insert(document.id, document);
    }

    /// Remove a document, returning whether it existed.
    pub fn remove_document(&self, id: i64) -> bool {
        self.documents.write().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    fn check_entity_type(&self, entity_type: &str) -> Result<()> {
        if entity_type == self.entity_type {
            Ok(())
        } else {
            Err(CatalogSearchError::index(format!(
                "no index for entity type {entity_type:?} (this index holds {:?})",
                self.entity_type
            )))
        }
    }

    /// Keyword score: occurrences of query terms in text fields. Blank
    /// keywords match everything with score zero.
    fn keyword_score(document: &IndexDocument, query_terms: &[String]) -> Option<f32> {
        if query_terms.is_empty() {
            return Some(0.0);
        }
        let score = document
            .terms(None)
            .filter(|term| query_terms.contains(term))
            .count();
        (score > 0).then_some(score as f32)
    }

    fn compare_by_field(
        a: &IndexDocument,
        b: &IndexDocument,
        field: &str,
        direction: Direction,
    ) -> Ordering {
        // Documents without the field sort last in both directions.
        match (a.values(field).first(), b.values(field).first()) {
            (Some(x), Some(y)) => {
                let ordering = x.compare(y).unwrap_or(Ordering::Equal);
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn page_of(ids: Vec<i64>, pagination: Pagination) -> Vec<i64> {
        ids.into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page())
            .collect()
    }

    fn count_facet(
        plan: &QueryPlan,
        clause: &FacetClause,
        matched: &[(&IndexDocument, f32)],
        facets: &mut FacetResults,
    ) {
        match clause {
            FacetClause::Field { field, exclude } => {
                let mut counts: AHashMap<String, u64> = AHashMap::new();
                for (document, _) in matched {
                    let passes = plan
                        .conditions_for(exclude.as_ref())
                        .all(|c| c.predicate.matches(document.values(&c.field)));
                    if !passes {
                        continue;
                    }
                    let distinct: AHashSet<String> = document
                        .values(field)
                        .iter()
                        .map(|v| v.to_string())
                        .collect();
                    for value in distinct {
                        *counts.entry(value).or_insert(0) += 1;
                    }
                }
                let counts = counts
                    .into_iter()
                    .map(|(value, count)| FacetCount::new(value, count))
                    .collect();
                facets.insert(field.clone(), counts, true);
            }
            FacetClause::Rows { field, rows } => {
                let counts = rows
                    .iter()
                    .map(|row| {
                        let count = matched
                            .iter()
                            .filter(|(document, _)| {
                                plan.conditions
                                    .iter()
                                    .all(|c| c.predicate.matches(document.values(&c.field)))
                                    && document.values(field).iter().any(|v| row.range.contains(v))
                            })
                            .count();
                        FacetCount::new(row.label.clone(), count as u64)
                    })
                    .collect();
                facets.insert(field.clone(), counts, false);
            }
        }
    }
}

impl SearchIndex for MemoryIndex {
    fn execute(&self, plan: &QueryPlan) -> Result<SearchResult> {
        self.check_entity_type(&plan.entity_type)?;
        let documents = self.documents.read();
        let query_terms = tokenize(&plan.keywords);

        let matched: Vec<(&IndexDocument, f32)> = documents
            .values()
            .filter_map(|d| Self::keyword_score(d, &query_terms).map(|score| (d, score)))
            .collect();

        let mut hits: Vec<(&IndexDocument, f32)> = matched
            .iter()
            .filter(|(document, _)| {
                plan.conditions
                    .iter()
                    .all(|c| c.predicate.matches(document.values(&c.field)))
            })
            .copied()
            .collect();

        hits.sort_by(|(a, score_a), (b, score_b)| {
            let ordering = if plan.ordering.is_relevance() {
                let ordering = score_a.partial_cmp(score_b).unwrap_or(Ordering::Equal);
                match plan.ordering.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            } else {
                Self::compare_by_field(a, b, &plan.ordering.field, plan.ordering.direction)
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let mut facets = FacetResults::empty();
        for clause in &plan.facets {
            Self::count_facet(plan, clause, &matched, &mut facets);
        }

        let total = hits.len() as u64;
        let ids = hits.into_iter().map(|(d, _)| d.id).collect();
        Ok(SearchResult::new(Self::page_of(ids, plan.pagination), total).with_facets(facets))
    }

    fn more_like_this(&self, query: &NeighborQuery) -> Result<SearchResult> {
        self.check_entity_type(&query.entity_type)?;
        let documents = self.documents.read();
        let Some(reference) = documents.get(&query.reference_id) else {
            return Ok(SearchResult::empty());
        };

        let fields = Some(query.fields.as_slice());
        let reference_terms: AHashSet<String> = reference.terms(fields).collect();
        if reference_terms.is_empty() {
            return Ok(SearchResult::empty());
        }

        let mut neighbors: Vec<(i64, usize)> = documents
            .values()
            .filter(|d| d.id != reference.id)
            .filter_map(|d| {
                let terms: AHashSet<String> = d.terms(fields).collect();
                let shared = terms.intersection(&reference_terms).count();
                (shared > 0).then_some((d.id, shared))
            })
            .collect();
        neighbors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let total = neighbors.len() as u64;
        let ids = neighbors.into_iter().map(|(id, _)| id).collect();
        Ok(SearchResult::new(Self::page_of(ids, query.pagination), total))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::facet::{FacetCatalog, FacetDefinition, FacetRow};
    use crate::filter::{RangeValue, RawFilters};
    use crate::query::QueryBuilder;
    use crate::request::SearchRequest;

    fn index() -> MemoryIndex {
        MemoryIndex::from_documents(
            "product",
            vec![
                IndexDocument::new(1)
                    .field("name", "Red Cotton Shirt")
                    .field("color", "red")
                    .field("price", 15i64),
                IndexDocument::new(2)
                    .field("name", "Blue Shirt shirt")
                    .field("color", "blue")
                    .field("price", 25i64),
                IndexDocument::new(3)
                    .field("name", "Green Trousers")
                    .field("color", "green")
                    .field("price", 40i64),
                IndexDocument::new(4)
                    .field("name", "Red Wool Shirt")
                    .field("color", "red")
                    .field("price", 60i64),
            ],
        )
    }

    fn catalog() -> FacetCatalog {
        FacetCatalog::new(vec![
            FacetDefinition::discrete("color").with_exclusion("color"),
            FacetDefinition::range(
                "price",
                vec![
                    FacetRow::new(RangeValue::parse("0..20").unwrap()),
                    FacetRow::new(RangeValue::parse("21..50").unwrap()),
                ],
            ),
        ])
    }

    fn plan(request: SearchRequest) -> QueryPlan {
        QueryBuilder::default().build(&request, &catalog())
    }

    fn raw(value: serde_json::Value) -> RawFilters {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_keyword_relevance_order() {
        let result = index().execute(&plan(SearchRequest::new("shirt"))).unwrap();
        // Document 2 mentions "shirt" twice.
        assert_eq!(result.ordered_ids, vec![2, 1, 4]);
        assert_eq!(result.total, 3);
    }

    #[test]
    fn test_blank_keywords_match_all() {
        let result = index().execute(&plan(SearchRequest::new(""))).unwrap();
        assert_eq!(result.total, 4);
        assert_eq!(result.ordered_ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_no_hits() {
        let result = index().execute(&plan(SearchRequest::new("hat"))).unwrap();
        assert!(result.is_empty());
        assert!(result.ordered_ids.is_empty());
    }

    #[test]
    fn test_conditions_and_field_ordering() {
        let request = SearchRequest::new("")
            .with_filters(&raw(json!({"color": ["red", "green"]})))
            .with_order_by("price,desc");
        let result = index().execute(&plan(request)).unwrap();
        assert_eq!(result.ordered_ids, vec![4, 3, 1]);

        let request = SearchRequest::new("").with_filters(&raw(json!({"price": ["20..50"]})));
        let result = index().execute(&plan(request)).unwrap();
        assert_eq!(result.ordered_ids, vec![2, 3]);

        let request = SearchRequest::new("shirt").with_filters(&raw(json!({"-color": ["red"]})));
        let result = index().execute(&plan(request)).unwrap();
        assert_eq!(result.ordered_ids, vec![2]);
    }

    #[test]
    fn test_pagination() {
        let request = SearchRequest::new("").with_page(2, 3);
        let result = index().execute(&plan(request)).unwrap();
        assert_eq!(result.ordered_ids, vec![4]);
        assert_eq!(result.total, 4);
    }

    #[test]
    fn test_facet_counts_with_exclusion() {
        let request = SearchRequest::new("shirt").with_filters(&raw(json!({"color": ["red"]})));
        let result = index().execute(&plan(request)).unwrap();

        assert_eq!(result.ordered_ids, vec![1, 4]);
        // The color selection does not narrow the color facet itself.
        assert_eq!(result.facets.count_of("color", "red"), 2);
        assert_eq!(result.facets.count_of("color", "blue"), 1);
        // Range rows count the filtered hits.
        assert_eq!(result.facets.count_of("price", "0..20"), 1);
        assert_eq!(result.facets.count_of("price", "21..50"), 0);
        assert_eq!(result.facets.get_field_facets("price").unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_entity_type() {
        let mut plan = plan(SearchRequest::new(""));
        plan.entity_type = "order".to_string();
        assert!(matches!(
            index().execute(&plan),
            Err(CatalogSearchError::Index(_))
        ));
    }

    #[test]
    fn test_more_like_this() {
        let query = NeighborQuery {
            entity_type: "product".to_string(),
            reference_id: 1,
            fields: vec!["name".to_string(), "color".to_string()],
            pagination: Pagination::new(1, 10),
        };
        let result = index().more_like_this(&query).unwrap();
        // 4 shares "red" and "shirt"; 2 shares "shirt".
        assert_eq!(result.ordered_ids, vec![4, 2]);
        assert_eq!(result.total, 2);

        let missing = NeighborQuery {
            reference_id: 99,
            ..query
        };
        assert!(index().more_like_this(&missing).unwrap().is_empty());
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Red, cotton-Shirt!"), vec!["red", "cotton", "shirt"]);
        assert!(tokenize("  ").is_empty());
    }
}
