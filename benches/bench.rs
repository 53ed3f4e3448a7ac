//! Criterion benchmarks for catalog search.
//!
//! Covers the hot paths of a search call:
//! - Parsing raw filters and compiling query plans
//! - Re-sorting store records into index order
//! - End-to-end search over the in-memory index and store

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;

use catalog_search::config::{SearchConfig, Settings, SettingsHandle};
use catalog_search::facet::{FacetCatalog, FacetDefinition};
use catalog_search::filter::RawFilters;
use catalog_search::index::{IndexDocument, MemoryIndex};
use catalog_search::query::QueryBuilder;
use catalog_search::request::SearchRequest;
use catalog_search::search::{CatalogSearch, order_by_hits};
use catalog_search::store::{MemoryStore, Product};

const COLORS: [&str; 6] = ["red", "blue", "green", "black", "white", "grey"];
const WORDS: [&str; 8] = [
    "shirt", "linen", "cotton", "summer", "dress", "coat", "wool", "classic",
];

/// Generate catalog documents and matching store records.
fn generate_catalog(count: usize) -> (Vec<IndexDocument>, Vec<Product>) {
    let mut documents = Vec::with_capacity(count);
    let mut products = Vec::with_capacity(count);
    for i in 0..count {
        let id = i as i64;
        let name = format!(
            "{} {} {}",
            WORDS[i % WORDS.len()],
            WORDS[(i * 7) % WORDS.len()],
            WORDS[(i * 13) % WORDS.len()]
        );
        documents.push(
            IndexDocument::new(id)
                .field("name", name.as_str())
                .field("color", COLORS[i % COLORS.len()])
                .field("price", (i % 200) as i64),
        );
        products.push(Product::new(id, name).with_stock((i % 5) as i64));
    }
    (documents, products)
}

fn facet_catalog() -> FacetCatalog {
    FacetCatalog::new(vec![
        FacetDefinition::discrete("color").with_exclusion("color"),
        FacetDefinition::discrete("brand"),
    ])
}

fn raw_filters() -> RawFilters {
    serde_json::from_value(json!({
        "color": ["red", "blue"],
        "-brand": ["acme"],
        "price": [[10, 50], "80..120"]
    }))
    .unwrap()
}

/// Plan construction benchmarks.
fn bench_query_plans(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_plans");

    let builder = QueryBuilder::new("product", SearchConfig::default());
    let catalog = facet_catalog();
    let raw = raw_filters();

    group.bench_function("parse_filters", |b| {
        b.iter(|| black_box(SearchRequest::new("shirt").with_filters(black_box(&raw))))
    });

    let request = SearchRequest::new("linen shirt").with_filters(&raw);
    group.bench_function("build_plan", |b| {
        b.iter(|| black_box(builder.build(black_box(&request), &catalog)))
    });

    group.finish();
}

/// Reconciliation benchmarks.
fn bench_reconciliation(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconciliation");

    let (_, products) = generate_catalog(1000);
    let ordered_ids: Vec<i64> = (0..1000).rev().step_by(2).collect();

    group.throughput(Throughput::Elements(products.len() as u64));
    group.bench_function("order_by_hits", |b| {
        b.iter_with_setup(
            || products.clone(),
            |records| black_box(order_by_hits(records, &ordered_ids)),
        )
    });

    group.finish();
}

/// End-to-end search benchmarks.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(20);

    let (documents, products) = generate_catalog(5000);
    let search = CatalogSearch::new(
        SettingsHandle::new(Settings::new(SearchConfig::default(), facet_catalog())),
        Arc::new(MemoryIndex::from_documents("product", documents)),
        Arc::new(MemoryStore::from_products(products)),
    );

    let request = SearchRequest::new("linen shirt").with_filters(&raw_filters());
    group.bench_function("faceted_search", |b| {
        b.iter(|| black_box(search.search(black_box(&request)).unwrap()))
    });

    let reference = Product::new(42, "reference");
    group.bench_function("similar_products", |b| {
        b.iter(|| {
            black_box(
                search
                    .similar_products(&reference, &["name", "color"], Some(10))
                    .unwrap(),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_query_plans, bench_reconciliation, bench_search);
criterion_main!(benches);
