//! Command implementations for the catalog search CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{Settings, SettingsHandle};
use crate::error::{CatalogSearchError, Result};
use crate::index::{IndexDocument, MemoryIndex};
use crate::query::{DEFAULT_ENTITY_TYPE, QueryBuilder};
use crate::request::SearchRequest;
use crate::search::CatalogSearch;
use crate::store::{MemoryStore, Product};

/// A catalog on disk: store records plus the index documents built from
/// them. The two may disagree, like a stale index would.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub documents: Vec<IndexDocument>,
}

impl Fixture {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let fixture: Fixture = serde_json::from_str(&content)?;
        debug!(
            "loaded fixture {}: {} products, {} documents",
            path.as_ref().display(),
            fixture.products.len(),
            fixture.documents.len()
        );
        Ok(fixture)
    }

    /// Build an in-memory search over this fixture.
    pub fn into_search(self, settings: Settings) -> CatalogSearch {
        let index = MemoryIndex::from_documents(DEFAULT_ENTITY_TYPE, self.documents);
        let store = MemoryStore::from_products(self.products);
        CatalogSearch::new(SettingsHandle::new(settings), Arc::new(index), Arc::new(store))
    }
}

/// Execute a CLI command.
pub fn execute_command(args: CatalogSearchArgs) -> Result<()> {
    let settings = load_settings(&args)?;
    match &args.command {
        Command::Search(search_args) => search_catalog(search_args.clone(), settings, &args),
        Command::Similar(similar_args) => find_similar(similar_args.clone(), settings, &args),
        Command::Plan(request_args) => show_plan(request_args.clone(), settings, &args),
    }
}

fn load_settings(args: &CatalogSearchArgs) -> Result<Settings> {
    match &args.settings {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(path)
        }
        None => Ok(Settings::default()),
    }
}

/// Search a catalog fixture.
fn search_catalog(
    args: SearchArgs,
    settings: Settings,
    cli_args: &CatalogSearchArgs,
) -> Result<()> {
    let params = args.request.to_params()?;
    let request = SearchRequest::from_params(&params);
    let search = Fixture::from_file(&args.fixture)?.into_search(settings);

    let start = Instant::now();
    let outcome = search.search(&request)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    output_result(
        "Search completed",
        &SearchReport {
            keywords: request.keywords.clone(),
            total_pages: outcome.page.total_pages(),
            outcome,
            duration_ms,
        },
        cli_args,
    )
}

/// Find products similar to one in the fixture.
fn find_similar(args: SimilarArgs, settings: Settings, cli_args: &CatalogSearchArgs) -> Result<()> {
    let fixture = Fixture::from_file(&args.fixture)?;
    let reference = fixture
        .products
        .iter()
        .find(|p| p.id == args.id)
        .cloned()
        .ok_or_else(|| {
            CatalogSearchError::invalid_argument(format!("no product with id {}", args.id))
        })?;
    let search = fixture.into_search(settings);

    let request = SearchRequest {
        total_similar_items: args.count,
        ..SearchRequest::default()
    };

    let start = Instant::now();
    let similar = search.similar_products_for(&request, &reference, &args.fields)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    output_result(
        "Similarity lookup completed",
        &SimilarReport {
            reference_id: reference.id,
            fields: args.fields,
            similar,
            duration_ms,
        },
        cli_args,
    )
}

/// Show the plan a request compiles to without touching any index.
fn show_plan(args: RequestArgs, settings: Settings, cli_args: &CatalogSearchArgs) -> Result<()> {
    let request = SearchRequest::from_params(&args.to_params()?);
    let plan = QueryBuilder::new(DEFAULT_ENTITY_TYPE, settings.config.clone())
        .build(&request, &settings.facets);
    output_result("Query plan", &PlanReport { plan }, cli_args)
}
