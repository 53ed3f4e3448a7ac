//! Command line argument parsing for the catalog search CLI using clap.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogSearchError, Result};
use crate::filter::Scalar;
use crate::request::RawSearchParams;
use crate::store::ExtraScope;

/// catalog-search - faceted search over a product catalog
#[derive(Parser, Debug, Clone)]
#[command(name = "catalog-search")]
#[command(about = "Faceted catalog search with index/store reconciliation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CatalogSearchArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Settings file (JSON: {"config": {...}, "facets": [...]})
    #[arg(short, long, value_name = "SETTINGS_FILE")]
    pub settings: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CatalogSearchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search a catalog fixture
    Search(SearchArgs),

    /// Find products similar to a given one
    Similar(SimilarArgs),

    /// Show the query plan a request compiles to
    Plan(RequestArgs),
}

/// Request parameters shared by `search` and `plan`
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Keywords
    #[arg(value_name = "KEYWORDS", default_value = "")]
    pub keywords: String,

    /// Filter as FACET=VALUE; repeat for more values. Prefix the facet with
    /// '-' to exclude, use LOW..HIGH for ranges
    #[arg(long = "filter", value_name = "FACET=VALUE")]
    pub filters: Vec<String>,

    /// Restrict to a taxon and its descendants
    #[arg(long)]
    pub taxon: Option<String>,

    /// Ordering as "field,direction"
    #[arg(long)]
    pub order_by: Option<String>,

    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<i64>,

    /// Results per page
    #[arg(long)]
    pub per_page: Option<i64>,

    /// Extra scope as NAME or NAME:ARG1,ARG2
    #[arg(long = "scope", value_name = "SCOPE")]
    pub scopes: Vec<String>,
}

impl RequestArgs {
    /// Convert to raw search parameters.
    pub fn to_params(&self) -> Result<RawSearchParams> {
        let mut filters: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for filter in &self.filters {
            let (facet, value) = filter.split_once('=').ok_or_else(|| {
                CatalogSearchError::invalid_argument(format!(
                    "filter {filter:?} is not of the form FACET=VALUE"
                ))
            })?;
            filters
                .entry(facet.trim().to_string())
                .or_default()
                .push(Value::String(value.to_string()));
        }

        let scopes = self
            .scopes
            .iter()
            .map(|scope| parse_scope(scope))
            .collect::<Result<Vec<_>>>()?;

        Ok(RawSearchParams {
            keywords: Some(self.keywords.clone()),
            taxon: self.taxon.clone(),
            filters,
            order_by: self.order_by.clone(),
            page: self.page,
            per_page: self.per_page,
            total_similar_items: None,
            scopes,
        })
    }
}

fn parse_scope(spec: &str) -> Result<ExtraScope> {
    let (name, args) = match spec.split_once(':') {
        Some((name, args)) => (name.trim(), args),
        None => (spec.trim(), ""),
    };
    if name.is_empty() {
        return Err(CatalogSearchError::invalid_argument(format!(
            "scope {spec:?} has no name"
        )));
    }
    let args = args.split(',').filter_map(Scalar::parse).collect();
    Ok(ExtraScope::new(name, args))
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Catalog fixture (JSON: {"products": [...], "documents": [...]})
    #[arg(value_name = "FIXTURE")]
    pub fixture: PathBuf,

    #[command(flatten)]
    pub request: RequestArgs,
}

/// Arguments for similarity lookups
#[derive(Parser, Debug, Clone)]
pub struct SimilarArgs {
    /// Catalog fixture (JSON: {"products": [...], "documents": [...]})
    #[arg(value_name = "FIXTURE")]
    pub fixture: PathBuf,

    /// Id of the reference product
    #[arg(long)]
    pub id: i64,

    /// Index fields defining similarity (comma-separated)
    #[arg(long = "field", value_delimiter = ',', default_value = "name")]
    pub fields: Vec<String>,

    /// Number of similar products to return
    #[arg(short = 'n', long)]
    pub count: Option<i64>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
