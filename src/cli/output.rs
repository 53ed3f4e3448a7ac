//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{CatalogSearchArgs, OutputFormat};
use crate::facet::FacetResults;
use crate::query::QueryPlan;
use crate::search::SearchOutcome;
use crate::store::Product;

/// Result structure for search operations.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub keywords: String,
    #[serde(flatten)]
    pub outcome: SearchOutcome,
    pub total_pages: u64,
    pub duration_ms: u64,
}

/// Result structure for similarity lookups.
#[derive(Debug, Serialize)]
pub struct SimilarReport {
    pub reference_id: i64,
    pub fields: Vec<String>,
    pub similar: Vec<Product>,
    pub duration_ms: u64,
}

/// Result structure for plan inspection.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub plan: QueryPlan,
}

/// Human-readable rendering of a command result.
pub trait HumanReport {
    fn render_human(&self) -> String;
}

impl HumanReport for SearchReport {
    fn render_human(&self) -> String {
        let page = &self.outcome.page;
        let mut out = String::new();
        let _ = writeln!(out, "Search Results:");
        let _ = writeln!(out, "═══════════════");
        for (i, product) in page.items.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}", page.offset() + i + 1, describe(product));
        }
        if page.is_empty() {
            let _ = writeln!(out, "No products found.");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Total hits: {}", page.total);
        let _ = writeln!(out, "Page {} of {}", page.page, self.total_pages);
        let _ = writeln!(out, "Search time: {}ms", self.duration_ms);
        render_facets(&mut out, &self.outcome.facets);
        out
    }
}

impl HumanReport for SimilarReport {
    fn render_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Similar to {} by {}:",
            self.reference_id,
            self.fields.join(", ")
        );
        let _ = writeln!(out, "═══════════════");
        for (i, product) in self.similar.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}", i + 1, describe(product));
        }
        if self.similar.is_empty() {
            let _ = writeln!(out, "No similar products found.");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Lookup time: {}ms", self.duration_ms);
        out
    }
}

impl HumanReport for PlanReport {
    fn render_human(&self) -> String {
        let plan = &self.plan;
        let mut out = String::new();
        let _ = writeln!(out, "Query Plan ({}):", plan.entity_type);
        let _ = writeln!(out, "═══════════════");
        let _ = writeln!(out, "Keywords: {:?}", plan.keywords);
        let _ = writeln!(
            out,
            "Ordering: {} {}",
            plan.ordering.field, plan.ordering.direction
        );
        let _ = writeln!(
            out,
            "Page: {} ({} per page)",
            plan.pagination.page(),
            plan.pagination.per_page()
        );
        let _ = writeln!(out, "Conditions:");
        for condition in &plan.conditions {
            let _ = writeln!(
                out,
                "  [{}] {} {:?}",
                condition.tag, condition.field, condition.predicate
            );
        }
        let _ = writeln!(out, "Facets:");
        for facet in &plan.facets {
            let _ = writeln!(out, "  {}", facet.field());
        }
        out
    }
}

fn describe(product: &Product) -> String {
    format!("[{}] {} (on hand: {})", product.id, product.name, product.on_hand)
}

fn render_facets(out: &mut String, facets: &FacetResults) {
    if facets.field_facets.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Facets:");
    let _ = writeln!(out, "───────");
    for (field, counts) in &facets.field_facets {
        let _ = writeln!(out, "{field}:");
        for count in counts {
            let _ = writeln!(out, "  {} ({})", count.value, count.count);
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanReport>(
    message: &str,
    result: &T,
    args: &CatalogSearchArgs,
) -> crate::error::Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            print!("{}", result.render_human());
        }
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            println!("{json}");
        }
    }
    Ok(())
}
