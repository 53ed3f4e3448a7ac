//! Facet definitions configured for the catalog.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogSearchError, Result};
use crate::filter::{RangeValue, Scalar};

/// A labelled bucket of a range facet (e.g. a price bracket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFacetRow", into = "RawFacetRow")]
pub struct FacetRow {
    pub label: String,
    pub range: RangeValue,
}

impl FacetRow {
    /// Create a row labelled after its range.
    pub fn new(range: RangeValue) -> Self {
        FacetRow {
            label: range.to_string(),
            range,
        }
    }

    /// Set a display label.
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }
}

#[derive(Serialize, Deserialize)]
struct RawFacetRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    low: Scalar,
    high: Scalar,
}

impl From<FacetRow> for RawFacetRow {
    fn from(row: FacetRow) -> Self {
        RawFacetRow {
            label: Some(row.label),
            low: row.range.low().clone(),
            high: row.range.high().clone(),
        }
    }
}

impl TryFrom<RawFacetRow> for FacetRow {
    type Error = String;

    fn try_from(raw: RawFacetRow) -> std::result::Result<Self, Self::Error> {
        let range = RangeValue::new(raw.low.clone(), raw.high.clone())
            .ok_or_else(|| format!("invalid facet row range {}..{}", raw.low, raw.high))?;
        let row = FacetRow::new(range);
        Ok(match raw.label {
            Some(label) => row.with_label(label),
            None => row,
        })
    }
}

/// How a facet's values are bucketed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FacetKind {
    /// One count per distinct field value.
    Discrete,
    /// One count per configured row.
    Range {
        #[serde(default)]
        rows: Vec<FacetRow>,
    },
}

/// Facet field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetDefinition {
    /// Index field the facet is computed on.
    pub search_param: String,
    #[serde(flatten)]
    pub kind: FacetKind,
    /// Name of the request filter whose selection must not narrow this
    /// facet's own counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion: Option<String>,
}

impl FacetDefinition {
    /// Create a discrete facet definition.
    pub fn discrete<S: Into<String>>(search_param: S) -> Self {
        FacetDefinition {
            search_param: search_param.into(),
            kind: FacetKind::Discrete,
            exclusion: None,
        }
    }

    /// Create a range facet definition with the given rows.
    pub fn range<S: Into<String>>(search_param: S, rows: Vec<FacetRow>) -> Self {
        FacetDefinition {
            search_param: search_param.into(),
            kind: FacetKind::Range { rows },
            exclusion: None,
        }
    }

    /// Set the exclusion rule name.
    pub fn with_exclusion<S: Into<String>>(mut self, rule: S) -> Self {
        self.exclusion = Some(rule.into());
        self
    }
}

/// The process-wide, read-only list of facets rendered for every search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetCatalog {
    definitions: Vec<FacetDefinition>,
}

impl FacetCatalog {
    pub fn new(definitions: Vec<FacetDefinition>) -> Self {
        FacetCatalog { definitions }
    }

    /// Parse a JSON array of facet definitions.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: FacetCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a JSON array of facet definitions from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Reject catalogs with blank or duplicate search params.
    pub fn validate(&self) -> Result<()> {
        for (i, definition) in self.definitions.iter().enumerate() {
            if definition.search_param.trim().is_empty() {
                return Err(CatalogSearchError::config(format!(
                    "facet #{i} has an empty search_param"
                )));
            }
            if self.definitions[..i]
                .iter()
                .any(|d| d.search_param == definition.search_param)
            {
                return Err(CatalogSearchError::config(format!(
                    "facet {} is defined twice",
                    definition.search_param
                )));
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FacetDefinition> {
        self.definitions.iter()
    }

    pub fn get(&self, search_param: &str) -> Option<&FacetDefinition> {
        self.definitions
            .iter()
            .find(|d| d.search_param == search_param)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
