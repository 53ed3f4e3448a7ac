//! Result ordering and pagination.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::config::SearchConfig;

/// Field name the index uses for relevance.
pub const RELEVANCE_FIELD: &str = "score";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Parse `asc`/`desc` (any case). Anything else is `None`.
    pub fn parse(token: &str) -> Option<Direction> {
        match token.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Direction::Asc),
            "desc" | "descending" => Some(Direction::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("asc"),
            Direction::Desc => f.write_str("desc"),
        }
    }
}

/// Ordering of the index result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    pub field: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn new<S: Into<String>>(field: S, direction: Direction) -> Self {
        SortOrder {
            field: field.into(),
            direction,
        }
    }

    /// Relevance, best first.
    pub fn relevance() -> Self {
        SortOrder::new(RELEVANCE_FIELD, Direction::Desc)
    }

    /// Parse a `"field,direction"` token.
    ///
    /// The token is split once on the first comma. A missing or
    /// unrecognized direction falls back to descending; a blank field falls
    /// back to relevance.
    pub fn parse(token: &str) -> SortOrder {
        let (field, direction) = match token.split_once(',') {
            Some((field, direction)) => (field.trim(), Some(direction)),
            None => (token.trim(), None),
        };
        if field.is_empty() {
            return SortOrder::relevance();
        }
        let direction = match direction.and_then(Direction::parse) {
            Some(direction) => direction,
            None => {
                debug!("ordering {token:?} has no usable direction, using desc");
                Direction::Desc
            }
        };
        SortOrder::new(field, direction)
    }

    /// Whether this orders by index relevance.
    pub fn is_relevance(&self) -> bool {
        self.field == RELEVANCE_FIELD
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::relevance()
    }
}

/// One-based page number and page size, both at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page: usize,
    per_page: usize,
}

impl Pagination {
    /// Create a pagination, coercing zeros to one.
    pub fn new(page: usize, per_page: usize) -> Self {
        Pagination {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Resolve request values against configured defaults. Absent or
    /// non-positive values fall back to page 1 and the configured page size.
    pub fn resolve(page: Option<i64>, per_page: Option<i64>, config: &SearchConfig) -> Self {
        let page = page
            .filter(|p| *p > 0)
            .and_then(|p| usize::try_from(p).ok())
            .unwrap_or(1);
        let per_page = per_page
            .filter(|p| *p > 0)
            .and_then(|p| usize::try_from(p).ok())
            .unwrap_or(config.products_per_page);
        Pagination::new(page, per_page)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of results before this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}
