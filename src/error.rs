//! Error types for catalog search.
//!
//! All fallible operations return [`CatalogSearchError`] through the crate-wide
//! [`Result`] alias. Malformed request input is deliberately *not* an error:
//! bad filter values and ordering tokens are dropped while the plan is built,
//! and an index that finds nothing yields an empty page. What does surface here
//! is collaborator failure (index transport, store) and programmer error
//! (unknown extra scope, bad scope arguments).
//!
//! # Examples
//!
//! ```
//! use catalog_search::error::{CatalogSearchError, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(CatalogSearchError::unknown_scope("on_sale"))
//! }
//!
//! match lookup() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for catalog search operations.
#[derive(Error, Debug)]
pub enum CatalogSearchError {
    /// I/O errors (settings and fixture files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The search index could not be reached or spoke an unexpected protocol.
    #[error("Search index unavailable: {0}")]
    IndexUnavailable(String),

    /// Any other failure reported by the search index.
    #[error("Index error: {0}")]
    Index(String),

    /// Failure reported by the persistent record store.
    #[error("Store error: {0}")]
    Store(String),

    /// An extra scope was requested by a name missing from the registry.
    #[error("Unknown scope: {0}")]
    UnknownScope(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Settings could not be loaded or are inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with CatalogSearchError.
pub type Result<T> = std::result::Result<T, CatalogSearchError>;

impl CatalogSearchError {
    /// Create a new index-unavailable (transport) error.
    pub fn index_unavailable<S: Into<String>>(msg: S) -> Self {
        CatalogSearchError::IndexUnavailable(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        CatalogSearchError::Index(msg.into())
    }

    /// Create a new store error.
    pub fn store<S: Into<String>>(msg: S) -> Self {
        CatalogSearchError::Store(msg.into())
    }

    /// Create a new unknown-scope error.
    pub fn unknown_scope<S: Into<String>>(name: S) -> Self {
        CatalogSearchError::UnknownScope(name.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CatalogSearchError::InvalidArgument(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CatalogSearchError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CatalogSearchError::Other(msg.into())
    }

    /// Whether this error came from the index transport rather than from
    /// the index's answer.
    pub fn is_index_unavailable(&self) -> bool {
        matches!(self, CatalogSearchError::IndexUnavailable(_))
    }
}
