//! Filter model: raw request filters parsed into typed, index-encodable
//! conditions.
//!
//! Parsing is fail-soft. A value that does not fit its filter is dropped and
//! logged at debug level; it never aborts the request.

pub mod condition;
pub mod spec;
pub mod value;

pub use condition::{Condition, ExclusionMarker, Predicate};
pub use spec::{EXCLUDE_PREFIX, FilterKind, FilterSet, FilterSpec, RawFilters};
pub use value::{FilterValue, RangeValue, Scalar};
