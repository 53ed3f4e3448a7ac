//! Query construction: ordering, pagination, the query plan and the builder
//! that assembles it from a search request.

pub mod builder;
pub mod ordering;
pub mod plan;

pub use builder::{DEFAULT_ENTITY_TYPE, QueryBuilder};
pub use ordering::{Direction, Pagination, RELEVANCE_FIELD, SortOrder};
pub use plan::{FacetClause, QueryPlan, QueryPlanBuilder};
