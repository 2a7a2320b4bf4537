//! Incremental search over the recipe working set.
//!
//! This module provides:
//! - `SearchHandle`: the debounced, latest-wins search pipeline
//! - `SearchRequest`, `SearchFilters`, `SortOrder`: what the UI asks for
//! - `SearchHistory`: the last few accepted queries, persisted
//!
//! Queries are answered from the cache snapshot when it has matches and from
//! the remote catalog otherwise. Only the result of the most recently
//! dispatched query is ever published.

pub mod filter;
pub mod history;
pub mod pipeline;

pub use filter::{filter_recipes, matches_query, refine, SearchFilters, SearchRequest, SortOrder};
pub use history::SearchHistory;
pub use pipeline::{ResultOrigin, SearchConfig, SearchHandle, SearchState, SearchStatus};
