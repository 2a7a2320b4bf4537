//! RecipeCache core library.
//!
//! Client-side recipe catalog cache: bootstraps a working set from local
//! storage or the TheMealDB API, answers incremental searches against it
//! with a debounced latest-wins pipeline, and keeps a persisted favorites
//! set. Frontends build an [`App`] and talk to it through watch channels.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod fallback;
pub mod favorites;
pub mod models;
pub mod normalizer;
pub mod search;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError, CatalogSource};
pub use app::{App, FEATURED_COUNT};
pub use cache::{CacheSnapshot, RecipeCache, SnapshotOrigin};
pub use config::Config;
pub use favorites::FavoritesStore;
pub use models::{Ingredient, Recipe, RecipeCategory};
pub use search::{
    ResultOrigin, SearchConfig, SearchFilters, SearchHandle, SearchHistory, SearchRequest,
    SearchState, SearchStatus, SortOrder,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
