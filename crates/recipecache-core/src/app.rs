//! Session context for RecipeCache.
//!
//! This module contains the `App` struct that owns everything a UI talks to:
//! the recipe cache, the favorites set, the search history and the running
//! search pipeline. Construct one per session and share it by reference.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, CatalogSource};
use crate::cache::{CacheSnapshot, RecipeCache};
use crate::config::{Config, AREA_OPTIONS, CATEGORY_OPTIONS};
use crate::favorites::FavoritesStore;
use crate::models::{Recipe, RecipeCategory};
use crate::search::{SearchConfig, SearchHandle, SearchHistory, SearchRequest, SearchState};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

// ============================================================================
// Constants
// ============================================================================

/// Recipes shown on the home view
pub const FEATURED_COUNT: usize = 6;

pub struct App {
    cache: Arc<RecipeCache>,
    favorites: FavoritesStore,
    history: Arc<SearchHistory>,
    search: SearchHandle,
}

impl App {
    /// Create a session from configuration. Must be called from within a
    /// Tokio runtime, since it starts the search pipeline.
    ///
    /// If the data directory cannot be used, state is kept in memory for the
    /// session instead.
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::with_base_url(&config.api_base_url, config.request_timeout())?;
        debug!(base_url = api.base_url(), "API client configured");

        let store: Arc<dyn KeyValueStore> = match config.data_dir() {
            Ok(dir) => match FileStore::new(dir.clone()) {
                Ok(store) => {
                    debug!(?dir, "Using file storage");
                    Arc::new(store)
                }
                Err(e) => {
                    warn!(?dir, error = %e, "Data directory unusable, keeping state in memory");
                    Arc::new(MemoryStore::new())
                }
            },
            Err(e) => {
                warn!(error = %e, "No data directory, keeping state in memory");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::from_parts(Arc::new(api), store, config.search_config()))
    }

    /// Assemble a session from explicit collaborators.
    pub fn from_parts(
        source: Arc<dyn CatalogSource>,
        store: Arc<dyn KeyValueStore>,
        search_config: SearchConfig,
    ) -> Self {
        let cache = Arc::new(RecipeCache::new(source.clone(), store.clone()));
        let favorites = FavoritesStore::new(store.clone());
        let history = Arc::new(SearchHistory::new(store));
        let search = SearchHandle::spawn(cache.clone(), source, history.clone(), search_config);

        Self {
            cache,
            favorites,
            history,
            search,
        }
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn initialize(&self) -> CacheSnapshot {
        let snapshot = self.cache.initialize().await;
        info!(
            count = snapshot.len(),
            origin = ?snapshot.origin(),
            "Recipe cache ready"
        );
        snapshot
    }

    pub async fn refresh(&self) -> Result<CacheSnapshot, ApiError> {
        self.cache.refresh().await
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        self.cache.current_snapshot()
    }

    pub fn subscribe_snapshot(&self) -> watch::Receiver<CacheSnapshot> {
        self.cache.subscribe()
    }

    /// First `n` recipes of the working set, for the home view.
    pub fn featured(&self, n: usize) -> Vec<Recipe> {
        let snapshot = self.cache.current_snapshot();
        let head = &snapshot.recipes()[..n.min(snapshot.len())];
        self.favorites.overlay(head)
    }

    /// Full detail record, with the favorite flag reflecting current
    /// membership.
    pub async fn lookup_by_id(&self, id: &str) -> Option<Recipe> {
        let mut recipe = self.cache.lookup_by_id(id).await?;
        recipe.is_favorite = self.favorites.is_favorite(&recipe.id);
        Some(recipe)
    }

    pub async fn categories(&self) -> Vec<RecipeCategory> {
        self.cache.categories().await
    }

    /// Recipes in `category`. With `hydrate`, partial records are replaced by
    /// their detail records.
    pub async fn browse_category(&self, category: &str, hydrate: bool) -> Vec<Recipe> {
        let mut recipes = self.cache.by_category(category).await;
        if hydrate {
            recipes = self.cache.hydrate(recipes).await;
        }
        self.favorites.overlay(&recipes)
    }

    pub fn category_options(&self) -> &'static [&'static str] {
        CATEGORY_OPTIONS
    }

    pub fn area_options(&self) -> &'static [&'static str] {
        AREA_OPTIONS
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub fn query(&self, text: impl Into<String>) {
        self.search.query(text);
    }

    pub fn search(&self, request: SearchRequest) {
        self.search.submit(request);
    }

    pub fn subscribe_results(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    /// Current visible result set, with the favorite flag applied.
    pub fn results(&self) -> SearchState {
        self.with_favorites(self.search.current())
    }

    /// Stamp the favorite flag onto a published search state.
    pub fn with_favorites(&self, mut state: SearchState) -> SearchState {
        state.recipes = Arc::new(self.favorites.overlay(&state.recipes));
        state
    }

    pub fn search_history(&self) -> Vec<String> {
        self.history.entries()
    }

    pub fn clear_search_history(&self) {
        self.history.clear();
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    pub fn subscribe_favorites(&self) -> watch::Receiver<Arc<Vec<Recipe>>> {
        self.favorites.subscribe()
    }

    /// Returns whether `recipe` is a favorite afterwards.
    pub fn toggle_favorite(&self, recipe: &Recipe) -> bool {
        self.favorites.toggle(recipe)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_favorite(id)
    }

    pub fn favorites(&self) -> Arc<Vec<Recipe>> {
        self.favorites.list()
    }

    pub fn clear_favorites(&self) {
        self.favorites.clear();
    }
}
