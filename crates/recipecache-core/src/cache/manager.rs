use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::{watch, OnceCell};
use tracing::{debug, info, warn};

use crate::api::{ApiError, CatalogSource};
use crate::fallback;
use crate::models::{Recipe, RecipeCategory};
use crate::normalizer::{normalize_category, normalize_meal, normalize_meals, normalize_stub};
use crate::storage::{load_json, save_json, KeyValueStore, RECIPE_CACHE_KEY};

use super::{CacheSnapshot, SnapshotOrigin};

/// Maximum concurrent detail lookups when hydrating category stubs.
/// Keeps a category browse from firing dozens of requests at once.
const MAX_CONCURRENT_LOOKUPS: usize = 5;

/// Owns the in-memory recipe working set for a session.
///
/// The snapshot is only ever replaced wholesale and published through a
/// watch channel, so readers never see a partially updated list.
pub struct RecipeCache {
    source: Arc<dyn CatalogSource>,
    store: Arc<dyn KeyValueStore>,
    snapshot_tx: watch::Sender<CacheSnapshot>,
    bootstrap: OnceCell<()>,
}

impl RecipeCache {
    pub fn new(source: Arc<dyn CatalogSource>, store: Arc<dyn KeyValueStore>) -> Self {
        let (snapshot_tx, _) = watch::channel(CacheSnapshot::pending());
        Self {
            source,
            store,
            snapshot_tx,
            bootstrap: OnceCell::new(),
        }
    }

    /// Bootstrap the working set on first use. Later calls return the
    /// current snapshot without doing any I/O.
    pub async fn initialize(&self) -> CacheSnapshot {
        self.bootstrap.get_or_init(|| self.bootstrap()).await;
        self.current_snapshot()
    }

    pub fn is_initialized(&self) -> bool {
        self.bootstrap.initialized()
    }

    /// Latest adopted snapshot. Never blocks on I/O.
    pub fn current_snapshot(&self) -> CacheSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CacheSnapshot> {
        self.snapshot_tx.subscribe()
    }

    async fn bootstrap(&self) {
        match load_json::<Vec<Recipe>>(self.store.as_ref(), RECIPE_CACHE_KEY) {
            Ok(Some(mut recipes)) => {
                recipes.retain(|r| !r.id.is_empty());
                if !recipes.is_empty() {
                    info!(count = recipes.len(), "Adopting persisted recipe snapshot");
                    self.adopt(recipes, SnapshotOrigin::Persisted);
                    return;
                }
                debug!("Persisted recipe snapshot is empty");
            }
            Ok(None) => debug!("No persisted recipe snapshot"),
            Err(e) => warn!(error = %e, "Failed to read persisted recipe snapshot"),
        }

        match self.fetch_catalog().await {
            Ok(recipes) if !recipes.is_empty() => {
                self.persist(&recipes);
                info!(count = recipes.len(), "Adopting remote recipe catalog");
                self.adopt(recipes, SnapshotOrigin::Remote);
            }
            Ok(_) => {
                warn!("Remote catalog returned no recipes, using built-in recipes");
                self.adopt(fallback::fallback_recipes(), SnapshotOrigin::Fallback);
            }
            Err(e) => {
                warn!(error = %e, "Catalog bootstrap failed, using built-in recipes");
                self.adopt(fallback::fallback_recipes(), SnapshotOrigin::Fallback);
            }
        }
    }

    /// Force a full catalog refetch. On success the new snapshot is persisted
    /// and published; on failure the current snapshot stays in place.
    pub async fn refresh(&self) -> Result<CacheSnapshot, ApiError> {
        let recipes = self.fetch_catalog().await?;
        if recipes.is_empty() {
            return Err(ApiError::InvalidResponse(
                "catalog returned no recipes".to_string(),
            ));
        }

        self.persist(&recipes);
        info!(count = recipes.len(), "Refreshed recipe catalog");
        self.adopt(recipes, SnapshotOrigin::Remote);
        Ok(self.current_snapshot())
    }

    async fn fetch_catalog(&self) -> Result<Vec<Recipe>, ApiError> {
        let meals = self.source.search_by_text("").await?;
        Ok(normalize_meals(&meals))
    }

    fn adopt(&self, recipes: Vec<Recipe>, origin: SnapshotOrigin) {
        self.snapshot_tx
            .send_replace(CacheSnapshot::new(recipes, origin));
    }

    fn persist(&self, recipes: &[Recipe]) {
        if let Err(e) = save_json(self.store.as_ref(), RECIPE_CACHE_KEY, recipes) {
            warn!(error = %e, "Failed to persist recipe snapshot, continuing in memory");
        }
    }

    /// Full detail record for `id`.
    ///
    /// Always asks the catalog first, since snapshot entries may be partial.
    /// When the catalog is unreachable, falls back to the current snapshot
    /// and then to the built-in recipes.
    pub async fn lookup_by_id(&self, id: &str) -> Option<Recipe> {
        if id.trim().is_empty() {
            return None;
        }

        match self.source.get_by_id(id).await {
            Ok(Some(meal)) => normalize_meal(&meal),
            Ok(None) => {
                debug!(id, "Recipe not found in catalog");
                None
            }
            Err(e) => {
                warn!(id, error = %e, "Recipe lookup failed, degrading to local data");
                self.current_snapshot()
                    .find(id)
                    .cloned()
                    .or_else(|| fallback::fallback_recipe(id))
            }
        }
    }

    /// Partial recipes in `category`. Area, instructions and ingredients are
    /// not provided by the filter endpoint; see [`RecipeCache::hydrate`].
    pub async fn by_category(&self, category: &str) -> Vec<Recipe> {
        match self.source.filter_by_category(category).await {
            Ok(stubs) => stubs
                .iter()
                .filter_map(|stub| normalize_stub(stub, category))
                .collect(),
            Err(e) => {
                warn!(category, error = %e, "Category fetch failed, using built-in recipes");
                fallback::fallback_by_category(category)
            }
        }
    }

    pub async fn categories(&self) -> Vec<RecipeCategory> {
        match self.source.list_categories().await {
            Ok(raw) => raw.iter().filter_map(normalize_category).collect(),
            Err(e) => {
                warn!(error = %e, "Category list fetch failed, using built-in categories");
                fallback::fallback_categories()
            }
        }
    }

    /// Replace partial records with their detail records, preserving order.
    /// A stub whose lookup yields nothing is kept as is.
    pub async fn hydrate(&self, recipes: Vec<Recipe>) -> Vec<Recipe> {
        stream::iter(recipes)
            .map(|recipe| async move {
                if !recipe.is_partial() {
                    return recipe;
                }
                let detail = self.lookup_by_id(&recipe.id).await;
                detail.unwrap_or(recipe)
            })
            .buffered(MAX_CONCURRENT_LOOKUPS)
            .collect()
            .await
    }
}
