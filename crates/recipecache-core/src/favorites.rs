//! User-curated favorites, persisted under their own key.
//!
//! Favorites are kept apart from the recipe cache: the cache and the search
//! pipeline never touch this set, and the `is_favorite` flag on a recipe is
//! only an overlay stamped from here.
//!
//! Every mutation builds a new list and publishes it whole, so observers
//! always see a consistent snapshot. Persistence is best-effort: a failed
//! write is logged and the new value is still published.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::Recipe;
use crate::storage::{load_json, save_json, KeyValueStore, FAVORITES_KEY};

pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    favorites_tx: watch::Sender<Arc<Vec<Recipe>>>,
}

impl FavoritesStore {
    /// Load the persisted set, or start empty if it is missing or unreadable.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let favorites = match load_json::<Vec<Recipe>>(store.as_ref(), FAVORITES_KEY) {
            Ok(Some(list)) => Self::sanitize(list),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load favorites, starting empty");
                Vec::new()
            }
        };
        debug!(count = favorites.len(), "Favorites loaded");

        let (favorites_tx, _) = watch::channel(Arc::new(favorites));
        Self {
            store,
            favorites_tx,
        }
    }

    /// Drop blank and duplicate ids from a persisted list, keeping first
    /// occurrence order.
    fn sanitize(list: Vec<Recipe>) -> Vec<Recipe> {
        let mut seen = HashSet::new();
        list.into_iter()
            .filter(|r| !r.id.is_empty() && seen.insert(r.id.clone()))
            .map(|mut r| {
                r.is_favorite = true;
                r
            })
            .collect()
    }

    pub fn list(&self) -> Arc<Vec<Recipe>> {
        self.favorites_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Recipe>>> {
        self.favorites_tx.subscribe()
    }

    pub fn count(&self) -> usize {
        self.favorites_tx.borrow().len()
    }

    /// Pure membership check against the latest published value.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites_tx.borrow().iter().any(|r| r.id == id)
    }

    /// Append `recipe` unless already present. Returns whether it was added.
    pub fn add(&self, recipe: &Recipe) -> bool {
        if recipe.id.is_empty() {
            warn!(name = %recipe.name, "Refusing to favorite a recipe without an id");
            return false;
        }

        self.update(|current| {
            if current.iter().any(|r| r.id == recipe.id) {
                return None;
            }
            Some(Self::with(current, recipe))
        })
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        self.update(|current| {
            if !current.iter().any(|r| r.id == id) {
                return None;
            }
            Some(Self::without(current, id))
        })
    }

    /// Flip membership for `recipe`. Returns the new membership.
    pub fn toggle(&self, recipe: &Recipe) -> bool {
        if recipe.id.is_empty() {
            return false;
        }

        let mut now_favorite = false;
        self.update(|current| {
            if current.iter().any(|r| r.id == recipe.id) {
                Some(Self::without(current, &recipe.id))
            } else {
                now_favorite = true;
                Some(Self::with(current, recipe))
            }
        });
        now_favorite
    }

    pub fn clear(&self) {
        self.update(|_| Some(Vec::new()));
    }

    /// Copy of `recipes` with the overlay flag set from current membership.
    pub fn overlay(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        let current = self.list();
        let ids: HashSet<&str> = current.iter().map(|r| r.id.as_str()).collect();
        recipes
            .iter()
            .map(|r| {
                let mut r = r.clone();
                r.is_favorite = ids.contains(r.id.as_str());
                r
            })
            .collect()
    }

    fn with(current: &[Recipe], recipe: &Recipe) -> Vec<Recipe> {
        let mut next = current.to_vec();
        let mut favorite = recipe.clone();
        favorite.is_favorite = true;
        next.push(favorite);
        next
    }

    fn without(current: &[Recipe], id: &str) -> Vec<Recipe> {
        current.iter().filter(|r| r.id != id).cloned().collect()
    }

    /// Compute the next list from the current one and, if it changed,
    /// persist and publish it. Runs under the channel's write lock so
    /// concurrent mutations cannot interleave.
    fn update<F>(&self, change: F) -> bool
    where
        F: FnOnce(&[Recipe]) -> Option<Vec<Recipe>>,
    {
        self.favorites_tx.send_if_modified(|current| match change(current.as_slice()) {
            Some(next) => {
                if let Err(e) = save_json(self.store.as_ref(), FAVORITES_KEY, &next) {
                    warn!(error = %e, "Failed to persist favorites, continuing in memory");
                }
                *current = Arc::new(next);
                true
            }
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::{recipe, FailingStore};

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    fn ids(list: &[Recipe]) -> Vec<String> {
        list.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_add_is_idempotent_and_sets_overlay() {
        let favorites = FavoritesStore::new(store());
        let pasta = recipe("1", "Pasta", "Pasta", "Italian");

        assert!(favorites.add(&pasta));
        assert!(!favorites.add(&pasta));
        assert_eq!(favorites.count(), 1);
        assert!(favorites.list()[0].is_favorite);
        assert!(favorites.is_favorite("1"));
    }

    #[test]
    fn test_remove() {
        let favorites = FavoritesStore::new(store());
        favorites.add(&recipe("1", "Pasta", "Pasta", "Italian"));
        favorites.add(&recipe("2", "Curry", "Curry", "Indian"));

        assert!(!favorites.remove("99"));
        assert!(favorites.remove("1"));
        assert!(!favorites.is_favorite("1"));
        assert_eq!(ids(&favorites.list()), vec!["2"]);
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let favorites = FavoritesStore::new(store());
        let curry = recipe("2", "Curry", "Curry", "Indian");
        favorites.add(&recipe("1", "Pasta", "Pasta", "Italian"));

        assert!(favorites.toggle(&curry));
        assert!(favorites.is_favorite("2"));
        assert!(!favorites.toggle(&curry));
        assert!(!favorites.is_favorite("2"));
        assert_eq!(ids(&favorites.list()), vec!["1"]);
    }

    #[test]
    fn test_persisted_round_trip_preserves_order() {
        let backing = store();
        let favorites = FavoritesStore::new(backing.clone());
        for id in ["3", "1", "2"] {
            favorites.add(&recipe(id, "Dish", "Misc", "Unknown"));
        }
        favorites.remove("1");
        favorites.add(&recipe("1", "Dish", "Misc", "Unknown"));

        let reloaded = FavoritesStore::new(backing);
        assert_eq!(ids(&reloaded.list()), vec!["3", "2", "1"]);
        assert!(reloaded.list().iter().all(|r| r.is_favorite));
    }

    #[test]
    fn test_clear_persists_empty_set() {
        let backing = store();
        let favorites = FavoritesStore::new(backing.clone());
        favorites.add(&recipe("1", "Pasta", "Pasta", "Italian"));
        favorites.clear();

        assert_eq!(favorites.count(), 0);
        assert_eq!(FavoritesStore::new(backing).count(), 0);
    }

    #[test]
    fn test_subscribers_see_each_replacement() {
        let favorites = FavoritesStore::new(store());
        let mut rx = favorites.subscribe();

        favorites.add(&recipe("1", "Pasta", "Pasta", "Italian"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        // No-op mutations do not notify
        favorites.remove("404");
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_persistence_failure_keeps_in_memory_state() {
        let favorites = FavoritesStore::new(Arc::new(FailingStore));
        assert_eq!(favorites.count(), 0);

        assert!(favorites.add(&recipe("1", "Pasta", "Pasta", "Italian")));
        assert!(favorites.is_favorite("1"));
    }

    #[test]
    fn test_load_drops_duplicates() {
        let backing = store();
        let dup = vec![
            recipe("1", "Pasta", "Pasta", "Italian"),
            recipe("1", "Pasta again", "Pasta", "Italian"),
            recipe("", "No id", "Pasta", "Italian"),
        ];
        save_json(&*backing, FAVORITES_KEY, &dup).unwrap();

        let favorites = FavoritesStore::new(backing);
        assert_eq!(favorites.count(), 1);
        assert_eq!(favorites.list()[0].name, "Pasta");
    }

    #[test]
    fn test_overlay() {
        let favorites = FavoritesStore::new(store());
        favorites.add(&recipe("2", "Curry", "Curry", "Indian"));

        let results = vec![
            recipe("1", "Pasta", "Pasta", "Italian"),
            recipe("2", "Curry", "Curry", "Indian"),
        ];
        let overlaid = favorites.overlay(&results);
        assert!(!overlaid[0].is_favorite);
        assert!(overlaid[1].is_favorite);
    }
}
