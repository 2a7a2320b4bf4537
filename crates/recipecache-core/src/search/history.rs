use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::storage::{load_json, save_json, KeyValueStore, SEARCH_HISTORY_KEY};

/// Number of recent queries kept
pub const MAX_HISTORY_ENTRIES: usize = 5;

/// Most-recent-first list of accepted search queries.
pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
    entries: Mutex<Vec<String>>,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let mut entries = match load_json::<Vec<String>>(store.as_ref(), SEARCH_HISTORY_KEY) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load search history");
                Vec::new()
            }
        };
        entries.retain(|q| !q.trim().is_empty());
        entries.truncate(MAX_HISTORY_ENTRIES);

        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move `query` to the front, dropping the oldest entry past the cap.
    pub fn record(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let mut entries = self.lock();
        if entries.first().map(String::as_str) == Some(query) {
            return;
        }
        entries.retain(|q| q != query);
        entries.insert(0, query.to_string());
        entries.truncate(MAX_HISTORY_ENTRIES);

        debug!(query, "Recorded search");
        if let Err(e) = save_json(self.store.as_ref(), SEARCH_HISTORY_KEY, entries.as_slice()) {
            warn!(error = %e, "Failed to persist search history");
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
        if let Err(e) = self.store.remove(SEARCH_HISTORY_KEY) {
            warn!(error = %e, "Failed to remove search history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::FailingStore;

    #[test]
    fn test_most_recent_first_and_capped() {
        let history = SearchHistory::new(Arc::new(MemoryStore::new()));
        for q in ["a", "b", "c", "d", "e", "f"] {
            history.record(q);
        }
        assert_eq!(history.entries(), vec!["f", "e", "d", "c", "b"]);
    }

    #[test]
    fn test_repeat_moves_to_front() {
        let history = SearchHistory::new(Arc::new(MemoryStore::new()));
        history.record("pasta");
        history.record("curry");
        history.record("  pasta ");
        history.record("");
        assert_eq!(history.entries(), vec!["pasta", "curry"]);
    }

    #[test]
    fn test_persists_and_clears() {
        let store = Arc::new(MemoryStore::new());
        let history = SearchHistory::new(store.clone());
        history.record("soup");

        let reloaded = SearchHistory::new(store.clone());
        assert_eq!(reloaded.entries(), vec!["soup"]);

        reloaded.clear();
        assert!(reloaded.entries().is_empty());
        assert!(SearchHistory::new(store).entries().is_empty());
    }

    #[test]
    fn test_storage_failure_keeps_memory_copy() {
        let history = SearchHistory::new(Arc::new(FailingStore));
        history.record("stew");
        history.clear();
        history.record("pie");
        assert_eq!(history.entries(), vec!["pie"]);
    }
}
