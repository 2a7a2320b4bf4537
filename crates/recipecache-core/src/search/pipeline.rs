//! Debounced, latest-wins search pipeline.
//!
//! The UI pushes raw query text into a `SearchHandle`. A single worker task
//! owns all pipeline state and reacts to four inputs in a `select!` loop:
//! new input, the debounce deadline, finished resolutions, and cache
//! snapshot changes.
//!
//! Each dispatched query gets a new generation number. Resolutions run in
//! their own tasks and report back tagged with the generation they were
//! started for; anything but the latest generation is dropped, so a slow
//! answer to an old query can never overwrite a newer one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::api::CatalogSource;
use crate::cache::{CacheSnapshot, RecipeCache};
use crate::models::Recipe;
use crate::normalizer::normalize_meals;

use super::filter::{filter_recipes, matches_query, refine, SearchRequest};
use super::history::SearchHistory;

// ============================================================================
// Configuration
// ============================================================================

/// Quiet period after the last keystroke before a query is dispatched
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Artificial delay on cache hits so the loading state is visible
pub const DEFAULT_UX_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub debounce: Duration,
    pub ux_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            ux_delay: Duration::from_millis(DEFAULT_UX_DELAY_MS),
        }
    }
}

// ============================================================================
// Published state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// No query: the full working set is shown
    Idle,
    /// A query was dispatched and has not resolved yet
    Loading,
    Ready,
    NoResults,
}

/// Where the visible result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrigin {
    /// The whole cache snapshot (idle)
    Snapshot,
    /// Matches filtered out of the cache snapshot
    Cache,
    /// The remote catalog's text search
    Remote,
    /// The remote search failed; the result set is empty
    Unavailable,
}

/// The visible result set and what produced it.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub generation: u64,
    pub query: String,
    pub status: SearchStatus,
    pub origin: ResultOrigin,
    pub recipes: Arc<Vec<Recipe>>,
}

impl SearchState {
    fn idle(generation: u64, request: &SearchRequest, snapshot: &Arc<Vec<Recipe>>) -> Self {
        let recipes = if request.is_unrefined() {
            snapshot.clone()
        } else {
            Arc::new(refine(snapshot.to_vec(), &request.filters, request.sort))
        };

        Self {
            generation,
            query: String::new(),
            status: SearchStatus::Idle,
            origin: ResultOrigin::Snapshot,
            recipes,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    /// Whether the search came back empty because the catalog was unreachable,
    /// as opposed to a genuine no-match.
    pub fn is_unavailable(&self) -> bool {
        self.origin == ResultOrigin::Unavailable
    }
}

// ============================================================================
// Handle
// ============================================================================

/// Front end of the search pipeline. Dropping it stops the worker.
pub struct SearchHandle {
    requests_tx: mpsc::UnboundedSender<SearchRequest>,
    state_rx: watch::Receiver<SearchState>,
    worker: JoinHandle<()>,
}

impl SearchHandle {
    /// Start the worker. Must be called from within a Tokio runtime.
    pub fn spawn(
        cache: Arc<RecipeCache>,
        source: Arc<dyn CatalogSource>,
        history: Arc<SearchHistory>,
        config: SearchConfig,
    ) -> Self {
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let snapshot_rx = cache.subscribe();
        let initial = SearchState::idle(
            0,
            &SearchRequest::default(),
            cache.current_snapshot().recipes(),
        );
        let (state_tx, state_rx) = watch::channel(initial);

        let worker = SearchWorker {
            cache,
            source,
            history,
            config,
            state_tx,
            completions_tx,
            generation: 0,
            last_request: None,
            pending: None,
        };
        let worker = tokio::spawn(worker.run(requests_rx, completions_rx, snapshot_rx));

        Self {
            requests_tx,
            state_rx,
            worker,
        }
    }

    /// Feed raw query text, as typed.
    pub fn query(&self, text: impl Into<String>) {
        self.submit(SearchRequest::new(text));
    }

    /// Feed a full request (text plus filters and sort).
    pub fn submit(&self, request: SearchRequest) {
        if self.requests_tx.send(request).is_err() {
            warn!("Search pipeline has stopped, dropping query");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_rx.clone()
    }

    pub fn current(&self) -> SearchState {
        self.state_rx.borrow().clone()
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

// ============================================================================
// Worker
// ============================================================================

struct PendingRequest {
    request: SearchRequest,
    deadline: Instant,
}

struct Resolution {
    recipes: Vec<Recipe>,
    origin: ResultOrigin,
}

struct Completion {
    generation: u64,
    request: SearchRequest,
    resolution: Resolution,
}

struct SearchWorker {
    cache: Arc<RecipeCache>,
    source: Arc<dyn CatalogSource>,
    history: Arc<SearchHistory>,
    config: SearchConfig,
    state_tx: watch::Sender<SearchState>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    generation: u64,
    /// Last request that made it past the debounce
    last_request: Option<SearchRequest>,
    pending: Option<PendingRequest>,
}

impl SearchWorker {
    async fn run(
        mut self,
        mut requests_rx: mpsc::UnboundedReceiver<SearchRequest>,
        mut completions_rx: mpsc::UnboundedReceiver<Completion>,
        mut snapshot_rx: watch::Receiver<CacheSnapshot>,
    ) {
        let mut snapshot_open = true;

        loop {
            let deadline = self.pending.as_ref().map(|p| p.deadline);

            tokio::select! {
                request = requests_rx.recv() => match request {
                    Some(request) => {
                        // Each keystroke restarts the quiet period
                        self.pending = Some(PendingRequest {
                            request,
                            deadline: Instant::now() + self.config.debounce,
                        });
                    }
                    None => {
                        debug!("Search input closed, stopping pipeline");
                        break;
                    }
                },
                _ = debounce_elapsed(deadline) => {
                    if let Some(pending) = self.pending.take() {
                        self.dispatch(pending.request);
                    }
                }
                Some(completion) = completions_rx.recv() => {
                    self.complete(completion);
                }
                changed = snapshot_rx.changed(), if snapshot_open => {
                    if changed.is_err() {
                        snapshot_open = false;
                        continue;
                    }
                    let snapshot = snapshot_rx.borrow_and_update().recipes().clone();
                    self.on_snapshot(&snapshot);
                }
            }
        }
    }

    fn dispatch(&mut self, request: SearchRequest) {
        let request = request.normalized();
        if self.last_request.as_ref() == Some(&request) {
            debug!(query = %request.text, "Query unchanged, skipping");
            return;
        }

        self.generation += 1;
        let generation = self.generation;
        self.last_request = Some(request.clone());

        if request.is_idle() {
            let snapshot = self.cache.current_snapshot();
            self.state_tx
                .send_replace(SearchState::idle(generation, &request, snapshot.recipes()));
            return;
        }

        self.history.record(&request.text);

        self.state_tx.send_modify(|state| {
            state.generation = generation;
            state.query = request.text.clone();
            state.status = SearchStatus::Loading;
        });

        debug!(generation, query = %request.text, "Dispatching search");

        let cache = self.cache.clone();
        let source = self.source.clone();
        let ux_delay = self.config.ux_delay;
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let resolution = resolve(&cache, source.as_ref(), &request.text, ux_delay).await;
            // The worker is gone if this fails; nothing left to update
            let _ = tx.send(Completion {
                generation,
                request,
                resolution,
            });
        });
    }

    fn complete(&mut self, completion: Completion) {
        if completion.generation != self.generation {
            debug!(
                generation = completion.generation,
                latest = self.generation,
                query = %completion.request.text,
                "Discarding superseded search result"
            );
            return;
        }

        let Completion {
            generation,
            request,
            resolution,
        } = completion;

        let recipes = refine(resolution.recipes, &request.filters, request.sort);
        let status = if recipes.is_empty() {
            SearchStatus::NoResults
        } else {
            SearchStatus::Ready
        };

        debug!(
            generation,
            query = %request.text,
            count = recipes.len(),
            origin = ?resolution.origin,
            "Search resolved"
        );

        self.state_tx.send_replace(SearchState {
            generation,
            query: request.text,
            status,
            origin: resolution.origin,
            recipes: Arc::new(recipes),
        });
    }

    /// While idle the visible set is the snapshot itself, so it follows
    /// every snapshot replacement.
    fn on_snapshot(&mut self, snapshot: &Arc<Vec<Recipe>>) {
        if self.state_tx.borrow().status != SearchStatus::Idle {
            return;
        }

        let request = self.last_request.clone().unwrap_or_default();
        self.state_tx
            .send_replace(SearchState::idle(self.generation, &request, snapshot));
    }
}

async fn debounce_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Answer a non-empty query: cache snapshot first, remote catalog otherwise.
async fn resolve(
    cache: &RecipeCache,
    source: &dyn CatalogSource,
    query: &str,
    ux_delay: Duration,
) -> Resolution {
    let snapshot = cache.current_snapshot();
    let hits = filter_recipes(snapshot.recipes(), query);

    if !hits.is_empty() {
        debug!(query, count = hits.len(), "Search served from cache");
        tokio::time::sleep(ux_delay).await;
        return Resolution {
            recipes: hits,
            origin: ResultOrigin::Cache,
        };
    }

    match source.search_by_text(query).await {
        Ok(meals) => {
            let needle = query.to_lowercase();
            let recipes: Vec<Recipe> = normalize_meals(&meals)
                .into_iter()
                .filter(|r| matches_query(r, &needle))
                .collect();
            debug!(query, count = recipes.len(), "Search served from remote catalog");
            Resolution {
                recipes,
                origin: ResultOrigin::Remote,
            }
        }
        Err(e) => {
            warn!(query, error = %e, "Remote search failed");
            Resolution {
                recipes: Vec::new(),
                origin: ResultOrigin::Unavailable,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchFilters, SortOrder};
    use crate::storage::MemoryStore;
    use crate::testing::{recipe, FakeCatalog};
    use tokio::time::{sleep, timeout};

    fn catalog() -> Vec<Recipe> {
        vec![
            recipe("1", "Penne Arrabbiata", "Pasta", "Italian"),
            recipe("2", "Butter Chicken", "Chicken", "Indian"),
            recipe("3", "Lasagne", "Pasta", "Italian"),
        ]
    }

    struct Harness {
        catalog: Arc<FakeCatalog>,
        history: Arc<SearchHistory>,
        cache: Arc<RecipeCache>,
        handle: SearchHandle,
    }

    async fn harness(fake: FakeCatalog) -> Harness {
        let fake = Arc::new(fake.with_catalog(catalog()));
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(RecipeCache::new(fake.clone(), store.clone()));
        cache.initialize().await;
        let history = Arc::new(SearchHistory::new(store));
        let handle = SearchHandle::spawn(
            cache.clone(),
            fake.clone(),
            history.clone(),
            SearchConfig::default(),
        );
        Harness {
            catalog: fake,
            history,
            cache,
            handle,
        }
    }

    async fn settled(rx: &mut watch::Receiver<SearchState>, generation: u64) -> SearchState {
        timeout(
            Duration::from_secs(30),
            rx.wait_for(|s| s.generation == generation && !s.is_loading()),
        )
        .await
        .expect("search did not settle")
        .expect("pipeline stopped")
        .clone()
    }

    fn names(state: &SearchState) -> Vec<&str> {
        state.recipes.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_shows_full_snapshot() {
        let h = harness(FakeCatalog::new()).await;
        let state = h.handle.current();
        assert_eq!(state.status, SearchStatus::Idle);
        assert_eq!(state.origin, ResultOrigin::Snapshot);
        assert_eq!(state.recipes.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_follows_snapshot_changes() {
        let fake = Arc::new(FakeCatalog::new().with_catalog(catalog()));
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(RecipeCache::new(fake.clone(), store.clone()));
        let handle = SearchHandle::spawn(
            cache.clone(),
            fake,
            Arc::new(SearchHistory::new(store)),
            SearchConfig::default(),
        );
        assert!(handle.current().recipes.is_empty());

        cache.initialize().await;
        let mut rx = handle.subscribe();
        let state = timeout(Duration::from_secs(5), rx.wait_for(|s| s.recipes.len() == 3))
            .await
            .expect("idle state never caught up")
            .expect("pipeline stopped")
            .clone();
        assert_eq!(state.status, SearchStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit() {
        let h = harness(FakeCatalog::new()).await;
        let mut rx = h.handle.subscribe();

        h.handle.query("pasta");
        let state = settled(&mut rx, 1).await;

        assert_eq!(state.status, SearchStatus::Ready);
        assert_eq!(state.origin, ResultOrigin::Cache);
        assert_eq!(names(&state), vec!["Penne Arrabbiata", "Lasagne"]);
        // Only the bootstrap fetch reached the catalog
        assert_eq!(h.catalog.search_calls(), vec![""]);
        assert_eq!(h.history.entries(), vec!["pasta"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_dispatches_only_last_query() {
        let h = harness(FakeCatalog::new()).await;
        let mut rx = h.handle.subscribe();

        for text in ["b", "bu", "but", "butt", "butter"] {
            h.handle.query(text);
            sleep(Duration::from_millis(50)).await;
        }
        let state = settled(&mut rx, 1).await;
        assert_eq!(state.query, "butter");
        assert_eq!(names(&state), vec!["Butter Chicken"]);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(h.handle.current().generation, 1);
        assert_eq!(h.history.entries(), vec!["butter"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_query_is_suppressed() {
        let h = harness(FakeCatalog::new()).await;
        let mut rx = h.handle.subscribe();

        h.handle.query("zzzznotfound");
        settled(&mut rx, 1).await;
        let calls = h.catalog.search_calls().len();

        h.handle.query("  zzzznotfound ");
        sleep(Duration::from_secs(2)).await;

        assert_eq!(h.handle.current().generation, 1);
        assert_eq!(h.catalog.search_calls().len(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_miss_is_no_results() {
        let h = harness(FakeCatalog::new()).await;
        let mut rx = h.handle.subscribe();

        h.handle.query("zzzznotfound");
        let state = settled(&mut rx, 1).await;

        assert_eq!(state.status, SearchStatus::NoResults);
        assert_eq!(state.origin, ResultOrigin::Remote);
        assert!(!state.is_unavailable());
        assert!(h.catalog.search_calls().contains(&"zzzznotfound".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_hit() {
        let gumbo = recipe("52", "Seafood Gumbo", "Seafood", "American");
        let h = harness(FakeCatalog::new().with_search("gumbo", vec![gumbo])).await;
        let mut rx = h.handle.subscribe();

        h.handle.query("gumbo");
        let state = settled(&mut rx, 1).await;

        assert_eq!(state.status, SearchStatus::Ready);
        assert_eq!(state.origin, ResultOrigin::Remote);
        assert_eq!(names(&state), vec!["Seafood Gumbo"]);
        // Remote results do not enter the cache
        assert_eq!(h.cache.current_snapshot().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_failure_is_unavailable() {
        let h = harness(FakeCatalog::new()).await;
        h.catalog.set_failing(true);
        let mut rx = h.handle.subscribe();

        h.handle.query("gumbo");
        let state = settled(&mut rx, 1).await;

        assert_eq!(state.status, SearchStatus::NoResults);
        assert!(state.is_unavailable());
        assert!(state.recipes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_stale_result_is_discarded() {
        let fake = FakeCatalog::new()
            .with_search("slowpoke", vec![recipe("90", "Slowpoke Stew", "Misc", "Unknown")])
            .with_delay("slowpoke", Duration::from_secs(3))
            .with_search("quick", vec![recipe("91", "Quick Bread", "Misc", "Unknown")]);
        let h = harness(fake).await;
        let mut rx = h.handle.subscribe();

        h.handle.query("slowpoke");
        sleep(Duration::from_millis(400)).await;
        assert!(h.handle.current().is_loading());

        h.handle.query("quick");
        let state = settled(&mut rx, 2).await;
        assert_eq!(names(&state), vec!["Quick Bread"]);

        // Let the slow request finish
        sleep(Duration::from_secs(5)).await;
        assert!(h.catalog.search_calls().contains(&"slowpoke".to_string()));
        let state = h.handle.current();
        assert_eq!(state.generation, 2);
        assert_eq!(names(&state), vec!["Quick Bread"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_query_supersedes_in_flight_search() {
        let fake = FakeCatalog::new()
            .with_search("slowpoke", vec![recipe("90", "Slowpoke Stew", "Misc", "Unknown")])
            .with_delay("slowpoke", Duration::from_secs(3));
        let h = harness(fake).await;

        h.handle.query("slowpoke");
        sleep(Duration::from_millis(400)).await;
        h.handle.query("   ");
        sleep(Duration::from_secs(5)).await;

        let state = h.handle.current();
        assert_eq!(state.generation, 2);
        assert_eq!(state.status, SearchStatus::Idle);
        assert_eq!(state.recipes.len(), 3);
        assert_eq!(h.history.entries(), vec!["slowpoke"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filters_and_sort_apply_to_results() {
        let h = harness(FakeCatalog::new()).await;
        let mut rx = h.handle.subscribe();

        let request = SearchRequest::new("a")
            .with_filters(SearchFilters::from_selection("Pasta", "All"))
            .with_sort(SortOrder::Name);
        h.handle.submit(request);
        let state = settled(&mut rx, 1).await;
        assert_eq!(names(&state), vec!["Lasagne", "Penne Arrabbiata"]);

        // Changing only the sort is a new request
        let request = SearchRequest::new("a")
            .with_filters(SearchFilters::from_selection("Pasta", "All"))
            .with_sort(SortOrder::Relevance);
        h.handle.submit(request);
        let state = settled(&mut rx, 2).await;
        assert_eq!(names(&state), vec!["Penne Arrabbiata", "Lasagne"]);
    }
}
