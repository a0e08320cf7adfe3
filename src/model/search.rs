//! Search-as-you-type: a debounced query feeding a replaceable result set

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::catalog_client::CatalogApi;
use super::collection::SongCollection;

pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    /// Debounce timer running
    Pending,
    /// Request sent, waiting for the server
    Fetching,
}

/// One-shot timer whose action can be cancelled until it fires.
///
/// Cancelling after the action started has no effect on it.
pub struct DebounceTimer {
    handle: JoinHandle<()>,
}

impl DebounceTimer {
    pub fn start<F, Fut>(delay: Duration, on_fire: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // detached so that a late cancel cannot interrupt the action
            tokio::spawn(on_fire());
        });
        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn has_fired(&self) -> bool {
        self.handle.is_finished()
    }
}

#[derive(Default)]
struct SearchShared {
    query: String,
    state: SearchState,
    /// Bumped on every accepted query change; stale fetches compare against it
    generation: u64,
    results: SongCollection,
    results_query: String,
    last_error: Option<String>,
}

/// Read-only view of the search for rendering
#[derive(Clone, Debug, Default)]
pub struct SearchSnapshot {
    pub query: String,
    pub state: SearchState,
    pub results: SongCollection,
    pub results_query: String,
    pub last_error: Option<String>,
}

pub struct SearchQuery {
    catalog: Arc<dyn CatalogApi>,
    delay: Duration,
    query: String,
    timer: Option<DebounceTimer>,
    shared: Arc<Mutex<SearchShared>>,
}

impl SearchQuery {
    pub fn new(catalog: Arc<dyn CatalogApi>, delay: Duration) -> Self {
        Self {
            catalog,
            delay,
            query: String::new(),
            timer: None,
            shared: Arc::new(Mutex::new(SearchShared::default())),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Feed the latest text of the search box.
    ///
    /// Unchanged text is ignored. Any pending timer is cancelled; empty text
    /// clears the results right away and never reaches the server.
    pub async fn update_query(&mut self, text: &str) {
        if text == self.query {
            return;
        }
        self.query = text.to_string();

        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }

        let mut shared = self.shared.lock().await;
        shared.generation += 1;
        shared.query = self.query.clone();
        shared.last_error = None;

        if self.query.is_empty() {
            shared.state = SearchState::Idle;
            shared.results.reset();
            shared.results_query.clear();
            tracing::debug!("Search cleared");
            return;
        }

        shared.state = SearchState::Pending;
        let generation = shared.generation;
        drop(shared);

        let state = self.shared.clone();
        let catalog = self.catalog.clone();
        self.timer = Some(DebounceTimer::start(self.delay, move || {
            run_search(state, catalog, generation)
        }));
    }

    /// Drop the scheduled fetch, if it has not started yet
    pub async fn cancel(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        timer.cancel();

        let mut shared = self.shared.lock().await;
        if shared.state == SearchState::Pending {
            shared.generation += 1;
            shared.state = SearchState::Idle;
            tracing::debug!(query = %shared.query, "Pending search cancelled");
        }
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.has_fired())
    }

    pub async fn state(&self) -> SearchState {
        self.shared.lock().await.state
    }

    pub async fn results(&self) -> SongCollection {
        self.shared.lock().await.results.clone()
    }

    pub async fn snapshot(&self) -> SearchSnapshot {
        let shared = self.shared.lock().await;
        SearchSnapshot {
            query: shared.query.clone(),
            state: shared.state,
            results: shared.results.clone(),
            results_query: shared.results_query.clone(),
            last_error: shared.last_error.clone(),
        }
    }
}

async fn run_search(shared: Arc<Mutex<SearchShared>>, catalog: Arc<dyn CatalogApi>, generation: u64) {
    let query = {
        let mut state = shared.lock().await;
        if state.generation != generation {
            return;
        }
        state.state = SearchState::Fetching;
        state.query.clone()
    };

    tracing::debug!(query = %query, "Performing search");
    let result = catalog.search(&query).await;

    let mut state = shared.lock().await;
    if state.generation != generation {
        tracing::debug!(query = %query, "Discarding results of a superseded search");
        return;
    }

    match result {
        Ok(objects) => {
            tracing::info!(query = %query, count = objects.len(), "Search completed successfully");
            state.results.set(objects);
            state.results_query = query;
        }
        Err(e) => {
            tracing::error!(query = %query, error = %e, "Search failed");
            state.last_error = Some(e.to_string());
        }
    }
    state.state = SearchState::Idle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::collection::tests::MockCatalog;
    use crate::model::song::SongAttributes;
    use tokio::time::sleep;

    fn catalog_with_results() -> Arc<MockCatalog> {
        Arc::new(MockCatalog {
            search_results: vec![
                SongAttributes::new("X", "Y", "y.mp3"),
                SongAttributes::new("X", "Z", "z.mp3"),
            ],
            ..Default::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_fires_after_delay() {
        let catalog = catalog_with_results();
        let mut search = SearchQuery::new(catalog.clone(), DEFAULT_SEARCH_DELAY);

        search.update_query("x").await;
        assert_eq!(search.state().await, SearchState::Pending);
        assert!(search.has_pending_timer());

        sleep(Duration::from_millis(150)).await;
        assert!(catalog.requests().is_empty());

        sleep(Duration::from_millis(100)).await;
        assert_eq!(catalog.requests(), vec!["search:x"]);
        assert_eq!(search.state().await, SearchState::Idle);

        let snapshot = search.snapshot().await;
        assert_eq!(snapshot.results.len(), 2);
        assert_eq!(snapshot.results_query, "x");
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_query_within_window_wins() {
        let catalog = catalog_with_results();
        let mut search = SearchQuery::new(catalog.clone(), DEFAULT_SEARCH_DELAY);

        search.update_query("ab").await;
        sleep(Duration::from_millis(50)).await;
        search.update_query("abc").await;
        sleep(Duration::from_millis(300)).await;

        assert_eq!(catalog.requests(), vec!["search:abc"]);
        let results = search.results().await;
        assert_eq!(results.at(0).unwrap().attributes().extra["query"], "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_text_does_not_restart_timer() {
        let catalog = catalog_with_results();
        let mut search = SearchQuery::new(catalog.clone(), DEFAULT_SEARCH_DELAY);

        search.update_query("a").await;
        sleep(Duration::from_millis(100)).await;
        search.update_query("a").await;
        sleep(Duration::from_millis(150)).await;

        assert_eq!(catalog.requests(), vec!["search:a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_clears_without_request() {
        let catalog = catalog_with_results();
        let mut search = SearchQuery::new(catalog.clone(), DEFAULT_SEARCH_DELAY);

        search.update_query("a").await;
        sleep(Duration::from_millis(300)).await;
        assert_eq!(search.results().await.len(), 2);

        search.update_query("ab").await;
        search.update_query("").await;
        assert_eq!(search.state().await, SearchState::Idle);
        assert!(search.results().await.is_empty());
        assert!(!search.has_pending_timer());

        sleep(Duration::from_millis(300)).await;
        assert_eq!(catalog.requests(), vec!["search:a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_fetch() {
        let catalog = catalog_with_results();
        let mut search = SearchQuery::new(catalog.clone(), DEFAULT_SEARCH_DELAY);

        search.update_query("a").await;
        search.cancel().await;
        assert_eq!(search.state().await, SearchState::Idle);

        sleep(Duration::from_millis(300)).await;
        assert!(catalog.requests().is_empty());
        assert_eq!(search.query(), "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_search_keeps_previous_results() {
        let catalog = Arc::new(MockCatalog {
            fail: true,
            ..Default::default()
        });
        let mut search = SearchQuery::new(catalog.clone(), DEFAULT_SEARCH_DELAY);

        search.update_query("a").await;
        sleep(Duration::from_millis(300)).await;

        let snapshot = search.snapshot().await;
        assert_eq!(snapshot.state, SearchState::Idle);
        assert!(snapshot.results.is_empty());
        assert!(snapshot.last_error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_while_fetching_supersedes_stale_response() {
        let catalog = Arc::new(MockCatalog {
            search_results: vec![SongAttributes::new("X", "Y", "y.mp3")],
            delay: Some(Duration::from_millis(500)),
            ..Default::default()
        });
        let mut search = SearchQuery::new(catalog.clone(), DEFAULT_SEARCH_DELAY);

        // "a" fires at 200ms and answers at 700ms
        search.update_query("a").await;
        sleep(Duration::from_millis(300)).await;
        assert_eq!(search.state().await, SearchState::Fetching);

        // "ab" fires at 500ms and answers at 1000ms
        search.update_query("ab").await;
        assert_eq!(search.state().await, SearchState::Pending);

        sleep(Duration::from_millis(500)).await;
        assert_eq!(search.state().await, SearchState::Fetching);
        assert!(search.results().await.is_empty());

        sleep(Duration::from_millis(300)).await;
        let snapshot = search.snapshot().await;
        assert_eq!(catalog.requests(), vec!["search:a", "search:ab"]);
        assert_eq!(snapshot.state, SearchState::Idle);
        assert_eq!(snapshot.results_query, "ab");
        assert_eq!(snapshot.results.len(), 1);
    }
}
