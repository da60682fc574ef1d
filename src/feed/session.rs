use crate::api::{ApiClient, Article, Category, Headline};
use crate::config::FeedConfig;
use crate::feed::dedup::{filter_new, HeadlineSet};
use crate::feed::paginator::{FetchParams, Paginator};
use crate::feed::store::{FeedState, FeedStore};
use crate::loading::LoadingGate;
use std::collections::HashSet;

// ============================================================================
// Outcomes
// ============================================================================

/// Result of [`FeedSession::initial_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialLoad {
    /// The active category was already seeded from preloaded data.
    AlreadyPopulated,
    /// Page 1 fetched and stored.
    Loaded { count: usize },
    /// The fetch failed; the state is empty and the UI shows the
    /// generic empty state.
    Failed,
}

/// Result of [`FeedSession::select_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Re-selecting the active category is explicitly a no-op.
    AlreadyActive,
    /// Cached articles were shown immediately; `refreshed` reports
    /// whether the silent page-1 refresh behind them succeeded.
    ServedFromCache { refreshed: bool },
    /// Nothing was cached; page 1 was fetched behind the loading gate.
    Fetched { count: usize },
    /// Nothing was cached and the fetch failed; the category renders as
    /// empty.
    FetchFailed,
}

/// Result of [`FeedSession::load_more`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMoreOutcome {
    /// The next page was fetched; `appended` counts articles that
    /// survived dedup (possibly zero), `page` is the committed counter.
    Appended { appended: usize, page: u32 },
    /// A fetch for this category is already in flight; the trigger was
    /// coalesced.
    Busy,
    /// The category has no further pages.
    Exhausted,
    /// The fetch failed; `page` and `has_more` are unchanged and the
    /// user may retry by scrolling again.
    Failed,
}

/// Result of [`FeedSession::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Page 1 was refetched and the category replaced wholesale.
    Refreshed { count: usize },
    /// A fetch for this category is already in flight.
    Busy,
    /// The fetch failed; the cached articles and pagination state are
    /// untouched.
    Failed,
}

// ============================================================================
// Session
// ============================================================================

/// The home-feed screen's cache/pagination/dedup state machine.
///
/// Owns one [`FeedStore`] entry per category, the per-category
/// [`Paginator`] phases, the immutable [`HeadlineSet`], and the
/// [`LoadingGate`] debounce. All state is process-lifetime and tied to
/// the session; nothing is persisted.
///
/// Methods take `&mut self` and suspend only on the network calls, so a
/// category has exactly one logical writer at a time. Transport errors
/// never escape: every fetch failure is logged and folded into an
/// outcome variant, and the in-flight phase is reset on every path so
/// the UI cannot wedge in a loading state.
#[derive(Debug)]
pub struct FeedSession {
    api: ApiClient,
    store: FeedStore,
    paginator: Paginator,
    headlines: HeadlineSet,
    loading: LoadingGate,
    active: Category,
}

impl FeedSession {
    /// Session with no preloaded data; the first render should call
    /// [`initial_load`](Self::initial_load).
    pub fn new(api: ApiClient, config: &FeedConfig) -> Self {
        Self {
            api,
            store: FeedStore::new(),
            paginator: Paginator::new(config.initial_page_size, config.page_size),
            headlines: HeadlineSet::new(),
            loading: LoadingGate::new(config.loader_delay()),
            active: Category::Explore,
        }
    }

    /// Session seeded from externally preloaded data.
    ///
    /// The headline list builds the exclusion set (once, for the session
    /// lifetime) and the preloaded home articles seed the Explore state.
    /// Seeds pass through the dedup filter so the store invariant (no
    /// headline ids, no duplicates) holds from the first frame.
    pub fn with_preloaded(
        api: ApiClient,
        config: &FeedConfig,
        home_articles: Vec<Article>,
        headlines: Vec<Headline>,
    ) -> Self {
        let mut session = Self::new(api, config);
        session.headlines = HeadlineSet::from_headlines(&headlines);
        if !home_articles.is_empty() {
            let fresh = session.filter_page_one(home_articles);
            session.store.seed(Category::Explore, fresh);
        }
        session
    }

    /// Fetch the preload data (home page 1 + headline list) concurrently
    /// and build a session from whatever arrived.
    ///
    /// Either fetch failing degrades to an empty seed rather than an
    /// error: the session then behaves exactly like [`new`](Self::new).
    pub async fn bootstrap(api: ApiClient, config: &FeedConfig) -> Self {
        let initial = FetchParams {
            page: 1,
            limit: config.initial_page_size.max(1),
        };
        let (home, headlines) = futures::join!(
            api.home_page(Category::Explore, initial),
            api.headlines(),
        );
        let home = home.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Home feed preload failed");
            Vec::new()
        });
        let headlines = headlines.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Headline preload failed");
            Vec::new()
        });
        Self::with_preloaded(api, config, home, headlines)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The currently selected category.
    pub fn active(&self) -> Category {
        self.active
    }

    /// State of the active category.
    pub fn state(&self) -> &FeedState {
        self.store.get(self.active)
    }

    /// Articles of the active category, in display order.
    pub fn articles(&self) -> &[Article] {
        self.state().articles()
    }

    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    pub fn headlines(&self) -> &HeadlineSet {
        &self.headlines
    }

    /// Advance the loading-indicator clock; returns whether a blocking
    /// indicator should be visible. Intended to be called from the
    /// render/tick loop.
    pub fn poll_loading(&mut self) -> bool {
        self.loading.tick()
    }

    /// Whether the blocking indicator is currently visible (without
    /// advancing the clock).
    pub fn loading_visible(&self) -> bool {
        self.loading.is_showing()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// First load of the active category.
    ///
    /// A no-op when preloaded data already populated it. Otherwise page 1
    /// is fetched behind the loading gate; on failure the state stays
    /// empty (the UI's generic empty state) and the category is marked
    /// exhausted until a later replace.
    pub async fn initial_load(&mut self) -> InitialLoad {
        if !self.store.get(self.active).is_empty() {
            return InitialLoad::AlreadyPopulated;
        }
        match self.fetch_first_page_gated(self.active).await {
            Some(count) => InitialLoad::Loaded { count },
            None => InitialLoad::Failed,
        }
    }

    /// Switch the active category.
    ///
    /// Re-selecting the active category does nothing. A category with
    /// cached articles is shown immediately and silently refreshed in
    /// the background: no loading indicator, and the refresh replaces
    /// (not appends) page 1 with headline filtering applied. An empty
    /// category fetches page 1 behind the loading gate; the empty state
    /// is only shown once that fetch has settled and found nothing.
    pub async fn select_category(&mut self, category: Category) -> SwitchOutcome {
        if category == self.active {
            return SwitchOutcome::AlreadyActive;
        }
        self.active = category;

        if !self.store.get(category).is_empty() {
            let refreshed = self.refresh_silently(category).await;
            SwitchOutcome::ServedFromCache { refreshed }
        } else {
            match self.fetch_first_page_gated(category).await {
                Some(count) => SwitchOutcome::Fetched { count },
                None => SwitchOutcome::FetchFailed,
            }
        }
    }

    /// Fetch the next page for the active category (infinite scroll).
    ///
    /// Guarded by the per-category fetch phase and `has_more`; rapid
    /// repeated triggers coalesce into one request. The page counter and
    /// `has_more` are committed from the raw response size even when the
    /// whole page was deduplicated away; a page of already-seen
    /// articles must still advance pagination or scrolling would stall.
    pub async fn load_more(&mut self) -> LoadMoreOutcome {
        let category = self.active;
        let state = self.store.get(category);
        if !state.has_more() {
            return LoadMoreOutcome::Exhausted;
        }
        let Some(params) = self.paginator.begin_more(category, state) else {
            return LoadMoreOutcome::Busy;
        };

        let result = self.api.home_page(category, params).await;
        self.paginator.finish(category);

        match result {
            Ok(batch) => {
                let response_len = batch.len();
                let fresh = filter_new(batch, self.store.get(category).ids(), self.headlines.ids());
                let appended = self.store.append(category, fresh);
                self.store
                    .commit_page(category, params.page, response_len, params.limit);
                tracing::debug!(
                    category = %category,
                    page = params.page,
                    received = response_len,
                    appended = appended,
                    "Loaded more articles"
                );
                LoadMoreOutcome::Appended {
                    appended,
                    page: params.page,
                }
            }
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "Load more failed");
                LoadMoreOutcome::Failed
            }
        }
    }

    /// Pull-to-refresh: refetch page 1 for the active category only and
    /// replace its state wholesale. On failure the cached articles and
    /// pagination state are left untouched.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        let category = self.active;
        let Some(params) = self.paginator.begin_initial(category) else {
            return RefreshOutcome::Busy;
        };

        let result = self.api.home_page(category, params).await;
        self.paginator.finish(category);

        match result {
            Ok(batch) => {
                let fresh = self.filter_page_one(batch);
                let count = fresh.len();
                self.store.replace(category, fresh, params.limit);
                RefreshOutcome::Refreshed { count }
            }
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "Pull-to-refresh failed");
                RefreshOutcome::Failed
            }
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Page-1 fetch behind the loading gate. Returns the stored count,
    /// or `None` on failure (state left empty, category marked
    /// exhausted until the next replace).
    async fn fetch_first_page_gated(&mut self, category: Category) -> Option<usize> {
        let Some(params) = self.paginator.begin_initial(category) else {
            // A fetch for this category is already in flight; let it win.
            return None;
        };
        self.loading.arm();

        let result = self.api.home_page(category, params).await;
        self.paginator.finish(category);
        self.loading.cancel();

        match result {
            Ok(batch) => {
                let fresh = self.filter_page_one(batch);
                let count = fresh.len();
                self.store.replace(category, fresh, params.limit);
                Some(count)
            }
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "Feed fetch failed");
                self.store.mark_exhausted(category);
                None
            }
        }
    }

    /// Silent page-1 refresh behind a cached switch: replace, never
    /// append, no loading indicator. Returns whether it succeeded; a
    /// failure keeps the cached articles on screen.
    async fn refresh_silently(&mut self, category: Category) -> bool {
        let Some(params) = self.paginator.begin_initial(category) else {
            return false;
        };

        let result = self.api.home_page(category, params).await;
        self.paginator.finish(category);

        match result {
            Ok(batch) => {
                let fresh = self.filter_page_one(batch);
                self.store.replace(category, fresh, params.limit);
                true
            }
            Err(e) => {
                tracing::warn!(
                    category = %category,
                    error = %e,
                    "Background refresh failed, keeping cached articles"
                );
                self.store.mark_exhausted(category);
                false
            }
        }
    }

    /// Dedup a page-1 batch: nothing "existing" to compare against (the
    /// batch replaces the state), so only headline exclusion and
    /// in-batch duplicates apply.
    fn filter_page_one(&self, batch: Vec<Article>) -> Vec<Article> {
        let no_existing = HashSet::new();
        filter_new(batch, &no_existing, self.headlines.ids())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // No requests are issued by these tests; the client just needs a
    // parseable base URL.
    fn offline_session() -> (ApiClient, FeedConfig) {
        let config = FeedConfig::default();
        let api = ApiClient::new(&config).unwrap();
        (api, config)
    }

    fn headline_rows(ids: &[&str]) -> Vec<Headline> {
        let rows: Vec<serde_json::Value> =
            ids.iter().map(|id| serde_json::json!({"_id": id})).collect();
        serde_json::from_value(serde_json::Value::Array(rows)).unwrap()
    }

    #[test]
    fn test_new_session_starts_on_explore_empty() {
        let (api, config) = offline_session();
        let session = FeedSession::new(api, &config);
        assert_eq!(session.active(), Category::Explore);
        assert!(session.state().is_empty());
        assert!(session.headlines().is_empty());
        assert!(!session.loading_visible());
    }

    #[test]
    fn test_preload_seeds_explore_through_the_dedup_filter() {
        let (api, config) = offline_session();
        let preloaded = vec![
            Article::new("h1", None), // headline, excluded
            Article::new("e1", Some(Category::Tech)),
            Article::new("e1", Some(Category::Tech)), // in-batch duplicate
            Article::new("e2", None),
        ];
        let session =
            FeedSession::with_preloaded(api, &config, preloaded, headline_rows(&["h1", "h9"]));

        let ids: Vec<&str> = session.articles().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
        assert_eq!(session.headlines().len(), 2);
        // Preload carries no pagination info, so exhaustion is unknown
        assert!(session.state().has_more());
        assert_eq!(session.state().page(), 1);
    }

    #[test]
    fn test_empty_preload_leaves_explore_untouched() {
        let (api, config) = offline_session();
        let session = FeedSession::with_preloaded(api, &config, Vec::new(), headline_rows(&["h1"]));
        assert!(session.state().is_empty());
        assert!(session.headlines().contains("h1"));
    }

    #[tokio::test]
    async fn test_poll_loading_idle_by_default() {
        let (api, config) = offline_session();
        let mut session = FeedSession::new(api, &config);
        assert!(!session.poll_loading());
    }
}
