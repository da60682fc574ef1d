use crate::api::{Article, Category};
use std::collections::{HashMap, HashSet};

// ============================================================================
// Per-category feed state
// ============================================================================

/// Cached feed state for one category.
///
/// `articles` is ordered, unique by id, and append-only between full
/// resets; `page` is the last page fetched (starting at 1); `has_more`
/// stays true until a fetch comes back shorter than requested.
#[derive(Debug, Clone)]
pub struct FeedState {
    articles: Vec<Article>,
    ids: HashSet<String>,
    page: u32,
    has_more: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            ids: HashSet::new(),
            page: 1,
            has_more: true,
        }
    }
}

impl FeedState {
    /// The cached articles, in insertion order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Ids of every cached article, for dedup checks.
    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    /// Last page fetched for this category.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Whether additional pages are believed to exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

// ============================================================================
// Keyed store
// ============================================================================

/// Per-category article cache.
///
/// One [`FeedState`] per [`Category`], owned by a plain struct so the
/// cache is constructible and testable outside any rendering context.
/// Entries are partitioned by category: the active fetch for a category
/// is the only writer of its entry, and nothing here is shared across
/// threads.
#[derive(Debug, Default)]
pub struct FeedStore {
    states: HashMap<Category, FeedState>,
    // Returned by `get` for categories never written to.
    empty: FeedState,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a category. Absent categories read as the
    /// empty default (`articles: [], page: 1, has_more: true`).
    pub fn get(&self, category: Category) -> &FeedState {
        self.states.get(&category).unwrap_or(&self.empty)
    }

    /// Overwrite a category's articles wholesale.
    ///
    /// Resets `page` to 1 and recomputes `has_more` from the batch size
    /// against the requested page size (`>=`: an exactly-full page means
    /// "maybe more", a short page means "definitely exhausted").
    pub fn replace(&mut self, category: Category, articles: Vec<Article>, requested_limit: u32) {
        let has_more = articles.len() >= requested_limit as usize;
        let ids = articles.iter().map(|a| a.id.clone()).collect();
        let state = self.states.entry(category).or_default();
        state.ids = ids;
        state.articles = articles;
        state.page = 1;
        state.has_more = has_more;
        tracing::debug!(
            category = %category,
            count = state.articles.len(),
            has_more = has_more,
            "Replaced feed state"
        );
    }

    /// Seed a category from externally preloaded data.
    ///
    /// Like [`replace`](Self::replace) but leaves `has_more` true: the
    /// preload does not carry pagination information, so exhaustion is
    /// unknown until the first real fetch.
    pub fn seed(&mut self, category: Category, articles: Vec<Article>) {
        let ids = articles.iter().map(|a| a.id.clone()).collect();
        let state = self.states.entry(category).or_default();
        state.ids = ids;
        state.articles = articles;
        state.page = 1;
        state.has_more = true;
        tracing::debug!(category = %category, count = state.articles.len(), "Seeded feed state");
    }

    /// Append articles not already present (by id) to the end of a
    /// category's list. Existing entries are never reordered, and
    /// `page`/`has_more` are untouched. Returns how many were added.
    pub fn append(&mut self, category: Category, articles: Vec<Article>) -> usize {
        let state = self.states.entry(category).or_default();
        let before = state.articles.len();
        for article in articles {
            if state.ids.insert(article.id.clone()) {
                state.articles.push(article);
            }
        }
        state.articles.len() - before
    }

    /// Commit the pagination result of a "load more" fetch: advance the
    /// page counter and recompute `has_more` from the RAW response size.
    /// Called even when every article in the page was filtered away,
    /// otherwise pagination would stall on a page of already-seen items.
    pub(crate) fn commit_page(
        &mut self,
        category: Category,
        page: u32,
        response_len: usize,
        requested_limit: u32,
    ) {
        let state = self.states.entry(category).or_default();
        state.page = page;
        state.has_more = response_len >= requested_limit as usize;
    }

    /// Mark a category as having no further pages. Only
    /// [`replace`](Self::replace) or [`seed`](Self::seed) can bring
    /// `has_more` back.
    pub(crate) fn mark_exhausted(&mut self, category: Category) {
        let state = self.states.entry(category).or_default();
        state.has_more = false;
    }
}
