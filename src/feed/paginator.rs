use crate::api::Category;
use crate::feed::store::FeedState;
use std::collections::HashMap;

// ============================================================================
// Fetch phases
// ============================================================================

/// Per-category fetch progress.
///
/// One page-advancing fetch may be in flight per category at a time;
/// the phase is the in-flight flag. Rapid repeated "load more" triggers
/// coalesce here instead of double-advancing the page counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// No fetch in flight.
    #[default]
    Idle,
    /// Page 1 fetch in flight (initial load, switch, or refresh).
    Fetching,
    /// A "load more" page fetch in flight.
    FetchingMore,
}

/// Page number and requested page size for one backend fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchParams {
    pub page: u32,
    pub limit: u32,
}

// ============================================================================
// Paginator
// ============================================================================

/// Sequences page requests per category.
///
/// Hands out [`FetchParams`] only when the category is idle, so a second
/// trigger before the prior request resolves gets `None` instead of an
/// advanced page number. `finish` must run on success and failure alike;
/// it is the `finally` path that keeps the UI from wedging in a loading
/// state.
#[derive(Debug)]
pub struct Paginator {
    phases: HashMap<Category, FetchPhase>,
    initial_limit: u32,
    page_limit: u32,
}

impl Paginator {
    /// `initial_limit` applies to the very first page of any category
    /// (and to refreshes); `page_limit` to subsequent pages. Zero limits
    /// are clamped to 1.
    pub fn new(initial_limit: u32, page_limit: u32) -> Self {
        Self {
            phases: HashMap::new(),
            initial_limit: initial_limit.max(1),
            page_limit: page_limit.max(1),
        }
    }

    pub fn phase(&self, category: Category) -> FetchPhase {
        self.phases.get(&category).copied().unwrap_or_default()
    }

    pub fn is_idle(&self, category: Category) -> bool {
        self.phase(category) == FetchPhase::Idle
    }

    /// Begin a page-1 fetch. Returns `None` if a fetch for this category
    /// is already in flight.
    pub fn begin_initial(&mut self, category: Category) -> Option<FetchParams> {
        if !self.is_idle(category) {
            return None;
        }
        self.phases.insert(category, FetchPhase::Fetching);
        Some(FetchParams {
            page: 1,
            limit: self.initial_limit,
        })
    }

    /// Begin a "load more" fetch for the next page. Returns `None` if a
    /// fetch is already in flight or the category is exhausted; the page
    /// counter is only ever advanced once per resolved fetch.
    pub fn begin_more(&mut self, category: Category, state: &FeedState) -> Option<FetchParams> {
        if !self.is_idle(category) || !state.has_more() {
            return None;
        }
        self.phases.insert(category, FetchPhase::FetchingMore);
        Some(FetchParams {
            page: state.page() + 1,
            limit: self.page_limit,
        })
    }

    /// Return the category to idle. Runs on success and failure alike.
    pub fn finish(&mut self, category: Category) {
        self.phases.insert(category, FetchPhase::Idle);
    }

    pub fn initial_limit(&self) -> u32 {
        self.initial_limit
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::store::FeedStore;

    #[test]
    fn test_initial_params_are_page_one_small_limit() {
        let mut paginator = Paginator::new(5, 10);
        let params = paginator.begin_initial(Category::Politics).unwrap();
        assert_eq!(params, FetchParams { page: 1, limit: 5 });
        assert_eq!(paginator.phase(Category::Politics), FetchPhase::Fetching);
    }

    #[test]
    fn test_more_params_advance_page_with_larger_limit() {
        let mut store = FeedStore::new();
        store.commit_page(Category::Politics, 1, 5, 5);

        let mut paginator = Paginator::new(5, 10);
        let params = paginator
            .begin_more(Category::Politics, store.get(Category::Politics))
            .unwrap();
        assert_eq!(params, FetchParams { page: 2, limit: 10 });
        assert_eq!(paginator.phase(Category::Politics), FetchPhase::FetchingMore);
    }

    #[test]
    fn test_no_double_advance_without_finish() {
        let mut store = FeedStore::new();
        store.commit_page(Category::Politics, 1, 5, 5);

        let mut paginator = Paginator::new(5, 10);
        let first = paginator.begin_more(Category::Politics, store.get(Category::Politics));
        assert!(first.is_some());

        // Rapid second trigger before the first resolves: coalesced
        let second = paginator.begin_more(Category::Politics, store.get(Category::Politics));
        assert!(second.is_none());

        // After the fetch settles the next trigger advances exactly once
        store.commit_page(Category::Politics, 2, 10, 10);
        paginator.finish(Category::Politics);
        let third = paginator
            .begin_more(Category::Politics, store.get(Category::Politics))
            .unwrap();
        assert_eq!(third.page, 3);
    }

    #[test]
    fn test_exhausted_category_yields_no_params() {
        let mut store = FeedStore::new();
        store.mark_exhausted(Category::World);

        let mut paginator = Paginator::new(5, 10);
        assert!(paginator
            .begin_more(Category::World, store.get(Category::World))
            .is_none());
        // Phase stays idle when nothing was begun
        assert!(paginator.is_idle(Category::World));
    }

    #[test]
    fn test_initial_blocked_while_more_in_flight() {
        let mut store = FeedStore::new();
        store.commit_page(Category::Tech, 1, 5, 5);

        let mut paginator = Paginator::new(5, 10);
        paginator
            .begin_more(Category::Tech, store.get(Category::Tech))
            .unwrap();
        assert!(paginator.begin_initial(Category::Tech).is_none());
    }

    #[test]
    fn test_categories_are_independent() {
        let store = FeedStore::new();
        let mut paginator = Paginator::new(5, 10);

        paginator.begin_initial(Category::Politics).unwrap();
        // A fetch in flight for Politics does not block Sports
        assert!(paginator.begin_initial(Category::Sports).is_some());
        assert!(paginator
            .begin_more(Category::Economy, store.get(Category::Economy))
            .is_some());
    }

    #[test]
    fn test_zero_limits_clamped() {
        let paginator = Paginator::new(0, 0);
        assert_eq!(paginator.initial_limit(), 1);
        assert_eq!(paginator.page_limit(), 1);
    }
}
