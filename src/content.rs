//! Full-article loading with a bounded in-memory cache.
//!
//! The feed list carries article summaries; opening one needs the full
//! payload from `GET /articles/{id}`. Recently opened articles are kept
//! in an LRU cache so re-opening is instant, and each open reports a
//! view to the backend's tracking endpoint (fire-and-forget).

use crate::api::{ApiClient, ApiError, Article};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Fetch-through cache for single full articles.
pub struct ArticleLoader {
    api: ApiClient,
    cache: LruCache<String, Article>,
}

impl ArticleLoader {
    /// Default number of full articles kept in memory.
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(api: ApiClient) -> Self {
        // DEFAULT_CAPACITY is a non-zero constant
        let capacity = NonZeroUsize::new(Self::DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self::with_capacity(api, capacity)
    }

    pub fn with_capacity(api: ApiClient, capacity: NonZeroUsize) -> Self {
        Self {
            api,
            cache: LruCache::new(capacity),
        }
    }

    /// Return the full article, from cache or the backend.
    ///
    /// Every open fires a view-tracking POST; tracking failures are
    /// logged and swallowed; the article is returned regardless.
    ///
    /// # Errors
    ///
    /// [`ApiError`] when the article itself cannot be fetched (cache
    /// misses only; cached articles never fail).
    pub async fn open(&mut self, id: &str) -> Result<Article, ApiError> {
        if let Some(article) = self.cache.get(id) {
            let article = article.clone();
            tracing::debug!(article_id = %id, "Article served from cache");
            self.report_view(id).await;
            return Ok(article);
        }

        let article = self.api.article(id).await?;
        self.cache.put(id.to_string(), article.clone());
        self.report_view(id).await;
        Ok(article)
    }

    /// Forward accumulated reading time to the backend. Fire-and-forget:
    /// failures are logged and swallowed.
    pub async fn record_read(&self, id: &str, minutes_read: f64) {
        if let Err(e) = self.api.track_read(id, minutes_read).await {
            tracing::debug!(article_id = %id, error = %e, "Read tracking failed");
        }
    }

    /// Drop a cached article (e.g. after an edit elsewhere). Returns
    /// whether an entry was present.
    pub fn invalidate(&mut self, id: &str) -> bool {
        self.cache.pop(id).is_some()
    }

    /// Number of articles currently cached.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    async fn report_view(&self, id: &str) {
        if let Err(e) = self.api.track_view(id).await {
            tracing::debug!(article_id = %id, error = %e, "View tracking failed");
        }
    }
}
