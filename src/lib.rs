//! Client-side home feed subsystem for a news backend.
//!
//! The backend owns all data and business logic; this crate owns the
//! screen-session state the client must keep consistent across
//! user-driven category switches, infinite-scroll pagination, and
//! pull-to-refresh, without ever showing an article that is already on
//! the "top stories" surface:
//!
//! - [`FeedStore`]: per-category article cache (ordered, id-unique,
//!   with the page counter and `has_more` flag).
//! - [`filter_new`] / [`HeadlineSet`]: pure dedup filtering against
//!   already-cached ids and the headline exclusion set.
//! - [`Paginator`]: per-category fetch phases and page sequencing; a
//!   second "load more" trigger before the first resolves is coalesced.
//! - [`FeedSession`]: the orchestrator for category switching (cached
//!   switches render instantly and refresh silently), load-more,
//!   pull-to-refresh, and preload seeding.
//! - [`LoadingGate`]: the debounced blocking-loading indicator; fast
//!   fetches and cache hits never flash a spinner.
//! - [`ApiClient`]: the thin REST client for `/articles/home` and
//!   friends.
//! - [`ArticleLoader`]: LRU fetch-through cache for full articles.
//!
//! State is purely in-memory and tied to the session's lifetime;
//! nothing here persists or renders.

pub mod api;
pub mod config;
pub mod content;
pub mod feed;
pub mod loading;

pub use api::{ApiClient, ApiError, Article, Category, Headline};
pub use config::{ConfigError, FeedConfig};
pub use content::ArticleLoader;
pub use feed::{
    filter_new, FeedSession, FeedState, FeedStore, FetchParams, FetchPhase, HeadlineSet,
    InitialLoad, LoadMoreOutcome, Paginator, RefreshOutcome, SwitchOutcome,
};
pub use loading::{LoadingGate, LoadingState};
