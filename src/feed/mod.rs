//! Category-scoped feed cache: store, dedup, pagination, and the
//! session state machine that ties them together.

mod dedup;
mod paginator;
mod session;
mod store;

pub use dedup::{filter_new, HeadlineSet};
pub use paginator::{FetchParams, FetchPhase, Paginator};
pub use session::{FeedSession, InitialLoad, LoadMoreOutcome, RefreshOutcome, SwitchOutcome};
pub use store::{FeedState, FeedStore};
