use crate::api::{Article, Headline};
use std::collections::HashSet;

// ============================================================================
// Headline exclusion set
// ============================================================================

/// Ids of articles already shown on the "top stories" surface.
///
/// Built once from the externally supplied headline list and immutable
/// for the lifetime of the screen session; later headline updates do not
/// feed back into it. Articles with these ids are kept out of the main
/// scrollable feed so the same story never appears twice.
#[derive(Debug, Clone, Default)]
pub struct HeadlineSet {
    ids: HashSet<String>,
}

impl HeadlineSet {
    /// Empty set: nothing is excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect ids from a headline list. Rows without a usable id are
    /// skipped.
    pub fn from_headlines(headlines: &[Headline]) -> Self {
        let ids: HashSet<String> = headlines
            .iter()
            .filter_map(|h| h.article_id().map(str::to_owned))
            .collect();
        if ids.len() < headlines.len() {
            tracing::debug!(
                total = headlines.len(),
                usable = ids.len(),
                "Some headline rows had no article id"
            );
        }
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ============================================================================
// Dedup filter
// ============================================================================

/// Keep only the candidates that are genuinely new.
///
/// An article survives iff its id is not in `existing`, not in
/// `excluded`, and has not already appeared earlier in the same batch.
/// Input order is preserved. Pure function, no side effects.
pub fn filter_new(
    candidates: Vec<Article>,
    existing: &HashSet<String>,
    excluded: &HashSet<String>,
) -> Vec<Article> {
    let mut seen_in_batch: HashSet<String> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|article| {
            !existing.contains(&article.id)
                && !excluded.contains(&article.id)
                && seen_in_batch.insert(article.id.clone())
        })
        .collect()
}
