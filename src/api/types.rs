use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Categories
// ============================================================================

/// Topical partition of the article feed.
///
/// `Explore` is the catch-all union feed: requests for it omit the
/// `article_group` query parameter so the backend returns articles from
/// every group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Explore,
    Politics,
    Economy,
    Social,
    Tech,
    Business,
    Sports,
    Culture,
    World,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 9] = [
        Category::Explore,
        Category::Politics,
        Category::Economy,
        Category::Social,
        Category::Tech,
        Category::Business,
        Category::Sports,
        Category::Culture,
        Category::World,
    ];

    /// True for the unfiltered union feed.
    pub fn is_explore(self) -> bool {
        matches!(self, Category::Explore)
    }

    /// The wire name used as the `article_group` query parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Explore => "Explore",
            Category::Politics => "Politics",
            Category::Economy => "Economy",
            Category::Social => "Social",
            Category::Tech => "Tech",
            Category::Business => "Business",
            Category::Sports => "Sports",
            Category::Culture => "Culture",
            Category::World => "World",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Articles
// ============================================================================

/// An article as returned by the backend.
///
/// The cache layer treats articles as opaque beyond their identity: `id`
/// (the backend `_id`) is the only field consulted for deduplication.
/// The remaining backend-defined fields (journalist, images, like counts,
/// and whatever else the API grows) ride along in `extra` untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique article identifier; equality for dedup purposes is
    /// identity-based only.
    #[serde(rename = "_id")]
    pub id: String,

    /// The article's category, when the backend includes it.
    #[serde(rename = "article_group", default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Category>,

    #[serde(rename = "article_title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "article_highlight", default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,

    #[serde(rename = "published_on", default, skip_serializing_if = "Option::is_none")]
    pub published_on: Option<DateTime<Utc>>,

    /// Backend-defined remainder of the payload, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Article {
    /// Minimal article with only an identity and optional group.
    ///
    /// Mostly useful for seeding sessions from externally preloaded data
    /// and for tests; articles that came over the wire carry their full
    /// payload in `extra`.
    pub fn new(id: impl Into<String>, group: Option<Category>) -> Self {
        Self {
            id: id.into(),
            group,
            title: None,
            highlight: None,
            published_on: None,
            extra: serde_json::Map::new(),
        }
    }
}

// ============================================================================
// Headlines
// ============================================================================

/// An entry from the externally supplied "top stories" list.
///
/// Headline payloads are article-shaped but inconsistent about where the
/// article id lives: some rows carry `_id`, others `article_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct Headline {
    #[serde(rename = "_id", default)]
    id: Option<String>,

    #[serde(default)]
    article_id: Option<String>,

    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Headline {
    /// The article id this headline refers to (`_id` wins over
    /// `article_id`), or `None` for a malformed row.
    pub fn article_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.article_id.as_deref())
    }

    /// Access to the rest of the headline payload.
    pub fn extra(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.extra
    }
}
