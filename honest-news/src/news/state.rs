//! News store state and read-side helpers

use serde::Serialize;
use store_dispatch::{RequestId, RequestTracker};

use super::action::LoadMode;
use crate::model::{Article, Topic};

/// Articles shown in the featured carousel.
pub const FEATURED_COUNT: usize = 3;

pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsState {
    pub articles: Vec<Article>,
    /// The first [`FEATURED_COUNT`] articles of the current catalog.
    pub featured_articles: Vec<Article>,
    pub topics: Vec<Topic>,
    pub current_category: String,
    /// A fetch is in flight.
    pub loading: bool,
    /// A refresh is in flight.
    pub refreshing: bool,
    pub error: Option<String>,

    #[serde(skip)]
    pub fetch: RequestTracker,
    #[serde(skip)]
    pub refresh: RequestTracker,
    /// Request whose result is the catalog currently shown.
    #[serde(skip)]
    pub catalog_request: Option<RequestId>,
}

impl Default for NewsState {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY)
    }
}

impl NewsState {
    /// Empty catalog, idle, with the given category selected.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            articles: Vec::new(),
            featured_articles: Vec::new(),
            topics: Vec::new(),
            current_category: category.into(),
            loading: false,
            refreshing: false,
            error: None,
            fetch: RequestTracker::default(),
            refresh: RequestTracker::default(),
            catalog_request: None,
        }
    }

    pub fn tracker(&self, mode: LoadMode) -> &RequestTracker {
        match mode {
            LoadMode::Fetch => &self.fetch,
            LoadMode::Refresh => &self.refresh,
        }
    }

    pub(crate) fn tracker_mut(&mut self, mode: LoadMode) -> &mut RequestTracker {
        match mode {
            LoadMode::Fetch => &mut self.fetch,
            LoadMode::Refresh => &mut self.refresh,
        }
    }

    /// Recompute the public flags from the trackers.
    pub(crate) fn sync_flags(&mut self) {
        self.loading = self.fetch.in_flight();
        self.refreshing = self.refresh.in_flight();
    }

    /// Replace the catalog wholesale.
    pub(crate) fn install_catalog(&mut self, articles: Vec<Article>, topics: Vec<Topic>) {
        self.featured_articles = articles.iter().take(FEATURED_COUNT).cloned().collect();
        self.articles = articles;
        self.topics = topics;
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// Articles whose title or description contains `query`, ignoring case.
    /// An empty query matches every article.
    pub fn search(&self, query: &str) -> Vec<&Article> {
        let needle = query.trim().to_lowercase();
        self.articles
            .iter()
            .filter(|a| {
                needle.is_empty()
                    || a.title.to_lowercase().contains(&needle)
                    || a.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn trending_topics(&self) -> Vec<&Topic> {
        self.topics.iter().filter(|t| t.trending).collect()
    }

    /// Whether any load is in flight.
    pub fn is_busy(&self) -> bool {
        self.loading || self.refreshing
    }
}
