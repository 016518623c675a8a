//! News store actions
//!
//! Categories (inferred from naming):
//! - `feed`: FeedFetch, FeedRefresh, FeedDidLoad, FeedDidFail
//! - `category`: CategorySet
//! - `error`: ErrorClear

use store_dispatch::{ActionSummary, RequestId, TaskKey};

use crate::backend::NewsPayload;

/// Which of the two catalog loads a request belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadMode {
    /// Initial or explicit load, reported through `loading`.
    Fetch,
    /// Pull-to-refresh, reported through `refreshing`.
    Refresh,
}

impl LoadMode {
    pub fn task_key(self) -> TaskKey {
        match self {
            LoadMode::Fetch => TaskKey::new("news.fetch"),
            LoadMode::Refresh => TaskKey::new("news.refresh"),
        }
    }

    /// Error recorded when the backend gives no message.
    pub fn fallback_message(self) -> &'static str {
        match self {
            LoadMode::Fetch => "Failed to fetch news",
            LoadMode::Refresh => "Failed to refresh news",
        }
    }
}

#[derive(store_dispatch::Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
pub enum NewsAction {
    /// Intent: load the catalog for a category.
    FeedFetch { category: String, request: RequestId },

    /// Intent: reload the catalog without the full loading state.
    FeedRefresh { category: String, request: RequestId },

    /// Result: the backend returned a catalog that passed validation.
    FeedDidLoad {
        request: RequestId,
        mode: LoadMode,
        payload: NewsPayload,
    },

    /// Result: the load failed. `message` is what the store shows.
    FeedDidFail {
        request: RequestId,
        mode: LoadMode,
        message: String,
    },

    CategorySet(String),

    ErrorClear,
}

impl ActionSummary for NewsAction {
    fn summary(&self) -> String {
        match self {
            NewsAction::FeedDidLoad {
                request,
                mode,
                payload,
            } => format!(
                "FeedDidLoad {{ request: {request}, mode: {mode:?}, articles: {}, topics: {} }}",
                payload.articles.len(),
                payload.topics.len()
            ),
            _ => format!("{:?}", self),
        }
    }
}
