//! News reducer: (state, action) -> effects
//!
//! Fetch and refresh each have a request tracker. A result is applied only
//! if it belongs to the newest request of its kind, and the catalog is only
//! replaced by a result newer than the one currently shown.

use store_dispatch::{DispatchResult, Settlement};

use super::action::{LoadMode, NewsAction};
use super::effect::NewsEffect;
use super::state::NewsState;

pub fn reducer(state: &mut NewsState, action: NewsAction) -> DispatchResult<NewsEffect> {
    match action {
        NewsAction::FeedFetch { category, request } => {
            if !state.fetch.begin(request) {
                return DispatchResult::unchanged();
            }
            state.error = None;
            state.sync_flags();
            DispatchResult::changed_with(NewsEffect::Load {
                category,
                request,
                mode: LoadMode::Fetch,
            })
        }

        NewsAction::FeedRefresh { category, request } => {
            if !state.refresh.begin(request) {
                return DispatchResult::unchanged();
            }
            state.error = None;
            state.sync_flags();
            DispatchResult::changed_with(NewsEffect::Load {
                category,
                request,
                mode: LoadMode::Refresh,
            })
        }

        NewsAction::FeedDidLoad {
            request,
            mode,
            payload,
        } => {
            if !state.tracker_mut(mode).settle(request, Settlement::Completed) {
                tracing::warn!(%request, ?mode, "dropping stale catalog");
                return DispatchResult::unchanged();
            }

            if state.catalog_request.map_or(true, |shown| request > shown) {
                state.install_catalog(payload.articles, payload.topics);
                state.catalog_request = Some(request);
            } else {
                tracing::debug!(%request, ?mode, "newer catalog already shown");
            }
            state.sync_flags();
            DispatchResult::changed()
        }

        NewsAction::FeedDidFail {
            request,
            mode,
            message,
        } => {
            let settlement = Settlement::Failed(message.clone());
            if !state.tracker_mut(mode).settle(request, settlement) {
                tracing::warn!(%request, ?mode, "dropping stale failure");
                return DispatchResult::unchanged();
            }
            state.error = Some(message);
            state.sync_flags();
            DispatchResult::changed()
        }

        NewsAction::CategorySet(category) => {
            if state.current_category == category {
                return DispatchResult::unchanged();
            }
            state.current_category = category;
            DispatchResult::changed()
        }

        NewsAction::ErrorClear => {
            if state.error.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{mock_articles, mock_topics, NewsPayload};
    use store_dispatch::testing::{assert_effect, ReducerHarness};
    use store_dispatch::RequestId;

    fn id(n: u64) -> RequestId {
        RequestId::new(n)
    }

    fn payload() -> NewsPayload {
        NewsPayload {
            articles: mock_articles(),
            topics: mock_topics(),
        }
    }

    fn fetch(n: u64) -> NewsAction {
        NewsAction::FeedFetch {
            category: "general".into(),
            request: id(n),
        }
    }

    fn refresh(n: u64) -> NewsAction {
        NewsAction::FeedRefresh {
            category: "general".into(),
            request: id(n),
        }
    }

    fn loaded(n: u64, mode: LoadMode, payload: NewsPayload) -> NewsAction {
        NewsAction::FeedDidLoad {
            request: id(n),
            mode,
            payload,
        }
    }

    #[test]
    fn test_fetch_sets_loading_and_requests_load() {
        let mut harness = ReducerHarness::new(NewsState::default(), reducer);
        harness.state_mut().error = Some("old".into());

        assert!(harness.dispatch(fetch(1)));
        assert!(harness.state().loading);
        assert!(!harness.state().refreshing);
        assert_eq!(harness.state().error, None);

        let effects = harness.drain_effects();
        assert_effect!(
            effects,
            NewsEffect::Load { mode: LoadMode::Fetch, request, .. } if *request == id(1)
        );
    }

    #[test]
    fn test_load_replaces_catalog_and_features_prefix() {
        let mut harness = ReducerHarness::new(NewsState::default(), reducer);
        harness.dispatch(fetch(1));
        assert!(harness.dispatch(loaded(1, LoadMode::Fetch, payload())));

        let state = harness.state();
        assert!(!state.loading);
        assert_eq!(state.articles.len(), 2);
        assert_eq!(state.topics.len(), 5);
        assert_eq!(state.featured_articles, state.articles);
        assert_eq!(state.fetch.settlement(), Some(&Settlement::Completed));
    }

    #[test]
    fn test_refresh_only_toggles_refreshing() {
        let mut harness = ReducerHarness::new(NewsState::default(), reducer);
        harness.dispatch(refresh(1));
        assert!(harness.state().refreshing);
        assert!(!harness.state().loading);

        harness.dispatch(loaded(1, LoadMode::Refresh, payload()));
        assert!(!harness.state().refreshing);
        assert_eq!(harness.state().articles.len(), 2);
    }

    #[test]
    fn test_failure_keeps_previous_catalog() {
        let mut harness = ReducerHarness::new(NewsState::default(), reducer);
        harness.dispatch(fetch(1));
        harness.dispatch(loaded(1, LoadMode::Fetch, payload()));

        harness.dispatch(fetch(2));
        harness.dispatch(NewsAction::FeedDidFail {
            request: id(2),
            mode: LoadMode::Fetch,
            message: "Failed to fetch news".into(),
        });

        let state = harness.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch news"));
        assert_eq!(state.articles.len(), 2);
    }

    #[test]
    fn test_superseded_result_is_dropped() {
        let mut harness = ReducerHarness::new(NewsState::default(), reducer);
        harness.dispatch(fetch(1));
        harness.dispatch(fetch(2));

        let mut stale = payload();
        stale.articles.truncate(1);
        assert!(!harness.dispatch(loaded(1, LoadMode::Fetch, stale)));
        assert!(harness.state().loading);
        assert!(harness.state().articles.is_empty());

        harness.dispatch(loaded(2, LoadMode::Fetch, payload()));
        assert!(!harness.state().loading);
        assert_eq!(harness.state().articles.len(), 2);
    }

    #[test]
    fn test_slow_fetch_does_not_overwrite_newer_refresh() {
        let mut harness = ReducerHarness::new(NewsState::default(), reducer);
        harness.dispatch(fetch(1));
        harness.dispatch(refresh(2));
        harness.dispatch(loaded(2, LoadMode::Refresh, payload()));

        let mut older = payload();
        older.articles.truncate(1);
        assert!(harness.dispatch(loaded(1, LoadMode::Fetch, older)));

        let state = harness.state();
        assert!(!state.loading);
        assert!(!state.refreshing);
        assert_eq!(state.articles.len(), 2);
        assert_eq!(state.catalog_request, Some(id(2)));
    }

    #[test]
    fn test_older_intent_is_ignored() {
        let mut harness = ReducerHarness::new(NewsState::default(), reducer);
        harness.dispatch(fetch(5));
        harness.drain_effects();

        assert!(!harness.dispatch(fetch(4)));
        assert!(harness.drain_effects().is_empty());
    }

    #[test]
    fn test_category_and_error_are_plain_assignments() {
        let mut harness = ReducerHarness::new(NewsState::default(), reducer);
        assert!(harness.dispatch(NewsAction::CategorySet("sports".into())));
        assert!(!harness.dispatch(NewsAction::CategorySet("sports".into())));
        assert_eq!(harness.state().current_category, "sports");

        assert!(!harness.dispatch(NewsAction::ErrorClear));
        harness.state_mut().error = Some("boom".into());
        harness.state_mut().loading = true;
        assert!(harness.dispatch(NewsAction::ErrorClear));
        assert_eq!(harness.state().error, None);
        assert!(harness.state().loading);
        assert!(harness.drain_effects().is_empty());
    }
}
