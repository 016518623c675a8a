use std::sync::Arc;

use store_dispatch::{
    ActionTrace, EffectStoreWithMiddleware, RequestId, RequestIds, Settlement, StoreHandle,
    StoreRuntime,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::action::{LoadMode, NewsAction};
use super::effect::effect_handler;
use super::reducer::reducer;
use super::state::NewsState;
use crate::backend::NewsFeed;
use crate::error::StoreError;

/// Article and topic catalog, running on its own task.
///
/// Must be created inside a tokio runtime. Commands resolve once the store
/// applied their outcome.
pub struct NewsStore {
    handle: StoreHandle<NewsState, NewsAction>,
    ids: RequestIds,
    task: JoinHandle<()>,
}

impl NewsStore {
    /// Start a store with the default state.
    pub fn spawn(feed: Arc<dyn NewsFeed>) -> Self {
        Self::with_state(NewsState::default(), feed, ActionTrace::new("news"))
    }

    /// Start a store from an injected state.
    pub fn with_state(state: NewsState, feed: Arc<dyn NewsFeed>, trace: ActionTrace) -> Self {
        let store = EffectStoreWithMiddleware::new(state, reducer, trace);
        let runtime = StoreRuntime::from_store(store);
        let handle = runtime.handle();
        let task = runtime.spawn(effect_handler(feed));

        Self {
            handle,
            ids: RequestIds::new(),
            task,
        }
    }

    /// Latest published state.
    pub fn snapshot(&self) -> NewsState {
        self.handle.snapshot()
    }

    /// Receiver for every published state.
    pub fn subscribe(&self) -> watch::Receiver<NewsState> {
        self.handle.subscribe()
    }

    /// Load the catalog, showing `loading` meanwhile.
    pub async fn fetch(&self, category: impl Into<String>) -> Result<(), StoreError> {
        let request = self.ids.next();
        self.handle
            .dispatch(NewsAction::FeedFetch {
                category: category.into(),
                request,
            })
            .await?;
        self.outcome(request, LoadMode::Fetch).await
    }

    /// Reload the catalog, showing `refreshing` meanwhile.
    pub async fn refresh(&self, category: impl Into<String>) -> Result<(), StoreError> {
        let request = self.ids.next();
        self.handle
            .dispatch(NewsAction::FeedRefresh {
                category: category.into(),
                request,
            })
            .await?;
        self.outcome(request, LoadMode::Refresh).await
    }

    pub async fn set_current_category(&self, category: impl Into<String>) -> Result<(), StoreError> {
        Ok(self
            .handle
            .dispatch(NewsAction::CategorySet(category.into()))
            .await?)
    }

    pub async fn clear_error(&self) -> Result<(), StoreError> {
        Ok(self.handle.dispatch(NewsAction::ErrorClear).await?)
    }

    /// Stop the store. Loads still in flight are aborted.
    pub async fn shutdown(self) {
        self.handle.shutdown();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "news store task failed");
        }
    }

    // Resolves with the outcome of `request` or of the request that superseded it.
    async fn outcome(&self, request: RequestId, mode: LoadMode) -> Result<(), StoreError> {
        let state = self
            .handle
            .wait_for(|s| s.tracker(mode).is_settled(request))
            .await?;
        match state.tracker(mode).settlement() {
            Some(Settlement::Failed(message)) => Err(StoreError::Rejected(message.clone())),
            _ => Ok(()),
        }
    }
}
