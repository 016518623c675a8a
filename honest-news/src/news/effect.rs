//! News effects and the handler that runs them

use std::sync::Arc;

use store_dispatch::{EffectContext, RequestId};

use super::action::{LoadMode, NewsAction};
use crate::backend::{NewsFeed, NewsPayload};
use crate::error::BackendError;

/// Side effects requested by the news reducer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewsEffect {
    /// Load the catalog for `category` from the feed
    Load {
        category: String,
        request: RequestId,
        mode: LoadMode,
    },
}

/// Build the effect handler for a news runtime.
///
/// Each load runs as a task keyed by its [`LoadMode`], so a newer fetch
/// aborts an older one still waiting on the feed.
pub fn effect_handler(
    feed: Arc<dyn NewsFeed>,
) -> impl FnMut(NewsEffect, &mut EffectContext<'_, NewsAction>) + Send + 'static {
    move |effect, ctx| match effect {
        NewsEffect::Load {
            category,
            request,
            mode,
        } => {
            let feed = Arc::clone(&feed);
            ctx.tasks().spawn(mode.task_key(), async move {
                match load(feed.as_ref(), &category, mode).await {
                    Ok(payload) => NewsAction::FeedDidLoad {
                        request,
                        mode,
                        payload,
                    },
                    Err(e) => {
                        tracing::warn!(%request, ?mode, error = %e, "news load failed");
                        NewsAction::FeedDidFail {
                            request,
                            mode,
                            message: e.message_or(mode.fallback_message()),
                        }
                    }
                }
            });
        }
    }
}

async fn load(
    feed: &dyn NewsFeed,
    category: &str,
    mode: LoadMode,
) -> Result<NewsPayload, BackendError> {
    let payload = match mode {
        LoadMode::Fetch => feed.fetch_news(category).await?,
        LoadMode::Refresh => feed.refresh_news(category).await?,
    };
    payload.validate()?;
    Ok(payload)
}
