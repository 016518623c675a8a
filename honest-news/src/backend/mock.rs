use async_trait::async_trait;
use chrono::Utc;
use tokio::time::sleep;

use super::fixtures::{demo_user, mock_articles, mock_topics};
use super::{IdentityProvider, NewsFeed, NewsPayload};
use crate::config::Latency;
use crate::error::BackendError;
use crate::model::{Credentials, PreferencesPatch, Registration, SubscriptionTier, User};

/// In-memory backend that answers every call with canned data after a delay.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockBackend {
    latency: Latency,
}

impl MockBackend {
    pub fn new(latency: Latency) -> Self {
        Self { latency }
    }

    /// A backend that answers immediately.
    pub fn instant() -> Self {
        Self::new(Latency::ZERO)
    }

    pub fn latency(&self) -> &Latency {
        &self.latency
    }

    fn catalog() -> NewsPayload {
        NewsPayload {
            articles: mock_articles(),
            topics: mock_topics(),
        }
    }
}

#[async_trait]
impl NewsFeed for MockBackend {
    async fn fetch_news(&self, category: &str) -> Result<NewsPayload, BackendError> {
        tracing::debug!(category, "mock fetch");
        sleep(self.latency.fetch()).await;
        Ok(Self::catalog())
    }

    async fn refresh_news(&self, category: &str) -> Result<NewsPayload, BackendError> {
        tracing::debug!(category, "mock refresh");
        sleep(self.latency.refresh()).await;
        Ok(Self::catalog())
    }
}

#[async_trait]
impl IdentityProvider for MockBackend {
    async fn login(&self, credentials: &Credentials) -> Result<User, BackendError> {
        sleep(self.latency.login()).await;
        if !credentials.is_complete() {
            return Err(BackendError::InvalidCredentials);
        }
        Ok(demo_user())
    }

    async fn register(&self, registration: &Registration) -> Result<User, BackendError> {
        sleep(self.latency.register()).await;
        Ok(User {
            id: uuid::Uuid::new_v4().to_string(),
            email: registration.email.clone(),
            name: registration.name.clone(),
            subscription_tier: SubscriptionTier::Free,
            created_at: Utc::now(),
            ..demo_user()
        })
    }

    async fn update_preferences(
        &self,
        patch: &PreferencesPatch,
    ) -> Result<PreferencesPatch, BackendError> {
        sleep(self.latency.preferences()).await;
        Ok(patch.clone())
    }

    async fn logout(&self) -> Result<(), BackendError> {
        sleep(self.latency.logout()).await;
        Ok(())
    }
}
