//! Data access for the stores
//!
//! The stores never produce data themselves. They call a [`NewsFeed`] for
//! articles and topics and an [`IdentityProvider`] for everything about the
//! signed-in user. [`MockBackend`] implements both over canned data.

mod fixtures;
mod mock;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, CatalogError};
use crate::model::{Article, Credentials, PreferencesPatch, Registration, Topic, User};

pub use fixtures::{demo_user, mock_articles, mock_topics};
pub use mock::MockBackend;

/// Source of the article and topic catalogs.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    /// Full catalog for `category`. The category is passed through unchecked.
    async fn fetch_news(&self, category: &str) -> Result<NewsPayload, BackendError>;

    /// Pull-to-refresh variant of [`fetch_news`](Self::fetch_news).
    async fn refresh_news(&self, category: &str) -> Result<NewsPayload, BackendError> {
        self.fetch_news(category).await
    }
}

/// Account operations.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<User, BackendError>;

    async fn register(&self, registration: &Registration) -> Result<User, BackendError>;

    /// Persist a preferences change, returning the patch to merge locally.
    async fn update_preferences(
        &self,
        patch: &PreferencesPatch,
    ) -> Result<PreferencesPatch, BackendError>;

    async fn logout(&self) -> Result<(), BackendError>;
}

/// One catalog snapshot: every article and topic to show.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsPayload {
    pub articles: Vec<Article>,
    pub topics: Vec<Topic>,
}

impl NewsPayload {
    /// Check the invariants a catalog must hold before it reaches a store.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut article_ids = HashSet::new();
        for article in &self.articles {
            if !article_ids.insert(article.id.as_str()) {
                return Err(CatalogError::DuplicateArticle(article.id.clone()));
            }

            if let Some(score) = article.source.credibility_score.filter(|s| *s > 100) {
                return Err(CatalogError::CredibilityOutOfRange {
                    source_id: article.source.id.clone(),
                    score,
                });
            }

            if let Some(check) = &article.fact_check {
                if check.score > 100 {
                    return Err(CatalogError::ScoreOutOfRange {
                        article: article.id.clone(),
                        score: check.score,
                    });
                }
                if check.verified_claims > check.total_claims {
                    return Err(CatalogError::FactCheckClaims {
                        article: article.id.clone(),
                        verified: check.verified_claims,
                        total: check.total_claims,
                    });
                }
            }
        }

        let mut topic_ids = HashSet::new();
        for topic in &self.topics {
            if !topic_ids.insert(topic.id.as_str()) {
                return Err(CatalogError::DuplicateTopic(topic.id.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NewsPayload {
        NewsPayload {
            articles: mock_articles(),
            topics: mock_topics(),
        }
    }

    #[test]
    fn test_mock_catalog_is_valid() {
        assert_eq!(payload().validate(), Ok(()));
    }

    #[test]
    fn test_claims_must_not_exceed_total() {
        let mut p = payload();
        if let Some(check) = p.articles[0].fact_check.as_mut() {
            check.verified_claims = 9;
        }
        assert_eq!(
            p.validate(),
            Err(CatalogError::FactCheckClaims {
                article: "1".into(),
                verified: 9,
                total: 8,
            })
        );
    }

    #[test]
    fn test_scores_are_bounded() {
        let mut p = payload();
        p.articles[1].source.credibility_score = Some(101);
        assert!(matches!(
            p.validate(),
            Err(CatalogError::CredibilityOutOfRange { score: 101, .. })
        ));

        let mut p = payload();
        if let Some(check) = p.articles[1].fact_check.as_mut() {
            check.score = 150;
        }
        assert!(matches!(
            p.validate(),
            Err(CatalogError::ScoreOutOfRange { score: 150, .. })
        ));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut p = payload();
        p.articles[1].id = "1".into();
        assert_eq!(p.validate(), Err(CatalogError::DuplicateArticle("1".into())));

        let mut p = payload();
        p.topics[4].id = "2".into();
        assert_eq!(p.validate(), Err(CatalogError::DuplicateTopic("2".into())));
    }
}
