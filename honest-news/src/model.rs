//! Shared data model for articles, topics and users
//!
//! Field names serialize in camelCase, matching the JSON the reader app
//! exchanges (`urlToImage`, `publishedAt`, `factCheck`, ...).

use std::collections::BTreeSet;
use std::fmt;
use std::num::{NonZeroU16, NonZeroU32};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news article as shown in feeds and on the detail screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_to_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: ArticleSource,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fact_check: Option<FactCheckResult>,
    /// Estimated reading time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<NonZeroU32>,
}

/// Publisher of an article.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSource {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// 0..=100, checked when a catalog is ingested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Outcome of fact-checking an article's claims.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckResult {
    /// 0..=100
    pub score: u8,
    pub verified_claims: u32,
    pub total_claims: u32,
    /// References consulted, in citation order.
    pub sources: Vec<String>,
}

impl FactCheckResult {
    /// Share of claims that were verified, `None` when nothing was checked.
    pub fn verified_ratio(&self) -> Option<f64> {
        (self.total_claims > 0).then(|| f64::from(self.verified_claims) / f64::from(self.total_claims))
    }
}

/// A browsable topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub description: String,
    pub article_count: u32,
    pub trending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// How much detail article views show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Brief,
    #[default]
    Standard,
    Comprehensive,
}

impl DetailLevel {
    pub fn label(self) -> &'static str {
        match self {
            DetailLevel::Brief => "Brief",
            DetailLevel::Standard => "Standard",
            DetailLevel::Comprehensive => "Comprehensive",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Standard,
    Premium,
}

impl SubscriptionTier {
    pub fn label(self) -> &'static str {
        match self {
            SubscriptionTier::Free => "Free",
            SubscriptionTier::Standard => "Standard",
            SubscriptionTier::Premium => "Premium",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub breaking_news: bool,
    pub daily_digest: bool,
    pub topic_updates: bool,
}

/// Reading preferences owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Ids of followed topics.
    pub topics: BTreeSet<String>,
    pub detail_level: DetailLevel,
    pub font_size: NonZeroU16,
    pub dark_mode: bool,
    pub notifications: NotificationSettings,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub subscription_tier: SubscriptionTier,
    pub preferences: UserPreferences,
    pub created_at: DateTime<Utc>,
}

/// Partial update of [`UserPreferences`]. Unset fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<DetailLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<NonZeroU16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationsPatch>,
}

impl PreferencesPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topics<I, T>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.topics = Some(topics.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_detail_level(mut self, level: DetailLevel) -> Self {
        self.detail_level = Some(level);
        self
    }

    pub fn with_font_size(mut self, size: NonZeroU16) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_dark_mode(mut self, enabled: bool) -> Self {
        self.dark_mode = Some(enabled);
        self
    }

    pub fn with_notifications(mut self, notifications: NotificationsPatch) -> Self {
        self.notifications = Some(notifications);
        self
    }

    /// Whether the patch sets nothing at all.
    pub fn is_empty(&self) -> bool {
        self.topics.is_none()
            && self.detail_level.is_none()
            && self.font_size.is_none()
            && self.dark_mode.is_none()
            && self.notifications.as_ref().map_or(true, NotificationsPatch::is_empty)
    }

    /// Merge into `prefs` field by field. Returns whether anything changed.
    pub fn apply(&self, prefs: &mut UserPreferences) -> bool {
        let before = prefs.clone();

        if let Some(topics) = &self.topics {
            prefs.topics = topics.clone();
        }
        if let Some(level) = self.detail_level {
            prefs.detail_level = level;
        }
        if let Some(size) = self.font_size {
            prefs.font_size = size;
        }
        if let Some(dark_mode) = self.dark_mode {
            prefs.dark_mode = dark_mode;
        }
        if let Some(notifications) = &self.notifications {
            notifications.apply(&mut prefs.notifications);
        }

        *prefs != before
    }
}

/// Partial update of [`NotificationSettings`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breaking_news: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_digest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_updates: Option<bool>,
}

impl NotificationsPatch {
    pub fn with_breaking_news(mut self, enabled: bool) -> Self {
        self.breaking_news = Some(enabled);
        self
    }

    pub fn with_daily_digest(mut self, enabled: bool) -> Self {
        self.daily_digest = Some(enabled);
        self
    }

    pub fn with_topic_updates(mut self, enabled: bool) -> Self {
        self.topic_updates = Some(enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.breaking_news.is_none() && self.daily_digest.is_none() && self.topic_updates.is_none()
    }

    pub fn apply(&self, settings: &mut NotificationSettings) {
        if let Some(v) = self.breaking_news {
            settings.breaking_news = v;
        }
        if let Some(v) = self.daily_digest {
            settings.daily_digest = v;
        }
        if let Some(v) = self.topic_updates {
            settings.topic_updates = v;
        }
    }
}

/// A password that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Login form input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: Secret,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password),
        }
    }

    /// Both fields filled in.
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

/// Sign-up form input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: Secret,
    pub name: String,
}

impl Registration {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password),
            name: name.into(),
        }
    }
}
