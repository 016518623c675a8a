//! Canned catalog and identity served by the mock backend

use std::num::{NonZeroU16, NonZeroU32};

use chrono::{Duration, Utc};

use crate::model::{
    Article, ArticleSource, DetailLevel, FactCheckResult, NotificationSettings, SubscriptionTier,
    Topic, User, UserPreferences,
};

const DEFAULT_FONT_SIZE: NonZeroU16 = match NonZeroU16::new(16) {
    Some(size) => size,
    None => unreachable!(),
};

fn minutes(n: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(n)
}

/// The two sample articles. `published_at` is relative to now.
pub fn mock_articles() -> Vec<Article> {
    let now = Utc::now();
    vec![
        Article {
            id: "1".into(),
            title: "AI Revolution in Healthcare: New Breakthrough in Disease Detection".into(),
            description: "Researchers develop AI system that can detect rare diseases with 95% accuracy, potentially saving thousands of lives annually.".into(),
            content: "A revolutionary AI system developed by researchers at Stanford University has achieved a remarkable 95% accuracy rate in detecting rare diseases...".into(),
            url: "https://example.com/ai-healthcare".into(),
            url_to_image: Some("https://picsum.photos/400/300?random=1".into()),
            published_at: now,
            source: ArticleSource {
                id: "stanford-news".into(),
                name: "Stanford News".into(),
                logo: None,
                credibility_score: Some(92),
                country: None,
            },
            category: "technology".into(),
            ai_summary: Some("Stanford researchers have developed an AI system that can detect rare diseases with 95% accuracy, potentially revolutionizing early diagnosis and treatment.".into()),
            scale_context: Some("This breakthrough could impact the lives of over 300 million people worldwide who suffer from rare diseases.".into()),
            fact_check: Some(FactCheckResult {
                score: 88,
                verified_claims: 7,
                total_claims: 8,
                sources: vec![
                    "Stanford University".into(),
                    "Nature Medicine".into(),
                    "WHO".into(),
                ],
            }),
            reading_time: minutes(5),
        },
        Article {
            id: "2".into(),
            title: "Global Climate Summit Reaches Historic Agreement on Carbon Reduction".into(),
            description: "World leaders commit to ambitious new targets for carbon emission reductions by 2030.".into(),
            content: "In a landmark decision at the Global Climate Summit, 195 countries have agreed to unprecedented carbon reduction targets...".into(),
            url: "https://example.com/climate-summit".into(),
            url_to_image: Some("https://picsum.photos/400/300?random=2".into()),
            published_at: now - Duration::hours(1),
            source: ArticleSource {
                id: "reuters".into(),
                name: "Reuters".into(),
                logo: None,
                credibility_score: Some(94),
                country: None,
            },
            category: "environment".into(),
            ai_summary: Some("195 countries agree to new carbon reduction targets at Global Climate Summit, aiming for 50% reduction by 2030.".into()),
            scale_context: Some("These commitments represent a $2.3 trillion global investment in clean energy infrastructure over the next decade.".into()),
            fact_check: Some(FactCheckResult {
                score: 92,
                verified_claims: 12,
                total_claims: 13,
                sources: vec!["UN Climate Change".into(), "IPCC".into(), "IEA".into()],
            }),
            reading_time: minutes(7),
        },
    ]
}

fn topic(id: &str, name: &str, description: &str, article_count: u32, trending: bool, icon: &str) -> Topic {
    Topic {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        article_count,
        trending,
        icon: Some(icon.into()),
    }
}

/// The five sample topics.
pub fn mock_topics() -> Vec<Topic> {
    vec![
        topic("1", "Technology", "Latest tech innovations", 245, true, "💻"),
        topic("2", "Health", "Health and medical news", 189, false, "🏥"),
        topic("3", "Environment", "Climate and environmental issues", 156, true, "🌍"),
        topic("4", "Politics", "Political developments", 312, false, "🏛️"),
        topic("5", "Business", "Business and finance", 278, true, "💼"),
    ]
}

/// The demo account returned by login and installed by `set_demo_user`.
pub fn demo_user() -> User {
    User {
        id: "1".into(),
        email: "demo@honestnews.com".into(),
        name: "Demo User".into(),
        subscription_tier: SubscriptionTier::Standard,
        preferences: UserPreferences {
            topics: ["technology", "health", "environment"]
                .into_iter()
                .map(String::from)
                .collect(),
            detail_level: DetailLevel::Standard,
            font_size: DEFAULT_FONT_SIZE,
            dark_mode: false,
            notifications: NotificationSettings {
                breaking_news: true,
                daily_digest: true,
                topic_updates: false,
            },
        },
        created_at: Utc::now(),
    }
}
