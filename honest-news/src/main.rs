//! Honest News state layer from the command line
//!
//! Drives the news and user stores against the mock backend and prints the
//! resulting state as JSON.
//!
//! # Usage
//!
//! ```sh
//! # Featured articles for a category
//! honest-news feed --category technology
//!
//! # Search the catalog
//! honest-news search climate
//!
//! # Log in and print the user
//! honest-news login --email demo@honestnews.com --password secret
//!
//! # Toggle dark mode for the demo account, tracing every session action
//! honest-news --trace-actions 'Preferences*' preferences --dark-mode true
//!
//! # Scripted walk through every operation
//! honest-news --verbose demo
//! ```

use std::num::NonZeroU16;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use store_dispatch::{ActionFilter, ActionTrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use honest_news::model::{DetailLevel, NotificationsPatch, PreferencesPatch};
use honest_news::{AppConfig, MockBackend, NewsState, NewsStore, UserState, UserStore};

/// Honest News state layer over mock data
#[derive(Parser, Debug)]
#[command(name = "honest-news")]
#[command(about = "Drive the Honest News stores against the mock backend")]
struct Args {
    /// JSON config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Trace dispatched actions whose names match these comma-separated globs
    #[arg(long, global = true, value_name = "PATTERNS")]
    trace_actions: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog and print the feed
    Feed {
        #[arg(long, short)]
        category: Option<String>,
        /// Use pull-to-refresh instead of a full fetch
        #[arg(long)]
        refresh: bool,
    },
    /// Articles whose title or description contains QUERY
    Search { query: String },
    /// List topics
    Topics {
        /// Only trending topics
        #[arg(long)]
        trending: bool,
    },
    /// Print one article
    Article { id: String },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Update the demo account's preferences
    Preferences(PreferenceArgs),
    /// Run every store operation once
    Demo,
}

#[derive(clap::Args, Debug)]
struct PreferenceArgs {
    #[arg(long)]
    dark_mode: Option<bool>,
    #[arg(long)]
    font_size: Option<NonZeroU16>,
    #[arg(long, value_enum)]
    detail_level: Option<DetailArg>,
    /// Followed topic ids, comma-separated
    #[arg(long, value_delimiter = ',')]
    topics: Option<Vec<String>>,
    #[arg(long)]
    breaking_news: Option<bool>,
    #[arg(long)]
    daily_digest: Option<bool>,
    #[arg(long)]
    topic_updates: Option<bool>,
    /// Apply without signing in first
    #[arg(long)]
    anonymous: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DetailArg {
    Brief,
    Standard,
    Comprehensive,
}

impl From<DetailArg> for DetailLevel {
    fn from(arg: DetailArg) -> Self {
        match arg {
            DetailArg::Brief => DetailLevel::Brief,
            DetailArg::Standard => DetailLevel::Standard,
            DetailArg::Comprehensive => DetailLevel::Comprehensive,
        }
    }
}

impl PreferenceArgs {
    fn patch(&self) -> PreferencesPatch {
        let notifications = NotificationsPatch {
            breaking_news: self.breaking_news,
            daily_digest: self.daily_digest,
            topic_updates: self.topic_updates,
        };

        PreferencesPatch {
            topics: self.topics.as_ref().map(|t| t.iter().cloned().collect()),
            detail_level: self.detail_level.map(Into::into),
            font_size: self.font_size,
            dark_mode: self.dark_mode,
            notifications: (!notifications.is_empty()).then_some(notifications),
        }
    }
}

struct Stores {
    news: NewsStore,
    user: UserStore,
    config: AppConfig,
}

impl Stores {
    fn start(config: AppConfig, filter: ActionFilter) -> Self {
        let backend = Arc::new(MockBackend::new(config.latency));
        let news = NewsStore::with_state(
            NewsState::new(config.default_category.clone()),
            backend.clone(),
            ActionTrace::new("news").filter(filter.clone()),
        );
        let user = UserStore::with_state(
            UserState::default(),
            backend,
            ActionTrace::new("user").filter(filter),
        );
        Self { news, user, config }
    }

    async fn shutdown(self) {
        self.news.shutdown().await;
        self.user.shutdown().await;
    }
}

fn init_tracing(args: &Args) {
    let default = if args.verbose || args.trace_actions.is_some() {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let config = AppConfig::load(args.config.as_deref()).context("loading config")?;
    let filter = ActionFilter::parse(args.trace_actions.as_deref(), None);
    let stores = Stores::start(config, filter);

    let result = run(&stores, args.command).await;
    stores.shutdown().await;
    result
}

async fn run(stores: &Stores, command: Command) -> Result<()> {
    let Stores { news, user, config } = stores;
    let category = &config.default_category;

    match command {
        Command::Feed {
            category: requested,
            refresh,
        } => {
            let category = requested.unwrap_or_else(|| category.clone());
            news.set_current_category(category.clone()).await?;
            if refresh {
                news.refresh(category).await?;
            } else {
                news.fetch(category).await?;
            }
            print_json(&news.snapshot())
        }

        Command::Search { query } => {
            news.fetch(category.clone()).await?;
            let state = news.snapshot();
            print_json(&state.search(&query))
        }

        Command::Topics { trending } => {
            news.fetch(category.clone()).await?;
            let state = news.snapshot();
            if trending {
                print_json(&state.trending_topics())
            } else {
                print_json(&state.topics)
            }
        }

        Command::Article { id } => {
            news.fetch(category.clone()).await?;
            let state = news.snapshot();
            let article = state
                .article(&id)
                .with_context(|| format!("no article with id {id}"))?;
            print_json(article)
        }

        Command::Login { email, password } => {
            let signed_in = user.login(email, password).await?;
            print_json(&signed_in)
        }

        Command::Register {
            email,
            password,
            name,
        } => {
            let created = user.register(email, password, name).await?;
            print_json(&created)
        }

        Command::Preferences(prefs) => {
            if !prefs.anonymous {
                user.set_demo_user().await?;
            }
            user.update_preferences(prefs.patch()).await?;
            print_json(&user.snapshot())
        }

        Command::Demo => demo(news, user, category).await,
    }
}

async fn demo(news: &NewsStore, user: &UserStore, category: &str) -> Result<()> {
    user.set_demo_user().await?;
    tracing::info!("demo user installed");

    news.fetch(category).await?;
    let state = news.snapshot();
    tracing::info!(
        articles = state.articles.len(),
        featured = state.featured_articles.len(),
        topics = state.topics.len(),
        "catalog loaded"
    );

    news.refresh(category).await?;
    tracing::info!("catalog refreshed");

    user.update_preferences(PreferencesPatch::new().with_dark_mode(true))
        .await?;
    tracing::info!("dark mode enabled");

    if let Err(e) = user.login("", "").await {
        tracing::info!(error = %e, "empty login rejected");
        user.clear_error().await?;
    }

    user.logout().await?;
    tracing::info!("signed out");

    #[derive(Serialize)]
    struct Summary {
        news: NewsState,
        user: UserState,
    }
    print_json(&Summary {
        news: news.snapshot(),
        user: user.snapshot(),
    })
}
