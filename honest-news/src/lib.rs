//! State layer of the Honest News reader
//!
//! Two independent stores, each running on its own tokio task:
//!
//! - [`NewsStore`]: article catalog, featured articles, topics
//! - [`UserStore`]: the signed-in user and account operations
//!
//! Data comes from pluggable backends ([`NewsFeed`], [`IdentityProvider`]).
//! [`MockBackend`] serves canned data after configurable delays.
//!
//! ```ignore
//! let backend = Arc::new(MockBackend::default());
//! let news = NewsStore::spawn(backend.clone());
//! let user = UserStore::spawn(backend);
//!
//! user.set_demo_user().await?;
//! news.fetch("general").await?;
//! assert_eq!(news.snapshot().featured_articles.len(), 2);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod model;
pub mod news;
pub mod user;

pub use backend::{IdentityProvider, MockBackend, NewsFeed, NewsPayload};
pub use config::{AppConfig, ConfigError, Latency};
pub use error::{BackendError, CatalogError, StoreError};
pub use news::{NewsState, NewsStore};
pub use user::{UserState, UserStore};
