//! Action traits for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to a store
///
/// Actions describe something that happened: an intent coming from a reader
/// (`FeedFetch`) or the outcome of async work (`FeedDidLoad`). They must be:
/// - Clone: middleware sees a copy before the reducer consumes the action
/// - Debug: for logging
/// - Send + 'static: results are produced on spawned tasks
///
/// Use `#[derive(Action)]` from `store-dispatch-macros` to implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Short, log-friendly rendering of an action.
///
/// The default falls back to `Debug`. Override it for actions that carry
/// whole catalogs or anything that should not end up in a log line.
pub trait ActionSummary: Action {
    /// One-line description of the action
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

/// Category information generated by `#[action(infer_categories)]`.
///
/// Categories are derived from the variant name prefix, so `FeedFetch` and
/// `FeedDidLoad` both land in `"feed"`.
pub trait ActionCategory: Action {
    /// Generated category enum
    type Category: Copy + Debug + Eq + 'static;

    /// Category name, `None` for uncategorized actions
    fn category(&self) -> Option<&'static str>;

    /// Category as the generated enum
    fn category_enum(&self) -> Self::Category;
}
