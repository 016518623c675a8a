//! Action tracing middleware
//!
//! [`ActionTrace`] writes one `tracing` event per dispatched action, tagged
//! with the store it belongs to. Which actions are traced is controlled by
//! glob patterns over action names:
//!
//! - `*` matches any run of characters
//! - `?` matches exactly one character
//! - everything else matches literally
//!
//! ```ignore
//! let trace = ActionTrace::new("news").exclude(["*DidLoad"]);
//! let store = EffectStoreWithMiddleware::new(NewsState::default(), reducer, trace);
//! ```

use crate::action::ActionSummary;
use crate::store::Middleware;

/// Include/exclude filter over action names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionFilter {
    /// If non-empty, an action must match one of these.
    pub include: Vec<String>,
    /// Actions matching any of these are skipped, even if included.
    pub exclude: Vec<String>,
}

impl ActionFilter {
    /// Build a filter from comma-separated pattern lists.
    ///
    /// ```
    /// use store_dispatch_core::logging::ActionFilter;
    ///
    /// let filter = ActionFilter::parse(Some("Session*, Preferences*"), Some("*DidFail"));
    /// assert!(filter.allows("SessionLogin"));
    /// assert!(!filter.allows("SessionDidFail"));
    /// assert!(!filter.allows("FeedFetch"));
    /// ```
    pub fn parse(include: Option<&str>, exclude: Option<&str>) -> Self {
        fn split(list: Option<&str>) -> Vec<String> {
            list.map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
        }

        Self {
            include: split(include),
            exclude: split(exclude),
        }
    }

    /// Whether an action with this name passes the filter.
    pub fn allows(&self, name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| glob_match(p, name));
        included && !self.exclude.iter().any(|p| glob_match(p, name))
    }
}

/// Middleware that traces every action passing its [`ActionFilter`].
///
/// `before` emits a `debug` event with the action summary, `after` a
/// `trace` event with the reducer outcome.
#[derive(Debug, Clone)]
pub struct ActionTrace {
    store: &'static str,
    filter: ActionFilter,
    active: bool,
}

impl ActionTrace {
    /// Trace every action of the named store.
    pub fn new(store: &'static str) -> Self {
        Self {
            store,
            filter: ActionFilter::default(),
            active: true,
        }
    }

    /// Replace the filter.
    pub fn filter(mut self, filter: ActionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Skip actions matching any of `patterns`.
    pub fn exclude<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.filter
            .exclude
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Turn tracing on or off. Inactive middleware does nothing.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether this middleware emits anything.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Name of the store this middleware is attached to.
    pub fn store(&self) -> &'static str {
        self.store
    }

    fn traces(&self, name: &str) -> bool {
        self.active && self.filter.allows(name)
    }
}

impl<A: ActionSummary> Middleware<A> for ActionTrace {
    fn before(&mut self, action: &A) {
        if self.traces(action.name()) {
            tracing::debug!(
                store = self.store,
                action = action.name(),
                summary = %action.summary(),
                "action"
            );
        }
    }

    fn after(&mut self, action: &A, state_changed: bool, effects: usize) {
        if self.traces(action.name()) {
            tracing::trace!(
                store = self.store,
                action = action.name(),
                changed = state_changed,
                effects,
                "reduced"
            );
        }
    }
}

/// Match `text` against a glob `pattern` with `*` and `?` wildcards.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` and the text index it is currently covering up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, covered)) => {
                    backtrack = Some((star, covered + 1));
                    p = star + 1;
                    t = covered + 1;
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
