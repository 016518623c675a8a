//! Request generations for async operations
//!
//! An async operation is started by an intent action and finished by a
//! result action that arrives later, possibly after a newer request of the
//! same kind was started. Each request therefore carries a [`RequestId`]
//! from a monotonic [`RequestIds`] counter, and the state keeps a
//! [`RequestTracker`] per operation kind so the reducer can tell the current
//! request from a stale one.
//!
//! ```ignore
//! FeedAction::Fetch { request } => {
//!     if !state.fetch.begin(request) {
//!         return DispatchResult::unchanged();
//!     }
//!     DispatchResult::changed_with(FeedEffect::Load { request })
//! }
//! FeedAction::DidLoad { request, items } => {
//!     if !state.fetch.settle(request, Settlement::Completed) {
//!         return DispatchResult::unchanged(); // stale
//!     }
//!     state.items = items;
//!     DispatchResult::changed()
//! }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Identifies one async request. Later requests have larger ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wrap a raw id. Id 0 is reserved for "no request yet".
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared source of increasing request ids. Clones share the counter.
#[derive(Clone, Debug, Default)]
pub struct RequestIds(Arc<AtomicU64>);

impl RequestIds {
    /// Create a counter starting at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, strictly greater than every id handed out before.
    pub fn next(&self) -> RequestId {
        RequestId(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// How a request ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum Settlement {
    /// The result was applied.
    Completed,
    /// The request failed or was abandoned, with a readable message.
    Failed(String),
}

impl Settlement {
    /// Convert into a `Result` carrying the failure message.
    pub fn into_result(self) -> Result<(), String> {
        match self {
            Settlement::Completed => Ok(()),
            Settlement::Failed(message) => Err(message),
        }
    }
}

/// Generation bookkeeping for one kind of async request.
///
/// `latest` is the newest request started, `settled` the newest request
/// whose outcome was recorded. The request is in flight while
/// `settled < latest`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RequestTracker {
    latest: u64,
    settled: u64,
    last: Option<Settlement>,
}

impl RequestTracker {
    /// Record the start of a request.
    ///
    /// Returns false, and changes nothing, if a newer request was already
    /// started.
    pub fn begin(&mut self, id: RequestId) -> bool {
        if id.0 <= self.latest {
            return false;
        }
        self.latest = id.0;
        true
    }

    /// Whether `id` is the newest request and still waiting for its result.
    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.latest && self.settled < self.latest
    }

    /// Whether any request of this kind is waiting for its result.
    pub fn in_flight(&self) -> bool {
        self.settled < self.latest
    }

    /// Record the outcome of `id`.
    ///
    /// Only the newest unsettled request can be settled here, so results of
    /// superseded requests return false and must be dropped by the caller.
    pub fn settle(&mut self, id: RequestId, settlement: Settlement) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.settled = id.0;
        self.last = Some(settlement);
        true
    }

    /// Record the outcome of `id` if no newer outcome was recorded yet.
    ///
    /// Unlike [`settle`](Self::settle) this accepts results of requests that
    /// were followed by newer ones, as long as they arrive in order.
    pub fn settle_in_order(&mut self, id: RequestId, settlement: Settlement) -> bool {
        if id.0 <= self.settled || id.0 > self.latest {
            return false;
        }
        self.settled = id.0;
        self.last = Some(settlement);
        true
    }

    /// Give up on the request in flight, if any.
    ///
    /// Its late result will be rejected by [`settle`](Self::settle) and its
    /// waiters observe a failure with `reason`.
    pub fn abandon(&mut self, reason: impl Into<String>) -> bool {
        if !self.in_flight() {
            return false;
        }
        self.settled = self.latest;
        self.last = Some(Settlement::Failed(reason.into()));
        true
    }

    /// Whether `id`, or a request that superseded it, has an outcome.
    pub fn is_settled(&self, id: RequestId) -> bool {
        self.settled >= id.0
    }

    /// Outcome of the most recently settled request.
    pub fn settlement(&self) -> Option<&Settlement> {
        self.last.as_ref()
    }

    /// Newest request started, if any.
    pub fn latest(&self) -> Option<RequestId> {
        (self.latest > 0).then_some(RequestId(self.latest))
    }
}
