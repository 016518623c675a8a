//! Core traits and types for store-dispatch
//!
//! Centralized, Redux-style state containers for async applications without
//! a UI loop of their own.
//!
//! # Core Concepts
//!
//! - **Action**: something that happened, either an intent or an async result
//! - **EffectStore**: state plus a reducer that returns the effects to run
//! - **StoreRuntime**: applies actions one at a time and publishes snapshots
//! - **TaskManager**: keyed tasks whose results flow back as actions
//! - **RequestTracker**: generation counter that tells current results from stale ones
//!
//! # Async Handler Pattern
//!
//! Async work is split into two actions:
//!
//! 1. **Intent actions** start the work (e.g. `FeedFetch`)
//! 2. **Result actions** carry the outcome back (e.g. `FeedDidLoad`, `FeedDidFail`)
//!
//! ```ignore
//! use store_dispatch::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(infer_categories)]
//! enum FeedAction {
//!     FeedFetch { request: RequestId },
//!     FeedDidLoad { request: RequestId, items: Vec<Item> },
//!     FeedDidFail { request: RequestId, message: String },
//! }
//!
//! fn reducer(state: &mut FeedState, action: FeedAction) -> DispatchResult<FeedEffect> {
//!     match action {
//!         FeedAction::FeedFetch { request } => {
//!             state.fetch.begin(request);
//!             DispatchResult::changed_with(FeedEffect::Load { request })
//!         }
//!         FeedAction::FeedDidLoad { request, items } => {
//!             if !state.fetch.settle(request, Settlement::Completed) {
//!                 return DispatchResult::unchanged();
//!             }
//!             state.items = items;
//!             DispatchResult::changed()
//!         }
//!         FeedAction::FeedDidFail { request, message } => {
//!             let changed = state.fetch.settle(request, Settlement::Failed(message.clone()));
//!             if changed {
//!                 state.error = Some(message);
//!             }
//!             DispatchResult { changed, effects: vec![] }
//!         }
//!     }
//! }
//!
//! let runtime = StoreRuntime::new(FeedState::default(), reducer);
//! let handle = runtime.handle();
//! runtime.spawn(move |effect, ctx| match effect {
//!     FeedEffect::Load { request } => {
//!         let api = api.clone();
//!         ctx.tasks().spawn("feed", async move {
//!             match api.items().await {
//!                 Ok(items) => FeedAction::FeedDidLoad { request, items },
//!                 Err(e) => FeedAction::FeedDidFail { request, message: e.to_string() },
//!             }
//!         });
//!     }
//! });
//! ```

pub mod action;
pub mod logging;
pub mod request;
pub mod runtime;
pub mod store;
pub mod tasks;
pub mod testing;

// Core trait exports
pub use action::{Action, ActionCategory, ActionSummary};

// Store exports
pub use store::{
    DispatchResult, EffectReducer, EffectStore, EffectStoreLike, EffectStoreWithMiddleware,
    Middleware, NoopMiddleware,
};

pub use logging::{glob_match, ActionFilter, ActionTrace};
pub use request::{RequestId, RequestIds, RequestTracker, Settlement};
pub use runtime::{EffectContext, RuntimeError, StoreHandle, StoreRuntime};
pub use tasks::{TaskKey, TaskManager};

// Testing exports
pub use testing::ReducerHarness;

#[cfg(feature = "testing-time")]
pub use testing::{advance_time, pause_time, resume_time};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionCategory, ActionSummary};
    pub use crate::logging::{ActionFilter, ActionTrace};
    pub use crate::request::{RequestId, RequestIds, RequestTracker, Settlement};
    pub use crate::runtime::{EffectContext, RuntimeError, StoreHandle, StoreRuntime};
    pub use crate::store::{
        DispatchResult, EffectReducer, EffectStore, EffectStoreLike, EffectStoreWithMiddleware,
        Middleware, NoopMiddleware,
    };
    pub use crate::tasks::{TaskKey, TaskManager};
}
