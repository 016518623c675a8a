//! store-dispatch: Redux-style state stores for async Rust services
//!
//! State lives in one place, changes only through dispatched actions, and
//! async work is described by reducers as effects that a headless runtime
//! turns into keyed tokio tasks.
//!
//! # Example
//! ```ignore
//! use store_dispatch::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(infer_categories)]
//! enum CounterAction {
//!     CounterAdd(i64),
//!     CounterReset,
//! }
//!
//! fn reducer(state: &mut i64, action: CounterAction) -> DispatchResult<()> {
//!     match action {
//!         CounterAction::CounterAdd(n) => *state += n,
//!         CounterAction::CounterReset => *state = 0,
//!     }
//!     DispatchResult::changed()
//! }
//!
//! let runtime = StoreRuntime::new(0, reducer);
//! let handle = runtime.handle();
//! runtime.spawn(|_, _| {});
//! handle.dispatch(CounterAction::CounterAdd(2)).await?;
//! assert_eq!(handle.snapshot(), 2);
//! ```

// Re-export everything from core
pub use store_dispatch_core::*;

// Re-export derive macros
pub use store_dispatch_macros::Action;

/// Prelude for convenient imports
pub mod prelude {
    pub use store_dispatch_core::prelude::*;

    // Derive macros
    pub use store_dispatch_macros::Action;
}
