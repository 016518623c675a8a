//! Test helpers for reducers and effects
//!
//! [`ReducerHarness`] drives a reducer synchronously and collects the effects
//! it asks for, so reducer tests need neither a runtime nor real tasks.
//!
//! ```ignore
//! use store_dispatch::testing::*;
//!
//! let mut harness = ReducerHarness::new(NewsState::default(), reducer);
//! harness.dispatch(NewsAction::FeedFetch { category: "general".into(), request });
//!
//! let effects = harness.drain_effects();
//! assert_effect!(effects, NewsEffect::Load { .. });
//! assert!(harness.state().loading);
//! ```

use crate::action::Action;
use crate::store::{DispatchResult, EffectReducer, EffectStore};

/// Synchronous driver for an [`EffectReducer`].
pub struct ReducerHarness<S, A, E> {
    store: EffectStore<S, A, E>,
    effects: Vec<E>,
}

impl<S, A: Action, E> ReducerHarness<S, A, E> {
    /// Start from `state`.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            store: EffectStore::new(state, reducer),
            effects: Vec::new(),
        }
    }

    /// Dispatch one action, keeping its effects. Returns whether state changed.
    pub fn dispatch(&mut self, action: A) -> bool {
        let DispatchResult { changed, effects } = self.store.dispatch(action);
        self.effects.extend(effects);
        changed
    }

    /// Dispatch several actions in order. Returns whether any changed state.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = A>) -> bool {
        actions
            .into_iter()
            .fold(false, |changed, action| self.dispatch(action) || changed)
    }

    /// Take every effect collected so far.
    pub fn drain_effects(&mut self) -> Vec<E> {
        std::mem::take(&mut self.effects)
    }

    /// Current state.
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Mutable state, for arranging a scenario.
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }
}

/// Assert that an effect matching the pattern was collected.
///
/// ```ignore
/// let effects = harness.drain_effects();
/// assert_effect!(effects, UserEffect::Login { .. });
/// ```
#[macro_export]
macro_rules! assert_effect {
    ($effects:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $effects.iter().any(|e| matches!(e, $pattern $(if $guard)?)),
            "Expected effect matching `{}`, but got: {:?}",
            stringify!($pattern),
            $effects
        );
    };
}

/// Assert that no effect matching the pattern was collected.
#[macro_export]
macro_rules! assert_no_effect {
    ($effects:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$effects.iter().any(|e| matches!(e, $pattern $(if $guard)?)),
            "Expected no effect matching `{}`, but got: {:?}",
            stringify!($pattern),
            $effects
        );
    };
}

/// First collected effect matching the pattern.
#[macro_export]
macro_rules! find_effect {
    ($effects:expr, $pattern:pat $(if $guard:expr)?) => {
        $effects.iter().find(|e| matches!(e, $pattern $(if $guard)?))
    };
}

/// Number of collected effects matching the pattern.
#[macro_export]
macro_rules! count_effects {
    ($effects:expr, $pattern:pat $(if $guard:expr)?) => {
        $effects
            .iter()
            .filter(|e| matches!(e, $pattern $(if $guard)?))
            .count()
    };
}

pub use crate::{assert_effect, assert_no_effect, count_effects, find_effect};

/// Freeze tokio time for the current runtime.
///
/// Requires a current-thread runtime, as created by `#[tokio::test]`.
#[cfg(feature = "testing-time")]
pub fn pause_time() {
    tokio::time::pause();
}

/// Let tokio time run again.
#[cfg(feature = "testing-time")]
pub fn resume_time() {
    tokio::time::resume();
}

/// Move paused time forward, firing every timer that comes due.
#[cfg(feature = "testing-time")]
pub async fn advance_time(duration: std::time::Duration) {
    tokio::time::advance(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum Counter {
        Add(i32),
        Reset,
    }

    impl Action for Counter {
        fn name(&self) -> &'static str {
            match self {
                Counter::Add(_) => "Add",
                Counter::Reset => "Reset",
            }
        }
    }

    #[derive(Debug, PartialEq)]
    enum Note {
        Overflow(i32),
    }

    fn reducer(state: &mut i32, action: Counter) -> DispatchResult<Note> {
        match action {
            Counter::Add(n) => {
                *state += n;
                if *state > 10 {
                    DispatchResult::changed_with(Note::Overflow(*state))
                } else {
                    DispatchResult::changed()
                }
            }
            Counter::Reset if *state == 0 => DispatchResult::unchanged(),
            Counter::Reset => {
                *state = 0;
                DispatchResult::changed()
            }
        }
    }

    #[test]
    fn test_harness_collects_effects() {
        let mut harness = ReducerHarness::new(0, reducer);
        assert!(harness.dispatch_all([Counter::Add(6), Counter::Add(6)]));
        assert_eq!(*harness.state(), 12);

        let effects = harness.drain_effects();
        assert_effect!(effects, Note::Overflow(12));
        assert_no_effect!(effects, Note::Overflow(6));
        assert_eq!(count_effects!(effects, Note::Overflow(_)), 1);
        assert_eq!(
            find_effect!(effects, Note::Overflow(n) if *n > 10),
            Some(&Note::Overflow(12))
        );
        assert!(harness.drain_effects().is_empty());
    }

    #[test]
    fn test_harness_reports_unchanged() {
        let mut harness = ReducerHarness::new(0, reducer);
        assert!(!harness.dispatch(Counter::Reset));

        *harness.state_mut() = 3;
        assert!(harness.dispatch(Counter::Reset));
        assert_eq!(*harness.state(), 0);
    }
}
