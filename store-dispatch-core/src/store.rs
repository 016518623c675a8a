//! Effect-aware state store
//!
//! Reducers are plain functions that mutate state and describe the side
//! effects the action calls for. The effects are data, not work: the
//! runtime hands them to an effect handler which spawns the actual tasks.
//!
//! ```ignore
//! fn reducer(state: &mut FeedState, action: FeedAction) -> DispatchResult<FeedEffect> {
//!     match action {
//!         FeedAction::Fetch { request } => {
//!             state.loading = true;
//!             DispatchResult::changed_with(FeedEffect::Load { request })
//!         }
//!         FeedAction::DidLoad { items, .. } => {
//!             state.loading = false;
//!             state.items = items;
//!             DispatchResult::changed()
//!         }
//!     }
//! }
//!
//! let mut store = EffectStore::new(FeedState::default(), reducer);
//! let result = store.dispatch(FeedAction::Fetch { request });
//! assert_eq!(result.effects.len(), 1);
//! ```

use std::marker::PhantomData;

use crate::action::Action;

/// Result of dispatching an action to an effect store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after dispatch.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change and no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: Vec::new(),
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: Vec::new(),
        }
    }

    /// State changed and one effect to run.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// One effect to run, state untouched.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self {
            changed: false,
            effects: vec![effect],
        }
    }

    /// Add an effect to this result.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Returns true if there are any effects to process.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// A reducer that can emit effects.
pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// Hooks that run around every reducer call.
///
/// Implement this for logging, metrics or auditing without touching the
/// reducers themselves.
pub trait Middleware<A: Action> {
    /// Called before the action reaches the reducer
    fn before(&mut self, action: &A);

    /// Called after the reducer ran
    fn after(&mut self, action: &A, state_changed: bool, effects: usize);
}

/// Middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool, _effects: usize) {}
}

/// State container driven by an [`EffectReducer`].
pub struct EffectStore<S, A, E> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    _marker: PhantomData<(A, E)>,
}

impl<S, A, E> EffectStore<S, A, E>
where
    A: Action,
{
    /// Create a store with an injected initial state.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access to the state, for setup in tests.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Run the reducer for one action.
    #[inline]
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        (self.reducer)(&mut self.state, action)
    }
}

/// An [`EffectStore`] wrapped in middleware hooks.
pub struct EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    store: EffectStore<S, A, E>,
    middleware: M,
}

impl<S, A, E, M> EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    /// Create a store with middleware.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>, middleware: M) -> Self {
        Self {
            store: EffectStore::new(state, reducer),
            middleware,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// The middleware.
    #[inline]
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Dispatch through `before`, the reducer, then `after`.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        self.middleware.before(&action);
        let result = self.store.dispatch(action.clone());
        self.middleware
            .after(&action, result.changed, result.effects.len());
        result
    }
}

/// Store interface used by [`StoreRuntime`](crate::runtime::StoreRuntime).
pub trait EffectStoreLike<S, A: Action, E> {
    /// Dispatch an action and return state changes plus effects.
    fn dispatch(&mut self, action: A) -> DispatchResult<E>;
    /// Get the current state.
    fn state(&self) -> &S;
}

impl<S, A: Action, E> EffectStoreLike<S, A, E> for EffectStore<S, A, E> {
    fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        EffectStore::dispatch(self, action)
    }

    fn state(&self) -> &S {
        EffectStore::state(self)
    }
}

impl<S, A: Action, E, M: Middleware<A>> EffectStoreLike<S, A, E>
    for EffectStoreWithMiddleware<S, A, E, M>
{
    fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        EffectStoreWithMiddleware::dispatch(self, action)
    }

    fn state(&self) -> &S {
        EffectStoreWithMiddleware::state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum TestAction {
        Load,
        DidLoad(Vec<u32>),
        Noop,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Load => "Load",
                TestAction::DidLoad(_) => "DidLoad",
                TestAction::Noop => "Noop",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestEffect {
        Fetch,
        Log(String),
    }

    #[derive(Default)]
    struct TestState {
        loading: bool,
        items: Vec<u32>,
    }

    fn reducer(state: &mut TestState, action: TestAction) -> DispatchResult<TestEffect> {
        match action {
            TestAction::Load => {
                state.loading = true;
                DispatchResult::changed_with(TestEffect::Fetch)
            }
            TestAction::DidLoad(items) => {
                state.loading = false;
                let count = items.len();
                state.items = items;
                DispatchResult::changed().with(TestEffect::Log(format!("{count} items")))
            }
            TestAction::Noop => DispatchResult::unchanged(),
        }
    }

    #[test]
    fn test_dispatch_result_builders() {
        let r: DispatchResult<TestEffect> = DispatchResult::unchanged();
        assert!(!r.changed);
        assert!(!r.has_effects());

        let r = DispatchResult::effect(TestEffect::Fetch);
        assert!(!r.changed);
        assert_eq!(r.effects, vec![TestEffect::Fetch]);

        let r = DispatchResult::changed_with(TestEffect::Fetch).with(TestEffect::Log("x".into()));
        assert!(r.changed);
        assert_eq!(r.effects.len(), 2);
    }

    #[test]
    fn test_effect_store_dispatch() {
        let mut store = EffectStore::new(TestState::default(), reducer);

        let result = store.dispatch(TestAction::Load);
        assert!(result.changed);
        assert_eq!(result.effects, vec![TestEffect::Fetch]);
        assert!(store.state().loading);

        let result = store.dispatch(TestAction::DidLoad(vec![1, 2]));
        assert!(result.changed);
        assert_eq!(result.effects, vec![TestEffect::Log("2 items".into())]);
        assert_eq!(store.state().items, vec![1, 2]);
        assert!(!store.state().loading);

        assert!(!store.dispatch(TestAction::Noop).changed);
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(&'static str, bool, usize)>,
        before: usize,
    }

    impl Middleware<TestAction> for Recorder {
        fn before(&mut self, _action: &TestAction) {
            self.before += 1;
        }

        fn after(&mut self, action: &TestAction, state_changed: bool, effects: usize) {
            self.seen.push((action.name(), state_changed, effects));
        }
    }

    #[test]
    fn test_middleware_sees_every_dispatch() {
        let mut store =
            EffectStoreWithMiddleware::new(TestState::default(), reducer, Recorder::default());

        store.dispatch(TestAction::Load);
        store.dispatch(TestAction::Noop);

        assert_eq!(store.middleware().before, 2);
        assert_eq!(
            store.middleware().seen,
            vec![("Load", true, 1), ("Noop", false, 0)]
        );
    }
}
