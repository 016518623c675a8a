//! Headless runtime for effect stores.
//!
//! A [`StoreRuntime`] owns one store and applies actions to it one at a time
//! on a single task. Readers and writers talk to it through cloneable
//! [`StoreHandle`]s:
//!
//! - commands go in through [`StoreHandle::dispatch`], which resolves once
//!   the action was reduced
//! - results of spawned tasks come back on the runtime's action channel
//! - every state change is published as a snapshot on a `watch` channel, so a
//!   reader never observes a half-applied action
//!
//! ```ignore
//! let runtime = StoreRuntime::from_store(EffectStore::new(FeedState::default(), reducer));
//! let handle = runtime.handle();
//! let task = runtime.spawn(move |effect, ctx| match effect {
//!     FeedEffect::Load { request } => {
//!         ctx.tasks().spawn("feed", async move { load(request).await });
//!     }
//! });
//!
//! handle.dispatch(FeedAction::Fetch { request }).await?;
//! let state = handle.wait_for(|s| !s.loading).await?;
//!
//! handle.shutdown();
//! task.await?;
//! ```

use std::marker::PhantomData;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::store::{EffectReducer, EffectStore, EffectStoreLike};
use crate::tasks::TaskManager;
use crate::Action;

/// Errors surfaced by [`StoreHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The runtime loop has stopped and no longer accepts actions.
    #[error("store runtime has shut down")]
    Closed,
}

struct Command<A> {
    action: A,
    ack: Option<oneshot::Sender<()>>,
}

/// Context passed to effect handlers.
pub struct EffectContext<'a, A: Action> {
    tasks: &'a mut TaskManager<A>,
}

impl<A: Action> EffectContext<'_, A> {
    /// Access the task manager.
    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        self.tasks
    }
}

/// Owns a store and runs its dispatch loop.
pub struct StoreRuntime<S, A: Action, E, St: EffectStoreLike<S, A, E> = EffectStore<S, A, E>> {
    store: St,
    action_rx: mpsc::UnboundedReceiver<A>,
    command_tx: mpsc::UnboundedSender<Command<A>>,
    command_rx: mpsc::UnboundedReceiver<Command<A>>,
    snapshot_tx: watch::Sender<S>,
    shutdown: CancellationToken,
    tasks: TaskManager<A>,
    _effect: PhantomData<E>,
}

impl<S, A, E> StoreRuntime<S, A, E, EffectStore<S, A, E>>
where
    S: Clone,
    A: Action,
{
    /// Create a runtime from an initial state and reducer.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self::from_store(EffectStore::new(state, reducer))
    }
}

impl<S, A, E, St> StoreRuntime<S, A, E, St>
where
    S: Clone,
    A: Action,
    St: EffectStoreLike<S, A, E>,
{
    /// Create a runtime around an existing store.
    pub fn from_store(store: St) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(store.state().clone());
        let tasks = TaskManager::new(action_tx);

        Self {
            store,
            action_rx,
            command_tx,
            command_rx,
            snapshot_tx,
            shutdown: CancellationToken::new(),
            tasks,
            _effect: PhantomData,
        }
    }

    /// A handle for dispatching and reading snapshots.
    pub fn handle(&self) -> StoreHandle<S, A> {
        StoreHandle {
            command_tx: self.command_tx.clone(),
            snapshot_rx: self.snapshot_tx.subscribe(),
            shutdown: self.shutdown.clone(),
        }
    }

    /// Current state as seen by the loop.
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Access the task manager.
    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        &mut self.tasks
    }

    /// Run the dispatch loop until a handle requests shutdown.
    ///
    /// Commands from handles and actions from tasks are applied in arrival
    /// order. Running tasks are aborted when the loop ends.
    pub async fn run<F>(&mut self, mut handle_effect: F)
    where
        F: FnMut(E, &mut EffectContext<'_, A>),
    {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => None,
                Some(command) = self.command_rx.recv() => Some((command.action, command.ack)),
                Some(action) = self.action_rx.recv() => Some((action, None)),
                else => None,
            };
            let Some((action, ack)) = next else {
                break;
            };

            self.apply(action, &mut handle_effect);
            if let Some(ack) = ack {
                let _ = ack.send(());
            }
        }

        self.tasks.cancel_all();
        tracing::debug!("store runtime stopped");
    }

    /// Move the runtime onto its own tokio task.
    pub fn spawn<F>(mut self, handle_effect: F) -> JoinHandle<()>
    where
        Self: Send + 'static,
        F: FnMut(E, &mut EffectContext<'_, A>) + Send + 'static,
    {
        tokio::spawn(async move { self.run(handle_effect).await })
    }

    fn apply<F>(&mut self, action: A, handle_effect: &mut F)
    where
        F: FnMut(E, &mut EffectContext<'_, A>),
    {
        let result = self.store.dispatch(action);
        if result.changed {
            self.snapshot_tx.send_replace(self.store.state().clone());
        }

        if result.has_effects() {
            let mut ctx = EffectContext {
                tasks: &mut self.tasks,
            };
            for effect in result.effects {
                handle_effect(effect, &mut ctx);
            }
        }
    }
}

/// Cloneable access to a running store.
pub struct StoreHandle<S, A> {
    command_tx: mpsc::UnboundedSender<Command<A>>,
    snapshot_rx: watch::Receiver<S>,
    shutdown: CancellationToken,
}

impl<S, A> Clone for StoreHandle<S, A> {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            snapshot_rx: self.snapshot_rx.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<S: Clone, A: Action> StoreHandle<S, A> {
    /// Dispatch an action and wait until the store has reduced it.
    ///
    /// When this resolves, [`snapshot`](Self::snapshot) reflects the action
    /// and its effects have been started.
    pub async fn dispatch(&self, action: A) -> Result<(), RuntimeError> {
        if self.shutdown.is_cancelled() {
            return Err(RuntimeError::Closed);
        }
        let (ack, done) = oneshot::channel();
        self.command_tx
            .send(Command {
                action,
                ack: Some(ack),
            })
            .map_err(|_| RuntimeError::Closed)?;
        done.await.map_err(|_| RuntimeError::Closed)
    }

    /// Queue an action without waiting for it.
    pub fn send(&self, action: A) -> Result<(), RuntimeError> {
        if self.shutdown.is_cancelled() {
            return Err(RuntimeError::Closed);
        }
        self.command_tx
            .send(Command { action, ack: None })
            .map_err(|_| RuntimeError::Closed)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> S {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.snapshot_rx.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    ///
    /// The current snapshot is checked first.
    pub async fn wait_for<F>(&self, mut predicate: F) -> Result<S, RuntimeError>
    where
        F: FnMut(&S) -> bool,
    {
        let mut rx = self.snapshot_rx.clone();
        rx.wait_for(|state| predicate(state))
            .await
            .map(|state| state.clone())
            .map_err(|_| RuntimeError::Closed)
    }

    /// Ask the runtime loop to stop.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Whether shutdown was requested.
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}
