//! Keyed async tasks that report back with an action
//!
//! Every task is registered under a [`TaskKey`]. Spawning under a key that is
//! still running aborts the older task first, so at most one request per key
//! is ever in flight.
//!
//! ```ignore
//! let (action_tx, mut action_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut tasks = TaskManager::new(action_tx);
//!
//! tasks.spawn("news.fetch", async move {
//!     match feed.fetch_news(&category).await {
//!         Ok(payload) => NewsAction::FeedDidLoad { request, payload },
//!         Err(e) => NewsAction::FeedDidFail { request, message: e.to_string() },
//!     }
//! });
//!
//! tasks.cancel(&TaskKey::new("news.fetch"));
//! ```

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::Action;

/// Identifies a task for cancellation and replacement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    /// Create a new task key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Registry of running tasks, keyed for replacement.
///
/// Finished tasks are pruned lazily on every spawn and query.
pub struct TaskManager<A> {
    tasks: HashMap<TaskKey, AbortHandle>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> TaskManager<A>
where
    A: Action,
{
    /// Create a task manager that sends task results to `action_tx`.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            tasks: HashMap::new(),
            action_tx,
        }
    }

    /// Spawn a task, aborting any running task with the same key.
    ///
    /// The action the future resolves to is sent to the action channel. An
    /// aborted task sends nothing.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.prune();
        let key = key.into();
        if self.cancel(&key) {
            tracing::debug!(task = key.name(), "replaced running task");
        }

        let tx = self.action_tx.clone();
        let handle = tokio::spawn(async move {
            let action = future.await;
            let _ = tx.send(action);
        });

        tracing::debug!(task = key.name(), "spawned task");
        self.tasks.insert(key, handle.abort_handle());
        self
    }

    /// Abort a task by key. Returns true if a running task was aborted.
    pub fn cancel(&mut self, key: &TaskKey) -> bool {
        match self.tasks.remove(key) {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Abort every running task.
    pub fn cancel_all(&mut self) {
        for (key, handle) in self.tasks.drain() {
            if !handle.is_finished() {
                tracing::debug!(task = key.name(), "cancelled task on shutdown");
                handle.abort();
            }
        }
    }

    /// Whether a task with the given key is still running.
    pub fn is_running(&mut self, key: &TaskKey) -> bool {
        self.prune();
        self.tasks.contains_key(key)
    }

    /// Number of running tasks.
    pub fn len(&mut self) -> usize {
        self.prune();
        self.tasks.len()
    }

    /// Whether no task is running.
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    fn prune(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
