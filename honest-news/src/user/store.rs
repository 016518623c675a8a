use std::sync::Arc;

use store_dispatch::{
    ActionTrace, EffectStoreWithMiddleware, RequestId, RequestIds, RequestTracker, Settlement,
    StoreHandle, StoreRuntime,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::action::UserAction;
use super::effect::effect_handler;
use super::reducer::reducer;
use super::state::UserState;
use crate::backend::{demo_user, IdentityProvider};
use crate::error::StoreError;
use crate::model::{Credentials, PreferencesPatch, Registration, User};

/// The signed-in user and account operations, running on its own task.
///
/// Must be created inside a tokio runtime.
pub struct UserStore {
    handle: StoreHandle<UserState, UserAction>,
    ids: RequestIds,
    task: JoinHandle<()>,
}

impl UserStore {
    /// Start a store with nobody signed in.
    pub fn spawn(identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_state(UserState::default(), identity, ActionTrace::new("user"))
    }

    /// Start a store from an injected state.
    pub fn with_state(
        state: UserState,
        identity: Arc<dyn IdentityProvider>,
        trace: ActionTrace,
    ) -> Self {
        let store = EffectStoreWithMiddleware::new(state, reducer, trace);
        let runtime = StoreRuntime::from_store(store);
        let handle = runtime.handle();
        let task = runtime.spawn(effect_handler(identity));

        Self {
            handle,
            ids: RequestIds::new(),
            task,
        }
    }

    pub fn snapshot(&self) -> UserState {
        self.handle.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<UserState> {
        self.handle.subscribe()
    }

    /// Sign in. Fails with "Invalid credentials" when a field is empty.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<User, StoreError> {
        let request = self.ids.next();
        self.handle
            .dispatch(UserAction::SessionLogin {
                credentials: Credentials::new(email, password),
                request,
            })
            .await?;
        self.session_user(request).await
    }

    /// Create an account on the free tier and sign in with it.
    pub async fn register(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<User, StoreError> {
        let request = self.ids.next();
        self.handle
            .dispatch(UserAction::SessionRegister {
                registration: Registration::new(email, password, name),
                request,
            })
            .await?;
        self.session_user(request).await
    }

    /// Merge `patch` into the user's preferences. Succeeds without effect
    /// when nobody is signed in.
    pub async fn update_preferences(&self, patch: PreferencesPatch) -> Result<(), StoreError> {
        let request = self.ids.next();
        self.handle
            .dispatch(UserAction::PreferencesUpdate { patch, request })
            .await?;
        self.outcome(request, |s| &s.preferences).await.map(drop)
    }

    /// Sign out. The user is cleared even if the backend call fails.
    pub async fn logout(&self) -> Result<(), StoreError> {
        let request = self.ids.next();
        self.handle
            .dispatch(UserAction::SessionLogout { request })
            .await?;
        self.outcome(request, |s| &s.logout).await.map(drop)
    }

    /// Sign in as the demo account immediately.
    pub async fn set_demo_user(&self) -> Result<(), StoreError> {
        Ok(self
            .handle
            .dispatch(UserAction::DemoUserInstall(demo_user()))
            .await?)
    }

    pub async fn clear_error(&self) -> Result<(), StoreError> {
        Ok(self.handle.dispatch(UserAction::ErrorClear).await?)
    }

    /// Stop the store. Operations still in flight are aborted.
    pub async fn shutdown(self) {
        self.handle.shutdown();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "user store task failed");
        }
    }

    async fn session_user(&self, request: RequestId) -> Result<User, StoreError> {
        let state = self.outcome(request, |s| &s.session).await?;
        state
            .user
            .ok_or_else(|| StoreError::Rejected(super::effect::LOGIN_FAILED.to_string()))
    }

    // Waits until `request`, or a request that superseded it, has an outcome.
    async fn outcome<F>(&self, request: RequestId, tracker: F) -> Result<UserState, StoreError>
    where
        F: Fn(&UserState) -> &RequestTracker,
    {
        let state = self
            .handle
            .wait_for(|s| tracker(s).is_settled(request))
            .await?;
        match tracker(&state).settlement() {
            Some(Settlement::Failed(message)) => Err(StoreError::Rejected(message.clone())),
            _ => Ok(state),
        }
    }
}
