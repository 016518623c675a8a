//! User effects and the handler that runs them

use std::sync::Arc;

use store_dispatch::{EffectContext, RequestId, TaskKey};

use super::action::UserAction;
use crate::backend::IdentityProvider;
use crate::model::{Credentials, PreferencesPatch, Registration};

const SESSION_TASK: &str = "user.session";
const LOGOUT_TASK: &str = "user.logout";

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const PREFERENCES_FAILED: &str = "Failed to update preferences";

/// How a session is being started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAttempt {
    Login(Credentials),
    Register(Registration),
}

impl SessionAttempt {
    fn fallback_message(&self) -> &'static str {
        match self {
            SessionAttempt::Login(_) => LOGIN_FAILED,
            SessionAttempt::Register(_) => REGISTRATION_FAILED,
        }
    }
}

/// Side effects requested by the user reducer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserEffect {
    /// Log in or register
    StartSession {
        request: RequestId,
        attempt: SessionAttempt,
    },
    /// Abort any session attempt and sign out with the backend
    EndSession { request: RequestId },
    /// Persist a preferences change
    SavePreferences {
        request: RequestId,
        patch: PreferencesPatch,
    },
}

/// Build the effect handler for a user runtime.
///
/// Login and registration share one task key. Preference updates each get
/// their own task, so every update reaches the backend.
pub fn effect_handler(
    identity: Arc<dyn IdentityProvider>,
) -> impl FnMut(UserEffect, &mut EffectContext<'_, UserAction>) + Send + 'static {
    move |effect, ctx| match effect {
        UserEffect::StartSession { request, attempt } => {
            let identity = Arc::clone(&identity);
            ctx.tasks().spawn(SESSION_TASK, async move {
                let result = match &attempt {
                    SessionAttempt::Login(credentials) => identity.login(credentials).await,
                    SessionAttempt::Register(registration) => {
                        identity.register(registration).await
                    }
                };
                match result {
                    Ok(user) => UserAction::SessionDidStart { request, user },
                    Err(e) => {
                        tracing::warn!(%request, error = %e, "session not started");
                        UserAction::SessionDidFail {
                            request,
                            message: e.message_or(attempt.fallback_message()),
                        }
                    }
                }
            });
        }

        UserEffect::EndSession { request } => {
            if ctx.tasks().cancel(&TaskKey::new(SESSION_TASK)) {
                tracing::debug!(%request, "aborted session attempt on logout");
            }
            let identity = Arc::clone(&identity);
            ctx.tasks().spawn(LOGOUT_TASK, async move {
                if let Err(e) = identity.logout().await {
                    tracing::warn!(%request, error = %e, "logout failed, clearing session anyway");
                }
                UserAction::SessionDidEnd { request }
            });
        }

        UserEffect::SavePreferences { request, patch } => {
            let identity = Arc::clone(&identity);
            let key = TaskKey::new(format!("user.preferences.{}", request.get()));
            ctx.tasks().spawn(key, async move {
                match identity.update_preferences(&patch).await {
                    Ok(patch) => UserAction::PreferencesDidApply { request, patch },
                    Err(e) => {
                        tracing::warn!(%request, error = %e, "preferences not saved");
                        UserAction::PreferencesDidFail {
                            request,
                            message: e.message_or(PREFERENCES_FAILED),
                        }
                    }
                }
            });
        }
    }
}
