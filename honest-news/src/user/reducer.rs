//! User reducer
//!
//! Login and registration share the `session` tracker: a newer attempt
//! supersedes an older one, and logout abandons whichever is in flight.
//! Preference results are applied in request order, dropping any that
//! arrive after a newer one.

use store_dispatch::{DispatchResult, RequestId, Settlement};

use super::action::UserAction;
use super::effect::{SessionAttempt, UserEffect};
use super::state::UserState;

/// Outcome recorded for a login or registration cut short by logout.
pub const SIGNED_OUT: &str = "Signed out before the request completed";

/// Outcome recorded for a login or registration replaced by the demo account.
pub const DEMO_INSTALLED: &str = "Replaced by the demo account";

pub fn reducer(state: &mut UserState, action: UserAction) -> DispatchResult<UserEffect> {
    match action {
        UserAction::SessionLogin {
            credentials,
            request,
        } => start_session(state, request, SessionAttempt::Login(credentials)),

        UserAction::SessionRegister {
            registration,
            request,
        } => start_session(state, request, SessionAttempt::Register(registration)),

        UserAction::SessionDidStart { request, user } => {
            if !state.session.settle(request, Settlement::Completed) {
                tracing::warn!(%request, "dropping stale session result");
                return DispatchResult::unchanged();
            }
            state.sign_in(user);
            state.sync_loading();
            DispatchResult::changed()
        }

        UserAction::SessionDidFail { request, message } => {
            if !state
                .session
                .settle(request, Settlement::Failed(message.clone()))
            {
                tracing::warn!(%request, "dropping stale session failure");
                return DispatchResult::unchanged();
            }
            state.error = Some(message);
            state.sync_loading();
            DispatchResult::changed()
        }

        UserAction::SessionLogout { request } => {
            if !state.logout.begin(request) {
                return DispatchResult::unchanged();
            }
            if state.session.abandon(SIGNED_OUT) {
                tracing::debug!(%request, "logout abandoned session attempt");
            }
            state.sync_loading();
            DispatchResult::changed_with(UserEffect::EndSession { request })
        }

        UserAction::SessionDidEnd { request } => {
            if !state.logout.settle(request, Settlement::Completed) {
                return DispatchResult::unchanged();
            }
            // A session started after this logout keeps its user
            match state.session.latest() {
                Some(session) if session > request => {
                    tracing::debug!(%request, %session, "newer session survives logout");
                }
                _ => state.sign_out(),
            }
            DispatchResult::changed()
        }

        UserAction::PreferencesUpdate { patch, request } => {
            if !state.preferences.begin(request) {
                return DispatchResult::unchanged();
            }
            state.sync_loading();
            DispatchResult::changed_with(UserEffect::SavePreferences { request, patch })
        }

        UserAction::PreferencesDidApply { request, patch } => {
            if !state
                .preferences
                .settle_in_order(request, Settlement::Completed)
            {
                tracing::warn!(%request, "dropping out-of-order preferences result");
                return DispatchResult::unchanged();
            }
            match state.user.as_mut() {
                Some(user) => {
                    patch.apply(&mut user.preferences);
                }
                None => tracing::debug!(%request, "no user, preferences not merged"),
            }
            state.sync_loading();
            DispatchResult::changed()
        }

        UserAction::PreferencesDidFail { request, message } => {
            if !state
                .preferences
                .settle_in_order(request, Settlement::Failed(message.clone()))
            {
                tracing::warn!(%request, "dropping out-of-order preferences failure");
                return DispatchResult::unchanged();
            }
            state.error = Some(message);
            state.sync_loading();
            DispatchResult::changed()
        }

        UserAction::DemoUserInstall(user) => {
            if state.session.abandon(DEMO_INSTALLED) {
                tracing::debug!("demo account replaced session attempt");
            }
            state.sign_in(user);
            state.sync_loading();
            DispatchResult::changed()
        }

        UserAction::ErrorClear => {
            if state.error.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
    }
}

fn start_session(
    state: &mut UserState,
    request: RequestId,
    attempt: SessionAttempt,
) -> DispatchResult<UserEffect> {
    if !state.session.begin(request) {
        return DispatchResult::unchanged();
    }
    state.error = None;
    state.sync_loading();
    DispatchResult::changed_with(UserEffect::StartSession { request, attempt })
}
