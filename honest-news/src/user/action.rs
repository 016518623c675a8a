//! User store actions
//!
//! Categories (inferred from naming):
//! - `session`: login, register, logout and their results
//! - `preferences`: PreferencesUpdate and its results
//! - `demo_user`: DemoUserInstall
//! - `error`: ErrorClear

use store_dispatch::{ActionSummary, RequestId};

use crate::model::{Credentials, PreferencesPatch, Registration, User};

#[derive(store_dispatch::Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
pub enum UserAction {
    // ===== Session =====
    SessionLogin {
        credentials: Credentials,
        request: RequestId,
    },
    SessionRegister {
        registration: Registration,
        request: RequestId,
    },
    /// Result: login or registration produced a user.
    SessionDidStart { request: RequestId, user: User },
    /// Result: login or registration failed.
    SessionDidFail { request: RequestId, message: String },
    SessionLogout { request: RequestId },
    /// Result: the backend acknowledged the logout, or failed to.
    SessionDidEnd { request: RequestId },

    // ===== Preferences =====
    PreferencesUpdate {
        patch: PreferencesPatch,
        request: RequestId,
    },
    PreferencesDidApply {
        request: RequestId,
        patch: PreferencesPatch,
    },
    PreferencesDidFail { request: RequestId, message: String },

    /// Sign in as the demo account without a backend round trip.
    DemoUserInstall(User),

    ErrorClear,
}

impl ActionSummary for UserAction {
    fn summary(&self) -> String {
        match self {
            UserAction::SessionLogin {
                credentials,
                request,
            } => format!("SessionLogin {{ email: {:?}, request: {request} }}", credentials.email),
            UserAction::SessionRegister {
                registration,
                request,
            } => format!(
                "SessionRegister {{ email: {:?}, request: {request} }}",
                registration.email
            ),
            UserAction::SessionDidStart { request, user } => {
                format!("SessionDidStart {{ request: {request}, user: {:?} }}", user.email)
            }
            UserAction::DemoUserInstall(user) => format!("DemoUserInstall({:?})", user.email),
            _ => format!("{:?}", self),
        }
    }
}
