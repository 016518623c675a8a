use serde::Serialize;
use store_dispatch::RequestTracker;

use crate::model::User;

/// The signed-in user, if any, and the status of account operations.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// A login, registration or preferences update is in flight.
    pub loading: bool,
    pub error: Option<String>,

    /// Login and registration, which supersede each other.
    #[serde(skip)]
    pub session: RequestTracker,
    #[serde(skip)]
    pub preferences: RequestTracker,
    #[serde(skip)]
    pub logout: RequestTracker,
}

impl UserState {
    /// State of a signed-in user.
    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            ..Self::default()
        }
    }

    pub(crate) fn sign_in(&mut self, user: User) {
        self.user = Some(user);
        self.is_authenticated = true;
    }

    pub(crate) fn sign_out(&mut self) {
        self.user = None;
        self.is_authenticated = false;
    }

    // Logout is not reflected in `loading`.
    pub(crate) fn sync_loading(&mut self) {
        self.loading = self.session.in_flight() || self.preferences.in_flight();
    }
}
