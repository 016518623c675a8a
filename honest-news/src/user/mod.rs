//! User store: the signed-in account and its preferences

mod action;
mod effect;
mod reducer;
mod state;
mod store;

pub use action::{UserAction, UserActionCategory};
pub use effect::{
    effect_handler, SessionAttempt, UserEffect, LOGIN_FAILED, PREFERENCES_FAILED,
    REGISTRATION_FAILED,
};
pub use reducer::{reducer, DEMO_INSTALLED, SIGNED_OUT};
pub use state::UserState;
pub use store::UserStore;
