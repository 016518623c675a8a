//! News store: article catalog, featured articles and topics

mod action;
mod effect;
mod reducer;
mod state;
mod store;

pub use action::{LoadMode, NewsAction, NewsActionCategory};
pub use effect::{effect_handler, NewsEffect};
pub use reducer::reducer;
pub use state::{NewsState, DEFAULT_CATEGORY, FEATURED_COUNT};
pub use store::NewsStore;
