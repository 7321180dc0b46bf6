//! Session-stored admin state.

pub mod session;

pub use session::{keys as session_keys, load, notify, save};
