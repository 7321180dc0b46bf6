//! Session-stored visitor state.

pub mod session;

pub use session::{keys as session_keys, load, save};
