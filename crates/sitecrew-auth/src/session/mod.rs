//! Session lifecycle.

pub mod manager;
pub mod token;

pub use manager::{SessionLookup, SessionManager};
