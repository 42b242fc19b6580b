//! # sitecrew-entity
//!
//! Domain entity models for SiteCrew. Every record struct in this crate is
//! one element of a JSON mirror file and implements
//! [`Record`](sitecrew_core::traits::Record): it knows how to normalize
//! itself, how to check its own required fields, and how it sorts.
//! Cross-collection references are checked by the store, not here.

pub mod object;
pub mod schedule;
pub mod session;
pub mod user;
pub mod validate;
pub mod worker;

pub use object::{JobObject, ObjectStatus};
pub use schedule::ScheduleEntry;
pub use session::Session;
pub use user::{User, UserRole};
pub use worker::Worker;
