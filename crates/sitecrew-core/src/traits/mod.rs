//! Core traits defined in `sitecrew-core` and implemented by other crates.

pub mod hashing;
pub mod record;
pub mod repository;

pub use hashing::PasswordHashing;
pub use record::{DeletionPolicy, Record};
pub use repository::Repository;
