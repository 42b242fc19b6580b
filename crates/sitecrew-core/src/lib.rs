//! # sitecrew-core
//!
//! Core crate for SiteCrew. Contains the record traits shared by every
//! collection, configuration schemas, typed identifiers, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other SiteCrew crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
