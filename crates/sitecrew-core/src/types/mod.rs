//! Core type definitions used across the SiteCrew workspace.

pub mod id;

pub use id::*;
