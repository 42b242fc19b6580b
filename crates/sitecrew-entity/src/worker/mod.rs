//! Worker profile entities.

pub mod model;

pub use model::Worker;
