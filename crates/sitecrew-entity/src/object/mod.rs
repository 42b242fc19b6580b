//! Job object (work site) entities.

pub mod model;
pub mod status;

pub use model::JobObject;
pub use status::ObjectStatus;
