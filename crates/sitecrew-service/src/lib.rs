//! # sitecrew-service
//!
//! Operations that span several collections or need to know who is acting.
//! Handlers build a [`RequestContext`](context::RequestContext) once per
//! request and pass it into these services.

pub mod context;
pub mod dashboard;
pub mod profile;
pub mod users;

pub use context::RequestContext;
pub use dashboard::{DashboardService, DashboardStats};
pub use profile::{ProfileService, ProfileUpdate};
pub use users::{AdminUserService, CreateUserInput, UpdateUserInput};
