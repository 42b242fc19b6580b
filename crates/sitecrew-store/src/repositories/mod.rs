//! Concrete repositories, one per entity kind.

pub mod object;
pub mod schedule;
pub mod user;
pub mod worker;

pub use object::ObjectRepository;
pub use schedule::ScheduleRepository;
pub use user::UserRepository;
pub use worker::{WorkerFilter, WorkerRepository, WorkerScope};
