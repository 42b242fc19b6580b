//! Schedule entry entities.

pub mod lunch;
pub mod model;

pub use lunch::{ALLOWED_LUNCH_MINUTES, DEFAULT_LUNCH_MINUTES, normalize_lunch_minutes};
pub use model::{ScheduleEntry, ShiftWindow};
