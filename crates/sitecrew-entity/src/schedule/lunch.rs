//! Lunch break durations.

/// Lunch break lengths a schedule entry may carry, in minutes.
pub const ALLOWED_LUNCH_MINUTES: [i32; 4] = [0, 30, 60, 90];

/// Substitute for any value outside [`ALLOWED_LUNCH_MINUTES`].
pub const DEFAULT_LUNCH_MINUTES: i32 = 60;

/// Coerce a lunch break length onto the allowed set.
pub fn normalize_lunch_minutes(minutes: i32) -> i32 {
    if ALLOWED_LUNCH_MINUTES.contains(&minutes) {
        minutes
    } else {
        DEFAULT_LUNCH_MINUTES
    }
}
