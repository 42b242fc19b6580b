//! Schedule entry entity model.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{DeletionPolicy, Record};
use sitecrew_core::types::id::{ObjectId, ScheduleEntryId, UserId, WorkerId};

use super::lunch::{DEFAULT_LUNCH_MINUTES, normalize_lunch_minutes};
use crate::validate::{TIME_FORMAT, parse_date, parse_time, require, trim_in_place};

/// One day's work assignment: a time window, the workers and the objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(default)]
    pub id: ScheduleEntryId,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// `HH:MM`.
    #[serde(default)]
    pub start_time: String,
    /// `HH:MM`, strictly after `start_time` on the same day.
    #[serde(default)]
    pub end_time: String,
    #[serde(default = "default_lunch")]
    pub lunch_break_minutes: i32,
    #[serde(default)]
    pub worker_ids: Vec<WorkerId>,
    #[serde(default)]
    pub object_ids: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by_name: String,
}

/// Parsed time window of a valid entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ShiftWindow {
    /// Length of the shift in minutes, lunch included.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

fn default_lunch() -> i32 {
    DEFAULT_LUNCH_MINUTES
}

impl ScheduleEntry {
    pub fn new(
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: ScheduleEntryId::new(),
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            lunch_break_minutes: DEFAULT_LUNCH_MINUTES,
            worker_ids: Vec::new(),
            object_ids: Vec::new(),
            notes: String::new(),
            created_by_id: None,
            created_by_name: String::new(),
        }
    }

    /// Check the time rules and the non-empty reference lists.
    ///
    /// Runs in a fixed order so the first violated rule is the one reported.
    /// Whether the referenced workers and objects exist is checked by the store.
    pub fn validate(&self) -> AppResult<ShiftWindow> {
        require(&self.date, "date")?;
        let date = parse_date(&self.date, "date")?;
        let start = parse_time(&self.start_time, "start_time")?;
        let end = parse_time(&self.end_time, "end_time")?;
        if end <= start {
            return Err(AppError::validation("end_time must be after start_time"));
        }
        let window = ShiftWindow { date, start, end };
        if i64::from(self.lunch_break_minutes) >= window.duration_minutes() {
            return Err(AppError::validation(
                "lunch break must be shorter than the working interval",
            ));
        }
        if self.worker_ids.is_empty() {
            return Err(AppError::validation("at least one worker is required"));
        }
        if self.object_ids.is_empty() {
            return Err(AppError::validation("at least one object is required"));
        }
        Ok(window)
    }

    /// Copy creator identity from the stored version.
    pub fn keep_server_fields(&mut self, stored: &ScheduleEntry) {
        self.created_by_id = stored.created_by_id.clone();
        self.created_by_name = stored.created_by_name.clone();
    }
}

/// Drop blank and repeated identifiers, keeping first-seen order.
fn dedup_ids<T>(ids: &mut Vec<T>)
where
    T: AsRef<str> + Clone + Eq + Hash,
{
    let mut seen = HashSet::new();
    ids.retain(|id| !id.as_ref().trim().is_empty() && seen.insert(id.clone()));
}

/// Zero-pad a parseable clock time; leave anything else for validation.
fn canonical_time(value: &mut String) {
    trim_in_place(value);
    if let Ok(time) = NaiveTime::parse_from_str(value, TIME_FORMAT) {
        *value = time.format(TIME_FORMAT).to_string();
    }
}

impl Record for ScheduleEntry {
    type Id = ScheduleEntryId;

    const KIND: &'static str = "schedule entry";
    const DELETION: DeletionPolicy = DeletionPolicy::Physical;

    fn id(&self) -> &ScheduleEntryId {
        &self.id
    }

    fn set_id(&mut self, id: ScheduleEntryId) {
        self.id = id;
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.date);
        canonical_time(&mut self.start_time);
        canonical_time(&mut self.end_time);
        trim_in_place(&mut self.notes);
        trim_in_place(&mut self.created_by_name);
        self.lunch_break_minutes = normalize_lunch_minutes(self.lunch_break_minutes);
        self.worker_ids = self
            .worker_ids
            .drain(..)
            .map(|id| WorkerId::from(id.as_str()))
            .collect();
        self.object_ids = self
            .object_ids
            .drain(..)
            .map(|id| ObjectId::from(id.as_str()))
            .collect();
        dedup_ids(&mut self.worker_ids);
        dedup_ids(&mut self.object_ids);
    }

    /// Newest date first, then earliest start.
    fn ordering(a: &Self, b: &Self) -> Ordering {
        b.date
            .cmp(&a.date)
            .then_with(|| a.start_time.cmp(&b.start_time))
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: &str, end: &str, lunch: i32) -> ScheduleEntry {
        let mut entry = ScheduleEntry::new("2024-05-06", start, end);
        entry.lunch_break_minutes = lunch;
        entry.worker_ids = vec![WorkerId::from("w1")];
        entry.object_ids = vec![ObjectId::from("o1")];
        entry
    }

    #[test]
    fn test_valid_window() {
        let window = entry("08:00", "17:00", 60).validate().expect("valid");
        assert_eq!(window.duration_minutes(), 540);
    }

    #[test]
    fn test_end_must_follow_start() {
        assert!(entry("10:00", "10:00", 0).validate().is_err());
        assert!(entry("10:00", "09:00", 0).validate().is_err());
    }

    #[test]
    fn test_lunch_must_fit() {
        assert!(entry("08:00", "09:00", 60).validate().is_err());
        assert!(entry("08:00", "09:30", 60).validate().is_ok());
    }

    #[test]
    fn test_requires_workers_then_objects() {
        let mut e = entry("08:00", "17:00", 60);
        e.worker_ids.clear();
        e.object_ids.clear();
        let err = e.validate().expect_err("no workers");
        assert!(err.message.contains("worker"));
    }

    #[test]
    fn test_normalize_dedups_and_pads() {
        let mut e = entry("8:05", "17:00", 45);
        e.worker_ids = vec![
            WorkerId::from("w1"),
            WorkerId::from(""),
            WorkerId::from(" w1"),
            WorkerId::from("w2"),
        ];
        e.normalize();
        assert_eq!(e.start_time, "08:05");
        assert_eq!(e.lunch_break_minutes, 60);
        let ids: Vec<&str> = e.worker_ids.iter().map(WorkerId::as_str).collect();
        assert_eq!(ids, vec!["w1", "w2"]);
    }

    #[test]
    fn test_ordering_newest_date_first() {
        let mut a = entry("08:00", "17:00", 60);
        a.date = "2024-05-01".to_string();
        let mut b = entry("07:00", "17:00", 60);
        b.date = "2024-05-02".to_string();
        let mut c = entry("06:00", "17:00", 60);
        c.date = "2024-05-01".to_string();
        let mut list = vec![a, b, c];
        list.sort_by(ScheduleEntry::ordering);
        let order: Vec<(&str, &str)> = list
            .iter()
            .map(|e| (e.date.as_str(), e.start_time.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("2024-05-02", "07:00"), ("2024-05-01", "06:00"), ("2024-05-01", "08:00")]
        );
    }
}
