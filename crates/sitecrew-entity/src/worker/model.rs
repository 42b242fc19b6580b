//! Worker entity model.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{DeletionPolicy, Record};
use sitecrew_core::types::id::{UserId, WorkerId};

use crate::validate::{parse_date, require, trim_in_place};

/// A person who can be assigned to schedule entries.
///
/// Workers are never physically deleted: firing keeps the record listed so
/// historical schedule entries still resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    #[serde(default)]
    pub id: WorkerId,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub phone: String,
    /// Pay per hour. Never negative.
    #[serde(default)]
    pub hourly_rate: f64,
    /// `YYYY-MM-DD`, or empty when unknown.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub birth_date: String,
    /// Login account of this worker, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub is_fired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fired_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Worker {
    /// A fresh, active worker with only the required fields set.
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: WorkerId::new(),
            name: name.into(),
            position: position.into(),
            phone: String::new(),
            hourly_rate: 0.0,
            birth_date: String::new(),
            user_id: None,
            is_fired: false,
            fired_at: None,
            created_by: None,
            created_by_name: String::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the worker can be scheduled.
    pub fn is_active(&self) -> bool {
        !self.is_fired
    }

    /// Required-field and range checks.
    pub fn validate(&self) -> AppResult<()> {
        require(&self.name, "name")?;
        require(&self.position, "position")?;
        if !self.hourly_rate.is_finite() || self.hourly_rate < 0.0 {
            return Err(AppError::validation("hourly_rate must be a non-negative number"));
        }
        if !self.birth_date.is_empty() {
            parse_date(&self.birth_date, "birth_date")?;
        }
        Ok(())
    }

    /// Copy the fields a client may not change from the stored version.
    /// The user link only moves through link and unlink operations.
    pub fn keep_server_fields(&mut self, stored: &Worker) {
        self.user_id = stored.user_id.clone();
        self.is_fired = stored.is_fired;
        self.fired_at = stored.fired_at;
        self.created_by = stored.created_by.clone();
        self.created_by_name = stored.created_by_name.clone();
        self.created_at = stored.created_at;
    }
}

impl Record for Worker {
    type Id = WorkerId;

    const KIND: &'static str = "worker";
    const DELETION: DeletionPolicy = DeletionPolicy::SoftRetire;

    fn id(&self) -> &WorkerId {
        &self.id
    }

    fn set_id(&mut self, id: WorkerId) {
        self.id = id;
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.position);
        trim_in_place(&mut self.phone);
        trim_in_place(&mut self.birth_date);
        trim_in_place(&mut self.created_by_name);
        if self.user_id.as_ref().is_some_and(UserId::is_empty) {
            self.user_id = None;
        }
        if self.is_fired {
            self.user_id = None;
        }
    }

    fn ordering(a: &Self, b: &Self) -> Ordering {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    }

    fn retire(&mut self, at: DateTime<Utc>) {
        if !self.is_fired {
            self.is_fired = true;
            self.fired_at = Some(at);
        }
        self.user_id = None;
        self.updated_at = Some(at);
    }

    fn is_retired(&self) -> bool {
        self.is_fired
    }
}
