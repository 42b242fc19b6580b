//! Job object entity model.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{DeletionPolicy, Record};
use sitecrew_core::types::id::{ObjectId, UserId};

use super::status::ObjectStatus;
use crate::validate::{require, trim_in_place};

/// A work site that schedule entries point at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobObject {
    #[serde(default)]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub status: ObjectStatus,
    #[serde(default)]
    pub address: String,
    /// User accountable for the site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_user_id: Option<UserId>,
}

impl JobObject {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        responsible_user_id: UserId,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            status: ObjectStatus::InProgress,
            address: address.into(),
            responsible_user_id: Some(responsible_user_id),
        }
    }

    /// Required-field checks. The responsible user is resolved by the store.
    pub fn validate(&self) -> AppResult<()> {
        require(&self.name, "name")?;
        require(&self.address, "address")?;
        if self.responsible_user_id.is_none() {
            return Err(AppError::validation("responsible_user_id is required")
                .with_details(serde_json::json!({ "field": "responsible_user_id" })));
        }
        Ok(())
    }
}

impl Record for JobObject {
    type Id = ObjectId;

    const KIND: &'static str = "object";
    const DELETION: DeletionPolicy = DeletionPolicy::Physical;

    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = id;
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.address);
        if self.responsible_user_id.as_ref().is_some_and(UserId::is_empty) {
            self.responsible_user_id = None;
        }
    }

    fn ordering(a: &Self, b: &Self) -> Ordering {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    }
}
