//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitecrew_core::types::id::{ObjectId, ScheduleEntryId, UserId, WorkerId};
use sitecrew_entity::{ScheduleEntry, User, UserRole};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// User summary for responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub phone: String,
    pub role: UserRole,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            phone: user.phone,
            role: user.role,
            last_login_at: user.last_login_at,
        }
    }
}

/// Login and `me` response: who is signed in and the anti-forgery token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    pub expires_at: DateTime<Utc>,
    pub csrf_token: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reference to another record with its display name. `name` is `None`
/// when the record no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef<Id> {
    pub id: Id,
    pub name: Option<String>,
}

/// Schedule entry with worker and object names resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntryView {
    pub id: ScheduleEntryId,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub lunch_break_minutes: i32,
    /// Working time net of lunch.
    pub worked_minutes: i64,
    pub workers: Vec<NamedRef<WorkerId>>,
    pub objects: Vec<NamedRef<ObjectId>>,
    pub notes: String,
    pub created_by_id: Option<UserId>,
    pub created_by_name: String,
}

impl ScheduleEntryView {
    /// Build the view, looking names up with the given resolvers.
    pub fn new(
        entry: ScheduleEntry,
        worker_name: impl Fn(&WorkerId) -> Option<String>,
        object_name: impl Fn(&ObjectId) -> Option<String>,
    ) -> Self {
        let worked_minutes = entry
            .validate()
            .map(|w| w.duration_minutes() - i64::from(entry.lunch_break_minutes))
            .unwrap_or(0);
        Self {
            workers: entry
                .worker_ids
                .iter()
                .map(|id| NamedRef {
                    id: id.clone(),
                    name: worker_name(id),
                })
                .collect(),
            objects: entry
                .object_ids
                .iter()
                .map(|id| NamedRef {
                    id: id.clone(),
                    name: object_name(id),
                })
                .collect(),
            id: entry.id,
            date: entry.date,
            start_time: entry.start_time,
            end_time: entry.end_time,
            lunch_break_minutes: entry.lunch_break_minutes,
            worked_minutes,
            notes: entry.notes,
            created_by_id: entry.created_by_id,
            created_by_name: entry.created_by_name,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
