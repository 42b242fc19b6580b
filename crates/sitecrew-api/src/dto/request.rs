//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use sitecrew_core::error::AppError;
use sitecrew_core::types::id::{ObjectId, UserId, WorkerId};
use sitecrew_entity::{JobObject, ObjectStatus, ScheduleEntry, UserRole, Worker};
use sitecrew_store::repositories::{WorkerFilter, WorkerScope};

/// Run the derive-generated checks, turning failures into a validation error.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let fields: Vec<String> = errors.field_errors().keys().map(|f| f.to_string()).collect();
    AppError::validation(format!("Invalid request: {}", fields.join(", ")))
        .with_details(serde_json::json!({ "fields": fields }))
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create user request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, alias = "status")]
    pub role: UserRole,
    /// Existing worker profile to link instead of creating one.
    #[serde(default)]
    pub worker_id: Option<WorkerId>,
}

/// Update user request (admin). An absent or blank password keeps the old one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, alias = "status")]
    pub role: UserRole,
}

/// Self-service profile update. An absent or blank password keeps the old one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: String,
}

/// Worker create/update body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRequest {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub birth_date: String,
    /// Only honored on create and only for admins.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl WorkerRequest {
    /// Copy the client-editable fields onto a worker.
    pub fn apply_to(self, worker: &mut Worker) {
        worker.name = self.name;
        worker.position = self.position;
        worker.phone = self.phone;
        worker.hourly_rate = self.hourly_rate;
        worker.birth_date = self.birth_date;
    }
}

/// Link a worker to a login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkWorkerRequest {
    pub user_id: UserId,
}

/// Job object create/update body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRequest {
    pub name: String,
    /// Absent keeps the current status; new objects start `in_progress`.
    #[serde(default)]
    pub status: Option<ObjectStatus>,
    pub address: String,
    /// Absent keeps the current one; new objects default to the creator.
    #[serde(default)]
    pub responsible_user_id: Option<UserId>,
}

impl ObjectRequest {
    pub fn apply_to(self, object: &mut JobObject) {
        object.name = self.name;
        if let Some(status) = self.status {
            object.status = status;
        }
        object.address = self.address;
        if let Some(user_id) = self.responsible_user_id.filter(|id| !id.is_empty()) {
            object.responsible_user_id = Some(user_id);
        }
    }
}

/// Schedule entry create/update body. The creator comes from the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_lunch")]
    pub lunch_break_minutes: i32,
    #[serde(default)]
    pub worker_ids: Vec<WorkerId>,
    #[serde(default)]
    pub object_ids: Vec<ObjectId>,
    #[serde(default)]
    pub notes: String,
}

fn default_lunch() -> i32 {
    sitecrew_entity::schedule::lunch::DEFAULT_LUNCH_MINUTES
}

impl ScheduleRequest {
    pub fn apply_to(self, entry: &mut ScheduleEntry) {
        entry.date = self.date;
        entry.start_time = self.start_time;
        entry.end_time = self.end_time;
        entry.lunch_break_minutes = self.lunch_break_minutes;
        entry.worker_ids = self.worker_ids;
        entry.object_ids = self.object_ids;
        entry.notes = self.notes;
    }
}

/// Worker listing filters: `?search=&position=&status=active|fired|all`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkersQuery {
    pub search: Option<String>,
    pub position: Option<String>,
    #[serde(default)]
    pub status: WorkerScope,
}

impl WorkersQuery {
    pub fn into_filter(self) -> WorkerFilter {
        WorkerFilter {
            scope: self.status,
            search: self.search,
            position: self.position,
        }
    }
}

/// Optional filters on the schedule listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleQuery {
    pub worker_id: Option<WorkerId>,
    pub date: Option<String>,
}

/// Limit on the security event listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
}
