//! Schedule entry handlers.
//!
//! Entries are returned with worker and object names resolved. A reference
//! to a record that no longer exists comes back with no name.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use sitecrew_core::traits::Repository;
use sitecrew_core::types::id::{ObjectId, ScheduleEntryId, WorkerId};
use sitecrew_entity::ScheduleEntry;

use crate::dto::request::{ScheduleQuery, ScheduleRequest};
use crate::dto::response::{ApiResponse, MessageResponse, ScheduleEntryView};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

struct NameIndex {
    workers: HashMap<WorkerId, String>,
    objects: HashMap<ObjectId, String>,
}

impl NameIndex {
    async fn load(state: &AppState) -> Self {
        Self {
            workers: state
                .stores
                .workers
                .find_all()
                .await
                .into_iter()
                .map(|w| (w.id, w.name))
                .collect(),
            objects: state
                .stores
                .objects
                .find_all()
                .await
                .into_iter()
                .map(|o| (o.id, o.name))
                .collect(),
        }
    }

    fn view(&self, entry: ScheduleEntry) -> ScheduleEntryView {
        ScheduleEntryView::new(
            entry,
            |id| self.workers.get(id).cloned(),
            |id| self.objects.get(id).cloned(),
        )
    }
}

/// GET /api/schedule?worker_id=&date=
pub async fn list_entries(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ScheduleEntryView>>>> {
    let mut entries = match (&query.worker_id, &query.date) {
        (Some(worker_id), _) => state.stores.schedule.find_for_worker(worker_id).await,
        (None, Some(date)) => state.stores.schedule.find_by_date(date).await,
        (None, None) => state.stores.schedule.find_all().await,
    };
    if let (Some(_), Some(date)) = (&query.worker_id, &query.date) {
        let date = date.trim();
        entries.retain(|e| e.date == date);
    }

    let names = NameIndex::load(&state).await;
    Ok(Json(ApiResponse::ok(
        entries.into_iter().map(|e| names.view(e)).collect(),
    )))
}

/// POST /api/schedule
pub async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ScheduleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ScheduleEntryView>>)> {
    let mut entry = ScheduleEntry::new(String::new(), String::new(), String::new());
    req.apply_to(&mut entry);
    entry.created_by_id = Some(auth.user_id.clone());
    entry.created_by_name = auth.name.clone();

    let entry = state.stores.schedule.create(entry).await?;
    tracing::info!(entry_id = %entry.id, user_id = %auth.user_id, date = %entry.date, "Schedule entry created");

    let names = NameIndex::load(&state).await;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(names.view(entry)))))
}

/// GET /api/schedule/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<ScheduleEntryId>,
) -> ApiResult<Json<ApiResponse<ScheduleEntryView>>> {
    let entry = state.stores.schedule.find_by_id(&id).await?;
    let names = NameIndex::load(&state).await;
    Ok(Json(ApiResponse::ok(names.view(entry))))
}

/// PUT /api/schedule/{id}
pub async fn update_entry(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<ScheduleEntryId>,
    Json(req): Json<ScheduleRequest>,
) -> ApiResult<Json<ApiResponse<ScheduleEntryView>>> {
    let mut entry = state.stores.schedule.find_by_id(&id).await?;
    req.apply_to(&mut entry);
    let entry = state.stores.schedule.update(entry).await?;
    let names = NameIndex::load(&state).await;
    Ok(Json(ApiResponse::ok(names.view(entry))))
}

/// DELETE /api/schedule/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ScheduleEntryId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.stores.schedule.delete(&id).await?;
    tracing::info!(entry_id = %id, user_id = %auth.user_id, "Schedule entry deleted");
    Ok(Json(ApiResponse::ok(MessageResponse::new("Schedule entry deleted"))))
}
