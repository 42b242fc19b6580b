//! Worker handlers. Deleting a worker fires it; the record stays.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use sitecrew_core::error::AppError;
use sitecrew_core::traits::Repository;
use sitecrew_core::types::id::WorkerId;
use sitecrew_entity::Worker;

use crate::dto::request::{LinkWorkerRequest, WorkerRequest, WorkersQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Payload};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/workers?search=&position=&status=
pub async fn list_workers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<WorkersQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Worker>>>> {
    let workers = state.stores.workers.search(&query.into_filter()).await;
    Ok(Json(ApiResponse::ok(workers)))
}

/// GET /api/workers/positions?status=
pub async fn list_positions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<WorkersQuery>,
) -> ApiResult<Json<ApiResponse<Vec<String>>>> {
    Ok(Json(ApiResponse::ok(
        state.stores.workers.positions(query.status).await,
    )))
}

/// POST /api/workers
pub async fn create_worker(
    State(state): State<AppState>,
    auth: AuthUser,
    Payload(req): Payload<WorkerRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Worker>>)> {
    let user_id = req.user_id.clone().filter(|id| !id.is_empty());
    if user_id.is_some() && !auth.is_admin() {
        return Err(AppError::forbidden("Only administrators can link workers to users").into());
    }

    let mut worker = Worker::new(String::new(), String::new());
    req.apply_to(&mut worker);
    worker.user_id = user_id;
    worker.created_by = Some(auth.user_id.clone());
    worker.created_by_name = auth.name.clone();

    let worker = state.stores.workers.create(worker).await?;
    tracing::info!(worker_id = %worker.id, user_id = %auth.user_id, "Worker created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(worker))))
}

/// GET /api/workers/{id}
pub async fn get_worker(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<WorkerId>,
) -> ApiResult<Json<ApiResponse<Worker>>> {
    Ok(Json(ApiResponse::ok(state.stores.workers.find_by_id(&id).await?)))
}

/// PUT /api/workers/{id}
///
/// The user link is changed only through the link endpoint.
pub async fn update_worker(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<WorkerId>,
    Payload(req): Payload<WorkerRequest>,
) -> ApiResult<Json<ApiResponse<Worker>>> {
    let mut worker = state.stores.workers.find_by_id(&id).await?;
    req.apply_to(&mut worker);
    let worker = state.stores.workers.update(worker).await?;
    Ok(Json(ApiResponse::ok(worker)))
}

/// DELETE /api/workers/{id}
pub async fn delete_worker(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<WorkerId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.stores.workers.delete(&id).await?;
    tracing::info!(worker_id = %id, user_id = %auth.user_id, "Worker fired");
    Ok(Json(ApiResponse::ok(MessageResponse::new("Worker fired"))))
}

/// PUT /api/workers/{id}/user
pub async fn link_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<WorkerId>,
    Payload(req): Payload<LinkWorkerRequest>,
) -> ApiResult<Json<ApiResponse<Worker>>> {
    require_admin(&auth)?;
    let worker = state.stores.workers.link_user(&id, &req.user_id).await?;
    Ok(Json(ApiResponse::ok(worker)))
}
