//! Job object handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use sitecrew_core::traits::Repository;
use sitecrew_core::types::id::ObjectId;
use sitecrew_entity::JobObject;

use crate::dto::request::ObjectRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Payload};
use crate::state::AppState;

/// GET /api/objects
pub async fn list_objects(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<JobObject>>>> {
    Ok(Json(ApiResponse::ok(state.stores.objects.find_all().await)))
}

/// POST /api/objects
pub async fn create_object(
    State(state): State<AppState>,
    auth: AuthUser,
    Payload(req): Payload<ObjectRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<JobObject>>)> {
    let mut object = JobObject::new(String::new(), String::new(), auth.user_id.clone());
    req.apply_to(&mut object);
    let object = state.stores.objects.create(object).await?;
    tracing::info!(object_id = %object.id, user_id = %auth.user_id, "Object created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(object))))
}

/// GET /api/objects/{id}
pub async fn get_object(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<ObjectId>,
) -> ApiResult<Json<ApiResponse<JobObject>>> {
    Ok(Json(ApiResponse::ok(state.stores.objects.find_by_id(&id).await?)))
}

/// PUT /api/objects/{id}
pub async fn update_object(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<ObjectId>,
    Payload(req): Payload<ObjectRequest>,
) -> ApiResult<Json<ApiResponse<JobObject>>> {
    let mut object = state.stores.objects.find_by_id(&id).await?;
    req.apply_to(&mut object);
    Ok(Json(ApiResponse::ok(state.stores.objects.update(object).await?)))
}

/// DELETE /api/objects/{id}
pub async fn delete_object(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ObjectId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.stores.objects.delete(&id).await?;
    tracing::info!(object_id = %id, user_id = %auth.user_id, "Object deleted");
    Ok(Json(ApiResponse::ok(MessageResponse::new("Object deleted"))))
}
