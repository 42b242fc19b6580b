//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use sitecrew_core::types::id::UserId;
use sitecrew_service::users::{CreateUserInput, UpdateUserInput};

use crate::dto::request::{CreateUserRequest, UpdateUserRequest, validate_request};
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Payload};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    require_admin(&auth)?;
    let users = state.user_admin.list_users(&auth).await?;
    Ok(Json(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Payload(req): Payload<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    require_admin(&auth)?;
    validate_request(&req)?;
    let user = state
        .user_admin
        .create_user(
            &auth,
            CreateUserInput {
                username: req.username,
                password: req.password,
                name: req.name,
                phone: req.phone,
                role: req.role,
                worker_id: req.worker_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    require_admin(&auth)?;
    let user = state.user_admin.get_user(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    Payload(req): Payload<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    require_admin(&auth)?;
    validate_request(&req)?;
    let user = state
        .user_admin
        .update_user(
            &auth,
            &id,
            UpdateUserInput {
                username: req.username,
                password: req.password,
                name: req.name,
                phone: req.phone,
                role: req.role,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    require_admin(&auth)?;
    state.user_admin.delete_user(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}
