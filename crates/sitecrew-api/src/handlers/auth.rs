//! Auth handlers: login, logout, me.

use axum::extract::{Extension, State};
use axum::http::header::{InvalidHeaderValue, SET_COOKIE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use sitecrew_core::error::AppError;
use sitecrew_service::context::RequestContext;
use sitecrew_service::profile::ProfileUpdate;

use crate::cookies::{expired_session_cookie, session_cookie};
use crate::dto::request::{LoginRequest, UpdateProfileRequest, validate_request};
use crate::dto::response::{ApiResponse, MessageResponse, SessionResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ClientOrigin, Payload};
use crate::state::AppState;

fn cookie_error(e: InvalidHeaderValue) -> AppError {
    AppError::with_source(
        sitecrew_core::error::ErrorKind::Internal,
        "Failed to build session cookie",
        e,
    )
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    origin: ClientOrigin,
    Payload(req): Payload<LoginRequest>,
) -> ApiResult<Response> {
    validate_request(&req)?;

    let result = state
        .login_service
        .login(&req.username, &req.password, origin.as_str())
        .await?;

    let cookie = session_cookie(&state.config.auth, &result.session, Utc::now()).map_err(cookie_error)?;
    let body = ApiResponse::ok(SessionResponse {
        expires_at: result.session.expires_at,
        csrf_token: result.session.csrf_token,
        user: UserResponse::from(result.user),
    });

    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

/// POST /api/auth/logout
///
/// Always clears the cookie, even when the session was already gone.
pub async fn logout(
    State(state): State<AppState>,
    ctx: Option<Extension<RequestContext>>,
) -> ApiResult<Response> {
    if let Some(Extension(ctx)) = ctx {
        state.login_service.logout(&ctx.session_token).await;
    }

    let cookie = expired_session_cookie(&state.config.auth).map_err(cookie_error)?;
    Ok((
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::ok(MessageResponse::new("Logged out successfully"))),
    )
        .into_response())
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    let user = state.profiles.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(SessionResponse {
        user: UserResponse::from(user),
        expires_at: auth.session_expires_at,
        csrf_token: auth.csrf_token.clone(),
    })))
}

/// PUT /api/auth/me
///
/// Name, login, phone and password of the signed-in user. The role stays.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Payload(req): Payload<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    validate_request(&req)?;
    let user = state
        .profiles
        .update_profile(
            &auth,
            ProfileUpdate {
                username: req.username,
                name: req.name,
                password: req.password,
                phone: req.phone,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}
