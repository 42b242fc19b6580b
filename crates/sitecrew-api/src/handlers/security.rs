//! Security observability handlers (admin only).

use axum::Json;
use axum::extract::{Query, State};

use sitecrew_auth::SecurityStats;
use sitecrew_store::SecurityLogEntry;

use crate::dto::request::EventsQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

const DEFAULT_EVENT_LIMIT: usize = 100;
const MAX_EVENT_LIMIT: usize = 1000;

/// GET /api/security/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<SecurityStats>>> {
    require_admin(&auth)?;
    Ok(Json(ApiResponse::ok(state.login_service.stats().await)))
}

/// GET /api/security/events?limit=
pub async fn events(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<EventsQuery>,
) -> ApiResult<Json<ApiResponse<Vec<SecurityLogEntry>>>> {
    require_admin(&auth)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .clamp(1, MAX_EVENT_LIMIT);
    let events = state.stores.security_log.read_recent(limit).await?;
    Ok(Json(ApiResponse::ok(events)))
}
