//! Dashboard counters.

use axum::Json;
use axum::extract::State;

use sitecrew_service::DashboardStats;

use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<DashboardStats>>> {
    Ok(Json(ApiResponse::ok(state.dashboard.stats().await)))
}
