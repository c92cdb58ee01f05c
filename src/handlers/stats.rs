use axum::{Json, extract::State};

use crate::{AppState, auth::AuthUser, error::ApiError, models::DashboardStats};

/// get_admin_stats
///
/// [Admin Route] Content and inbox counters for the dashboard.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses((status = 200, description = "Stats", body = DashboardStats))
)]
pub async fn get_admin_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    auth.require_admin()?;
    Ok(Json(state.repo.get_stats().await?))
}
