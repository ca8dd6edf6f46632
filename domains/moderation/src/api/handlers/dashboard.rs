//! Dashboard snapshot API handlers

use axum::{extract::State, Json};
use parlor_auth::CurrentUser;

use crate::api::middleware::ModerationState;
use crate::dashboard::DashboardState;
use crate::domain::permissions::Requester;
use parlor_common::{Error, Result};

/// Current aggregate dashboard snapshot
///
/// **GET /v1/moderation/dashboard**
///
/// The snapshot is best-effort: each slice reflects whatever its own
/// state machine last settled to.
pub async fn get_dashboard(
    user: CurrentUser,
    State(state): State<ModerationState>,
) -> Result<Json<DashboardState>> {
    let requester = Requester::from(&user);
    if !state.evaluator.is_any_admin(Some(&requester)).await {
        return Err(Error::Authorization("Admin role required".to_string()));
    }

    Ok(Json(state.dashboard.snapshot()))
}

/// Trigger a full dashboard load
///
/// **POST /v1/moderation/dashboard/load**
///
/// Resolves once all four slices have settled; the returned snapshot is
/// the state at that point.
pub async fn load_dashboard(
    user: CurrentUser,
    State(state): State<ModerationState>,
) -> Result<Json<DashboardState>> {
    let requester = Requester::from(&user);
    if !state.evaluator.is_any_admin(Some(&requester)).await {
        return Err(Error::Authorization("Admin role required".to_string()));
    }

    state.dashboard.load_data().await;
    Ok(Json(state.dashboard.snapshot()))
}
