//! User ban management API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use parlor_auth::CurrentUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ModerationState;
use crate::domain::entities::UserRecord;
use crate::domain::permissions::Requester;
use parlor_common::{Error, Result};

/// Request for banning a user
#[derive(Debug, Deserialize, Validate)]
pub struct BanUserRequest {
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
}

/// Response for banned user listings
#[derive(Debug, Serialize)]
pub struct BannedUserResponse {
    pub user_id: String,
    pub display_name: Option<String>,
    pub banned_at: Option<DateTime<Utc>>,
    pub banned_by: Option<String>,
    pub ban_reason: Option<String>,
    pub violation_count: i32,
    pub warning_count: i32,
}

impl From<UserRecord> for BannedUserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            user_id: user.id,
            display_name: user.display_name,
            banned_at: user.banned_at,
            banned_by: user.banned_by,
            ban_reason: user.ban_reason,
            violation_count: user.violation_count,
            warning_count: user.warning_count,
        }
    }
}

/// Ban a user
///
/// **POST /v1/moderation/users/{user_id}/ban**
pub async fn ban_user(
    user: CurrentUser,
    State(state): State<ModerationState>,
    Path(user_id): Path<String>,
    Json(body): Json<BanUserRequest>,
) -> Result<StatusCode> {
    body.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let requester = Requester::from(&user);
    if !state.evaluator.is_any_admin(Some(&requester)).await {
        return Err(Error::Authorization(
            "Admin role required to ban users".to_string(),
        ));
    }

    state
        .dashboard
        .ban_user(&user_id, &requester.id, &body.reason)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lift a ban
///
/// **DELETE /v1/moderation/users/{user_id}/ban**
pub async fn unban_user(
    user: CurrentUser,
    State(state): State<ModerationState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode> {
    let requester = Requester::from(&user);
    if !state.evaluator.is_any_admin(Some(&requester)).await {
        return Err(Error::Authorization(
            "Admin role required to unban users".to_string(),
        ));
    }

    state.dashboard.unban_user(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List banned users
///
/// **GET /v1/moderation/users/banned**
pub async fn list_banned(
    user: CurrentUser,
    State(state): State<ModerationState>,
) -> Result<Json<Vec<BannedUserResponse>>> {
    let requester = Requester::from(&user);
    if !state.evaluator.is_any_admin(Some(&requester)).await {
        return Err(Error::Authorization("Admin role required".to_string()));
    }

    let banned = state.repos.users.list_banned().await?;
    Ok(Json(
        banned.into_iter().map(BannedUserResponse::from).collect(),
    ))
}
