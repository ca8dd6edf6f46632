//! Admin role management API handlers
//!
//! Granting and revoking roles is restricted to super-admins. The checks
//! here are advisory; the store enforces the authoritative rules.

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
use crate::domain::entities::{AdminRole, RoleGrant};
use crate::domain::permissions::Requester;
use parlor_common::{Error, Result};

/// Request for granting an admin role
#[derive(Debug, Deserialize, Validate)]
pub struct GrantAdminRequest {
    /// Identity to grant the role to
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,

    /// Role to grant
    pub role: AdminRole,

    /// Permission strings attached to the grant
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Response for grant operations
#[derive(Debug, Serialize)]
pub struct GrantAdminResponse {
    pub user_id: String,
    pub role: AdminRole,
    pub revision: u32,
}

/// Response for listing admins
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub user_id: String,
    pub role: AdminRole,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
    pub permissions: Vec<String>,
}

impl From<RoleGrant> for AdminResponse {
    fn from(grant: RoleGrant) -> Self {
        Self {
            user_id: grant.user_id,
            role: grant.role,
            granted_by: grant.granted_by,
            granted_at: grant.granted_at,
            permissions: grant.permissions,
        }
    }
}

/// Grant an admin role
///
/// **POST /v1/moderation/admins**
pub async fn grant_admin(
    user: CurrentUser,
    State(state): State<ModerationState>,
    Json(body): Json<GrantAdminRequest>,
) -> Result<(StatusCode, Json<GrantAdminResponse>)> {
    body.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let requester = Requester::from(&user);
    if !state.evaluator.is_super_admin(Some(&requester)).await {
        return Err(Error::Authorization(
            "Super-admin role required to grant admin roles".to_string(),
        ));
    }

    let revision = state
        .dashboard
        .grant_admin(&body.user_id, body.role, &requester.id, body.permissions)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GrantAdminResponse {
            user_id: body.user_id,
            role: body.role,
            revision,
        }),
    ))
}

/// Revoke an admin role
///
/// **DELETE /v1/moderation/admins/{user_id}**
///
/// Succeeds even when no grant exists for the target.
pub async fn revoke_admin(
    user: CurrentUser,
    State(state): State<ModerationState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode> {
    let requester = Requester::from(&user);
    if !state.evaluator.is_super_admin(Some(&requester)).await {
        return Err(Error::Authorization(
            "Super-admin role required to revoke admin roles".to_string(),
        ));
    }

    state.dashboard.revoke_admin(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List current admins
///
/// **GET /v1/moderation/admins**
pub async fn list_admins(
    user: CurrentUser,
    State(state): State<ModerationState>,
) -> Result<Json<Vec<AdminResponse>>> {
    let requester = Requester::from(&user);
    if !state.evaluator.is_any_admin(Some(&requester)).await {
        return Err(Error::Authorization("Admin role required".to_string()));
    }

    let admins = state.repos.admins.list_admins().await?;
    Ok(Json(admins.into_iter().map(AdminResponse::from).collect()))
}
