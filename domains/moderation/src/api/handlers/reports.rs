//! Report filing and review API handlers

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
use crate::domain::entities::{AdminAction, Report};
use crate::domain::permissions::Requester;
use crate::domain::state::ReportStatus;
use parlor_common::{Error, Result};

/// Request for filing a report
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(length(min = 1, max = 128))]
    pub post_id: String,

    /// Claimed reporter identity; must match the authenticated identity
    #[validate(length(min = 1, max = 128))]
    pub reported_by: String,

    #[validate(length(min = 1, max = 200))]
    pub reason: String,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

/// Request for reviewing a report
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewReportRequest {
    pub action: AdminAction,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Response for report operations
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub post_id: String,
    pub reported_by: String,
    pub reason: String,
    pub description: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub admin_action: AdminAction,
    pub admin_notes: Option<String>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            post_id: report.post_id,
            reported_by: report.reported_by,
            reason: report.reason,
            description: report.description,
            status: report.status,
            created_at: report.created_at,
            reviewed_by: report.reviewed_by,
            reviewed_at: report.reviewed_at,
            admin_action: report.admin_action,
            admin_notes: report.admin_notes,
        }
    }
}

/// File a report against a post
///
/// **POST /v1/reports**
///
/// Any authenticated identity may file a report, but only as itself: a
/// claimed reporter differing from the authenticated identity is rejected.
pub async fn create_report(
    user: CurrentUser,
    State(state): State<ModerationState>,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>)> {
    body.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let requester = Requester::from(&user);
    if !state
        .evaluator
        .can_create_report(Some(&requester), &body.reported_by)
    {
        return Err(Error::Authorization(
            "Reports can only be filed under your own identity".to_string(),
        ));
    }

    let report = state
        .repos
        .reports
        .create_report(&body.post_id, &body.reported_by, body.reason, body.description)
        .await?;

    Ok((StatusCode::CREATED, Json(ReportResponse::from(report))))
}

/// Review a report with an action
///
/// **POST /v1/moderation/reports/{report_id}/review**
pub async fn review_report(
    user: CurrentUser,
    State(state): State<ModerationState>,
    Path(report_id): Path<String>,
    Json(body): Json<ReviewReportRequest>,
) -> Result<StatusCode> {
    body.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let requester = Requester::from(&user);
    if !state.evaluator.is_any_admin(Some(&requester)).await {
        return Err(Error::Authorization(
            "Admin role required to review reports".to_string(),
        ));
    }

    state
        .dashboard
        .review_report(&report_id, &requester.id, body.action, body.notes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List pending reports
///
/// **GET /v1/moderation/reports**
pub async fn list_pending(
    user: CurrentUser,
    State(state): State<ModerationState>,
) -> Result<Json<Vec<ReportResponse>>> {
    let requester = Requester::from(&user);
    if !state.evaluator.is_any_admin(Some(&requester)).await {
        return Err(Error::Authorization("Admin role required".to_string()));
    }

    let pending = state.repos.reports.list_pending().await?;
    Ok(Json(
        pending.into_iter().map(ReportResponse::from).collect(),
    ))
}
