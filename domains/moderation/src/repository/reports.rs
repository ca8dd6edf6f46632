//! Report repository: creation and the review saga

use std::sync::Arc;

use crate::domain::entities::{AdminAction, Report};
use crate::domain::state::{ReportEvent, ReportStateMachine, StateError};
use crate::repository::users::UserRepository;
use crate::store::{ModerationStore, ReportReview};
use parlor_common::{Clock, Error, Result};

#[derive(Clone)]
pub struct ReportRepository {
    store: Arc<dyn ModerationStore>,
    clock: Arc<dyn Clock>,
    users: UserRepository,
}

impl ReportRepository {
    pub fn new(
        store: Arc<dyn ModerationStore>,
        clock: Arc<dyn Clock>,
        users: UserRepository,
    ) -> Self {
        Self {
            store,
            clock,
            users,
        }
    }

    /// File a report against a post. The caller is responsible for having
    /// verified the reporter claim with the permission evaluator.
    pub async fn create_report(
        &self,
        post_id: &str,
        reported_by: &str,
        reason: String,
        description: String,
    ) -> Result<Report> {
        let report = Report::new(post_id, reported_by, reason, description, self.clock.now())?;
        self.store.insert_report(&report).await?;
        tracing::info!(report_id = %report.id, post_id = %post_id, "Report created");
        Ok(report)
    }

    pub async fn get_report(&self, report_id: &str) -> Result<Option<Report>> {
        self.store.get_report(report_id).await
    }

    /// Pending reports, newest first
    pub async fn list_pending(&self) -> Result<Vec<Report>> {
        self.store.list_pending_reports().await
    }

    /// Review a report with an action.
    ///
    /// Runs as an explicit two-step saga: step 1 writes every review field
    /// onto the report in one update; step 2 performs the action's side
    /// effect (delete the post, or ban its owner). The store offers no
    /// multi-document transaction, so a step-2 failure after step 1 leaves
    /// the report reviewed while the side effect is missing — surfaced as
    /// [`Error::PartialFailure`], never swallowed. No compensating write
    /// exists.
    pub async fn review_report(
        &self,
        report_id: &str,
        admin: &str,
        action: AdminAction,
        notes: Option<String>,
    ) -> Result<()> {
        if action == AdminAction::None {
            return Err(Error::Validation(
                "Reviewing a report requires an action".to_string(),
            ));
        }

        let report = self
            .store
            .get_report(report_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Report {} not found", report_id)))?;

        let event = match action {
            AdminAction::Dismiss => ReportEvent::Dismiss,
            _ => ReportEvent::Review,
        };
        let next = ReportStateMachine::transition(report.status, event).map_err(|e| match e {
            StateError::TerminalState(state) => Error::Conflict(format!(
                "Report {} is already {} and cannot be re-reviewed",
                report_id, state
            )),
            other => Error::Conflict(other.to_string()),
        })?;

        // BanUser needs the post's owner; resolve it before any write so a
        // missing post fails the whole review instead of half of it.
        let ban_target = if action == AdminAction::BanUser {
            let post = self
                .store
                .get_post(&report.post_id)
                .await?
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "Post {} referenced by report {} not found",
                        report.post_id, report_id
                    ))
                })?;
            Some(post.author_id)
        } else {
            None
        };

        // Step 1: the report update
        let review = ReportReview {
            status: next,
            reviewed_by: admin.to_string(),
            reviewed_at: self.clock.now(),
            admin_action: action,
            admin_notes: notes,
        };
        self.store.apply_report_review(report_id, &review).await?;

        // Step 2: the action's side effect
        match action {
            AdminAction::DeletePost => {
                if let Err(e) = self.store.delete_post(&report.post_id).await {
                    tracing::error!(report_id = %report_id, post_id = %report.post_id, error = %e,
                        "Report marked reviewed but post delete failed");
                    return Err(Error::PartialFailure {
                        completed: format!("report {} marked reviewed", report_id),
                        failed: format!("delete of post {}: {}", report.post_id, e),
                    });
                }
            }
            AdminAction::BanUser => {
                let target = ban_target.unwrap_or_default();
                let reason = format!("Post reported: {}", report.reason);
                if let Err(e) = self.users.ban_user(&target, admin, &reason).await {
                    tracing::error!(report_id = %report_id, target = %target, error = %e,
                        "Report marked reviewed but ban failed");
                    return Err(Error::PartialFailure {
                        completed: format!("report {} marked reviewed", report_id),
                        failed: format!("ban of user {}: {}", target, e),
                    });
                }
            }
            AdminAction::Dismiss | AdminAction::None => {}
        }

        tracing::info!(report_id = %report_id, admin = %admin, action = %action, status = %next,
            "Report reviewed");
        Ok(())
    }
}
