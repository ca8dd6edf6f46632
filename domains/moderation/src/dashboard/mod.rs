//! Admin dashboard read-model
//!
//! Aggregates four independently loading collections (pending reports,
//! banned users, admins, categories) into one state published through a
//! `watch` channel. The four sub-machines are independent: each slice moves
//! `Idle → Loading → (Loaded | Errored)` on its own schedule, and the
//! aggregate is only ever a best-effort snapshot, never a consistent join.
//!
//! Mutation outcomes are delivered as a queue of discrete [`Notice`] events
//! over an `mpsc` channel, consumed exactly once — a state replay cannot
//! re-show a toast.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::domain::cache::StatusCache;
use crate::domain::entities::{AdminAction, AdminRole, Category, Report, RoleGrant, UserRecord};
use crate::repository::ModerationRepositories;
use parlor_common::{Error, Result};

/// Loading state of one dashboard collection
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum Slice<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Errored(String),
}

impl<T> Slice<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Slice::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Slice::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Pointwise combination of the four collection states
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DashboardState {
    pub reports: Slice<Vec<Report>>,
    pub banned_users: Slice<Vec<UserRecord>>,
    pub admins: Slice<Vec<RoleGrant>>,
    pub categories: Slice<Vec<Category>>,
}

/// One-shot mutation outcome, consumed exactly once
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Dashboard state machine.
///
/// Wraps the repositories with state upkeep: every mutation reloads only
/// the slice it affected and emits a notice; a failed mutation leaves prior
/// data in place (no optimistic update, so no rollback). No mutation is
/// retried automatically.
pub struct Dashboard {
    repos: ModerationRepositories,
    cache: Arc<StatusCache>,
    state_tx: watch::Sender<DashboardState>,
    notice_tx: mpsc::UnboundedSender<Notice>,
}

impl Dashboard {
    pub fn new(
        repos: ModerationRepositories,
        cache: Arc<StatusCache>,
    ) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (state_tx, _) = watch::channel(DashboardState::default());
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        (
            Self {
                repos,
                cache,
                state_tx,
                notice_tx,
            },
            notice_rx,
        )
    }

    /// Watch the aggregate state
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_tx.subscribe()
    }

    /// Current aggregate snapshot
    pub fn snapshot(&self) -> DashboardState {
        self.state_tx.borrow().clone()
    }

    /// Load all four collections concurrently.
    ///
    /// Each slice settles independently and is visible to watchers as soon
    /// as it resolves; this future completes only once all four have
    /// settled.
    pub async fn load_data(&self) {
        tokio::join!(
            self.refresh_reports(),
            self.refresh_banned_users(),
            self.refresh_admins(),
            self.refresh_categories(),
        );
    }

    // --- slice refreshes ---

    pub async fn refresh_reports(&self) {
        self.state_tx
            .send_modify(|s| s.reports = Slice::Loading);
        let slice = match self.repos.reports.list_pending().await {
            Ok(reports) => Slice::Loaded(reports),
            Err(e) => Slice::Errored(e.to_string()),
        };
        tracing::debug!(loaded = slice.is_loaded(), "Reports slice settled");
        self.state_tx.send_modify(|s| s.reports = slice);
    }

    pub async fn refresh_banned_users(&self) {
        self.state_tx
            .send_modify(|s| s.banned_users = Slice::Loading);
        let slice = match self.repos.users.list_banned().await {
            Ok(users) => Slice::Loaded(users),
            Err(e) => Slice::Errored(e.to_string()),
        };
        tracing::debug!(loaded = slice.is_loaded(), "Banned users slice settled");
        self.state_tx.send_modify(|s| s.banned_users = slice);
    }

    pub async fn refresh_admins(&self) {
        self.state_tx.send_modify(|s| s.admins = Slice::Loading);
        let slice = match self.repos.admins.list_admins().await {
            Ok(admins) => Slice::Loaded(admins),
            Err(e) => Slice::Errored(e.to_string()),
        };
        tracing::debug!(loaded = slice.is_loaded(), "Admins slice settled");
        self.state_tx.send_modify(|s| s.admins = slice);
    }

    pub async fn refresh_categories(&self) {
        self.state_tx
            .send_modify(|s| s.categories = Slice::Loading);
        let slice = match self.repos.categories.list_categories().await {
            Ok(categories) => Slice::Loaded(categories),
            Err(e) => Slice::Errored(e.to_string()),
        };
        tracing::debug!(loaded = slice.is_loaded(), "Categories slice settled");
        self.state_tx.send_modify(|s| s.categories = slice);
    }

    // --- mutations ---

    pub async fn grant_admin(
        &self,
        target: &str,
        role: AdminRole,
        granted_by: &str,
        permissions: Vec<String>,
    ) -> Result<u32> {
        match self
            .repos
            .admins
            .grant_admin_role(target, role, granted_by, permissions)
            .await
        {
            Ok(revision) => {
                self.cache.invalidate(target);
                self.refresh_admins().await;
                self.success(format!("Granted {} role to {}", role, target));
                Ok(revision)
            }
            Err(e) => {
                self.error(format!("Failed to grant role: {}", e));
                Err(e)
            }
        }
    }

    pub async fn revoke_admin(&self, target: &str) -> Result<()> {
        match self.repos.admins.revoke_admin_role(target).await {
            Ok(()) => {
                self.cache.invalidate(target);
                self.refresh_admins().await;
                self.success(format!("Revoked admin role from {}", target));
                Ok(())
            }
            Err(e) => {
                self.error(format!("Failed to revoke role: {}", e));
                Err(e)
            }
        }
    }

    pub async fn ban_user(&self, target: &str, admin: &str, reason: &str) -> Result<()> {
        match self.repos.users.ban_user(target, admin, reason).await {
            Ok(()) => {
                self.refresh_banned_users().await;
                self.success(format!("Banned {}", target));
                Ok(())
            }
            Err(e) => {
                self.error(format!("Failed to ban user: {}", e));
                Err(e)
            }
        }
    }

    pub async fn unban_user(&self, target: &str) -> Result<()> {
        match self.repos.users.unban_user(target).await {
            Ok(()) => {
                self.refresh_banned_users().await;
                self.success(format!("Unbanned {}", target));
                Ok(())
            }
            Err(e) => {
                self.error(format!("Failed to unban user: {}", e));
                Err(e)
            }
        }
    }

    pub async fn review_report(
        &self,
        report_id: &str,
        admin: &str,
        action: AdminAction,
        notes: Option<String>,
    ) -> Result<()> {
        match self
            .repos
            .reports
            .review_report(report_id, admin, action, notes)
            .await
        {
            Ok(()) => {
                self.refresh_reports().await;
                if action == AdminAction::BanUser {
                    self.refresh_banned_users().await;
                }
                self.success(format!("Report reviewed: {}", action));
                Ok(())
            }
            Err(e @ Error::PartialFailure { .. }) => {
                // The report update committed before the side effect
                // failed, so the slice must still be reloaded.
                self.refresh_reports().await;
                self.error(e.to_string());
                Err(e)
            }
            Err(e) => {
                self.error(format!("Failed to review report: {}", e));
                Err(e)
            }
        }
    }

    pub async fn create_category(&self, name: &str, order: i32) -> Result<Category> {
        match self.repos.categories.create_category(name, order).await {
            Ok(category) => {
                self.refresh_categories().await;
                self.success(format!("Category '{}' created", category.name));
                Ok(category)
            }
            Err(e) => {
                self.error(format!("Failed to create category: {}", e));
                Err(e)
            }
        }
    }

    pub async fn delete_category(&self, category_id: &str, migrate_to: &str) -> Result<u64> {
        match self
            .repos
            .categories
            .delete_category(category_id, migrate_to)
            .await
        {
            Ok(migrated) => {
                self.refresh_categories().await;
                self.success(format!(
                    "Category deleted; {} posts migrated to {}",
                    migrated, migrate_to
                ));
                Ok(migrated)
            }
            Err(e) => {
                self.error(format!("Failed to delete category: {}", e));
                Err(e)
            }
        }
    }

    fn success(&self, message: String) {
        let _ = self.notice_tx.send(Notice::Success(message));
    }

    fn error(&self, message: String) {
        let _ = self.notice_tx.send(Notice::Error(message));
    }
}
