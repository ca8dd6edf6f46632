//! Document store port
//!
//! The remote backend owns every entity; this trait is the moderation
//! domain's view of it, one method per document operation the domain
//! performs. Adapters: [`memory::MemoryStore`] for tests and local
//! development, [`postgres::PgStore`] for production.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{AdminAction, Category, Post, Report, RoleGrant, UserRecord};
use crate::domain::state::ReportStatus;
use parlor_common::Result;

/// Review fields written onto a report in one update
#[derive(Debug, Clone, PartialEq)]
pub struct ReportReview {
    pub status: ReportStatus,
    pub reviewed_by: String,
    pub reviewed_at: DateTime<Utc>,
    pub admin_action: AdminAction,
    pub admin_notes: Option<String>,
}

/// Moderation's contract with the remote document store.
///
/// Each method is a single logical operation against one collection; the
/// store is authoritative and every client-side copy is ephemeral. Errors
/// are surfaced as [`parlor_common::Error::Store`] for remote failures and
/// `NotFound` where a targeted document is missing.
#[async_trait]
pub trait ModerationStore: Send + Sync {
    // --- users ---

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>>;

    async fn upsert_user(&self, user: &UserRecord) -> Result<()>;

    /// Set the ban fields atomically; violation/warning counters untouched
    async fn apply_ban(
        &self,
        user_id: &str,
        banned_by: &str,
        reason: &str,
        banned_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Clear is_banned and ban metadata; counters preserved
    async fn clear_ban(&self, user_id: &str) -> Result<()>;

    /// Banned users, most recently banned first
    async fn list_banned_users(&self) -> Result<Vec<UserRecord>>;

    // --- admin_users ---

    async fn get_role_grant(&self, user_id: &str) -> Result<Option<RoleGrant>>;

    /// Upsert a grant (one per identity, last write wins); returns the
    /// revision count for that identity
    async fn upsert_role_grant(&self, grant: &RoleGrant) -> Result<u32>;

    /// Delete a grant; succeeds when absent
    async fn delete_role_grant(&self, user_id: &str) -> Result<()>;

    /// All grants, oldest first
    async fn list_role_grants(&self) -> Result<Vec<RoleGrant>>;

    // --- reports ---

    async fn insert_report(&self, report: &Report) -> Result<()>;

    async fn get_report(&self, report_id: &str) -> Result<Option<Report>>;

    /// Write every review field in one update
    async fn apply_report_review(&self, report_id: &str, review: &ReportReview) -> Result<()>;

    /// Pending reports, newest first
    async fn list_pending_reports(&self) -> Result<Vec<Report>>;

    // --- posts ---

    async fn get_post(&self, post_id: &str) -> Result<Option<Post>>;

    async fn insert_post(&self, post: &Post) -> Result<()>;

    /// Idempotent delete; succeeds when the post is already gone
    async fn delete_post(&self, post_id: &str) -> Result<()>;

    /// Move every post in `from_category` to `to_category`; returns the
    /// number of posts migrated
    async fn migrate_posts(&self, from_category: &str, to_category: &str) -> Result<u64>;

    // --- categories ---

    async fn insert_category(&self, category: &Category) -> Result<()>;

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>>;

    /// Case-insensitive name lookup (callers pass the normalized name)
    async fn find_category_by_name(&self, normalized_name: &str) -> Result<Option<Category>>;

    async fn delete_category(&self, category_id: &str) -> Result<()>;

    /// Categories ordered by their display order, then name
    async fn list_categories(&self) -> Result<Vec<Category>>;
}
