//! Domain entities for the Parlor moderation domain
//!
//! Identities are opaque strings minted by the external identity provider;
//! report and post ids are opaque strings as well (uuid v4 when minted
//! here). All timestamps are UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parlor_common::{Error, Result};

pub use crate::domain::state::ReportStatus;
use crate::domain::validation::{derive_category_id, normalize_category_name};

/// Maximum length of a report reason
pub const MAX_REASON_LEN: usize = 200;

/// Maximum length of a report description or admin note
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Admin role levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::SuperAdmin => "super_admin",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "admin" => Ok(AdminRole::Admin),
            "super_admin" => Ok(AdminRole::SuperAdmin),
            other => Err(Error::Validation(format!("Unknown admin role: {}", other))),
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role grant authorizing an identity to perform moderation actions.
///
/// At most one grant exists per identity; a re-grant overwrites the
/// previous record (last write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub user_id: String,
    pub role: AdminRole,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
    pub permissions: Vec<String>,
}

/// User entity as seen by moderation: identity plus embedded ban record.
///
/// The wider user document carries social fields (followers, hidden posts,
/// blocked users) that moderation never touches; they are not modeled here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub is_banned: bool,
    pub banned_at: Option<DateTime<Utc>>,
    pub banned_by: Option<String>,
    pub ban_reason: Option<String>,
    /// Monotonically non-decreasing; managed by the escalation path, not
    /// by ban/unban.
    pub violation_count: i32,
    pub warning_count: i32,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// A user record with no moderation history
    pub fn new(id: impl Into<String>, email: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            email,
            display_name: None,
            is_banned: false,
            banned_at: None,
            banned_by: None,
            ban_reason: None,
            violation_count: 0,
            warning_count: 0,
            created_at: now,
        }
    }
}

/// Action an admin takes when reviewing a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    /// Not yet reviewed
    #[default]
    None,
    Dismiss,
    DeletePost,
    BanUser,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::None => "none",
            AdminAction::Dismiss => "dismiss",
            AdminAction::DeletePost => "delete_post",
            AdminAction::BanUser => "ban_user",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "none" => Ok(AdminAction::None),
            "dismiss" => Ok(AdminAction::Dismiss),
            "delete_post" => Ok(AdminAction::DeletePost),
            "ban_user" => Ok(AdminAction::BanUser),
            other => Err(Error::Validation(format!("Unknown admin action: {}", other))),
        }
    }
}

impl std::fmt::Display for AdminAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A report filed by a user against a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
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

impl Report {
    /// Create a pending report with validation
    pub fn new(
        post_id: impl Into<String>,
        reported_by: impl Into<String>,
        reason: String,
        description: String,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let reason = reason.trim().to_string();
        if reason.is_empty() || reason.len() > MAX_REASON_LEN {
            return Err(Error::Validation(format!(
                "Report reason must be 1-{} characters",
                MAX_REASON_LEN
            )));
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(Error::Validation(format!(
                "Report description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }

        Ok(Report {
            id: Uuid::new_v4().to_string(),
            post_id: post_id.into(),
            reported_by: reported_by.into(),
            reason,
            description,
            status: ReportStatus::Pending,
            created_at: now,
            reviewed_by: None,
            reviewed_at: None,
            admin_action: AdminAction::None,
            admin_notes: None,
        })
    }
}

/// Post as seen by moderation: mutated only via delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub category_id: String,
    pub created_at: DateTime<Utc>,
}

/// Post category with a deterministic slug id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub order: i32,
}

impl Category {
    /// Create a category, deriving its id from the name
    pub fn new(name: &str, order: i32) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Category name is required".to_string()));
        }

        let id = derive_category_id(name);
        if id.is_empty() {
            return Err(Error::Validation(
                "Category name must contain at least one alphanumeric character".to_string(),
            ));
        }

        Ok(Category {
            id,
            name: name.to_string(),
            order,
        })
    }

    /// Lowercased name used for case-insensitive uniqueness checks
    pub fn normalized_name(&self) -> String {
        normalize_category_name(&self.name)
    }
}
