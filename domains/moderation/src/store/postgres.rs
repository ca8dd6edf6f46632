//! PostgreSQL store adapter
//!
//! Runtime-bound queries (no compile-time schema checking) against the
//! moderation tables; see `migrations/` at the workspace root for the
//! schema. Every trait method is one statement, so each mutation is a
//! single transaction on its own.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{ModerationStore, ReportReview};
use crate::domain::entities::{
    AdminAction, AdminRole, Category, Post, Report, RoleGrant, UserRecord,
};
use crate::domain::state::ReportStatus;
use parlor_common::{Error, Result};

/// PostgreSQL-backed document store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the moderation schema migrations
    pub async fn migrate(pool: &PgPool) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(pool)
            .await
            .map_err(|e| Error::Store(format!("Migration failed: {}", e)))
    }
}

fn store_err(e: sqlx::Error) -> Error {
    Error::Store(e.to_string())
}

fn map_user(row: &PgRow) -> Result<UserRecord> {
    Ok(UserRecord {
        id: row.try_get("id").map_err(store_err)?,
        email: row.try_get("email").map_err(store_err)?,
        display_name: row.try_get("display_name").map_err(store_err)?,
        is_banned: row.try_get("is_banned").map_err(store_err)?,
        banned_at: row.try_get("banned_at").map_err(store_err)?,
        banned_by: row.try_get("banned_by").map_err(store_err)?,
        ban_reason: row.try_get("ban_reason").map_err(store_err)?,
        violation_count: row.try_get("violation_count").map_err(store_err)?,
        warning_count: row.try_get("warning_count").map_err(store_err)?,
        created_at: row.try_get("created_at").map_err(store_err)?,
    })
}

fn map_grant(row: &PgRow) -> Result<RoleGrant> {
    let role: String = row.try_get("role").map_err(store_err)?;
    let permissions: serde_json::Value = row.try_get("permissions").map_err(store_err)?;
    Ok(RoleGrant {
        user_id: row.try_get("user_id").map_err(store_err)?,
        role: AdminRole::parse(&role)
            .map_err(|_| Error::Internal(format!("Corrupt admin role: {}", role)))?,
        granted_by: row.try_get("granted_by").map_err(store_err)?,
        granted_at: row.try_get("granted_at").map_err(store_err)?,
        permissions: serde_json::from_value(permissions)?,
    })
}

fn map_report(row: &PgRow) -> Result<Report> {
    let status: String = row.try_get("status").map_err(store_err)?;
    let action: String = row.try_get("admin_action").map_err(store_err)?;
    Ok(Report {
        id: row.try_get("id").map_err(store_err)?,
        post_id: row.try_get("post_id").map_err(store_err)?,
        reported_by: row.try_get("reported_by").map_err(store_err)?,
        reason: row.try_get("reason").map_err(store_err)?,
        description: row.try_get("description").map_err(store_err)?,
        status: ReportStatus::parse(&status)
            .ok_or_else(|| Error::Internal(format!("Corrupt report status: {}", status)))?,
        created_at: row.try_get("created_at").map_err(store_err)?,
        reviewed_by: row.try_get("reviewed_by").map_err(store_err)?,
        reviewed_at: row.try_get("reviewed_at").map_err(store_err)?,
        admin_action: AdminAction::parse(&action)
            .map_err(|_| Error::Internal(format!("Corrupt admin action: {}", action)))?,
        admin_notes: row.try_get("admin_notes").map_err(store_err)?,
    })
}

fn map_post(row: &PgRow) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id").map_err(store_err)?,
        author_id: row.try_get("author_id").map_err(store_err)?,
        category_id: row.try_get("category_id").map_err(store_err)?,
        created_at: row.try_get("created_at").map_err(store_err)?,
    })
}

fn map_category(row: &PgRow) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id").map_err(store_err)?,
        name: row.try_get("name").map_err(store_err)?,
        order: row.try_get("sort_order").map_err(store_err)?,
    })
}

#[async_trait]
impl ModerationStore for PgStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(map_user).transpose()
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, is_banned, banned_at, banned_by,
                               ban_reason, violation_count, warning_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                is_banned = EXCLUDED.is_banned,
                banned_at = EXCLUDED.banned_at,
                banned_by = EXCLUDED.banned_by,
                ban_reason = EXCLUDED.ban_reason,
                violation_count = EXCLUDED.violation_count,
                warning_count = EXCLUDED.warning_count
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.is_banned)
        .bind(user.banned_at)
        .bind(&user.banned_by)
        .bind(&user.ban_reason)
        .bind(user.violation_count)
        .bind(user.warning_count)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn apply_ban(
        &self,
        user_id: &str,
        banned_by: &str,
        reason: &str,
        banned_at: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_banned = TRUE, banned_at = $2, banned_by = $3, ban_reason = $4
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(banned_at)
        .bind(banned_by)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn clear_ban(&self, user_id: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_banned = FALSE, banned_at = NULL, banned_by = NULL, ban_reason = NULL
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn list_banned_users(&self) -> Result<Vec<UserRecord>> {
        let rows =
            sqlx::query("SELECT * FROM users WHERE is_banned ORDER BY banned_at DESC NULLS LAST")
                .fetch_all(&self.pool)
                .await
                .map_err(store_err)?;
        rows.iter().map(map_user).collect()
    }

    async fn get_role_grant(&self, user_id: &str) -> Result<Option<RoleGrant>> {
        let row = sqlx::query("SELECT * FROM admin_users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(map_grant).transpose()
    }

    async fn upsert_role_grant(&self, grant: &RoleGrant) -> Result<u32> {
        let row = sqlx::query(
            r#"
            INSERT INTO admin_users (user_id, role, granted_by, granted_at, permissions, revision)
            VALUES ($1, $2, $3, $4, $5, 1)
            ON CONFLICT (user_id) DO UPDATE SET
                role = EXCLUDED.role,
                granted_by = EXCLUDED.granted_by,
                granted_at = EXCLUDED.granted_at,
                permissions = EXCLUDED.permissions,
                revision = admin_users.revision + 1
            RETURNING revision
            "#,
        )
        .bind(&grant.user_id)
        .bind(grant.role.as_str())
        .bind(&grant.granted_by)
        .bind(grant.granted_at)
        .bind(serde_json::to_value(&grant.permissions)?)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)?;

        let revision: i32 = row.try_get("revision").map_err(store_err)?;
        Ok(revision as u32)
    }

    async fn delete_role_grant(&self, user_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM admin_users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn list_role_grants(&self) -> Result<Vec<RoleGrant>> {
        let rows = sqlx::query("SELECT * FROM admin_users ORDER BY granted_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        rows.iter().map(map_grant).collect()
    }

    async fn insert_report(&self, report: &Report) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reports (id, post_id, reported_by, reason, description, status,
                                 created_at, reviewed_by, reviewed_at, admin_action, admin_notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&report.id)
        .bind(&report.post_id)
        .bind(&report.reported_by)
        .bind(&report.reason)
        .bind(&report.description)
        .bind(report.status.as_str())
        .bind(report.created_at)
        .bind(&report.reviewed_by)
        .bind(report.reviewed_at)
        .bind(report.admin_action.as_str())
        .bind(&report.admin_notes)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn get_report(&self, report_id: &str) -> Result<Option<Report>> {
        let row = sqlx::query("SELECT * FROM reports WHERE id = $1")
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(map_report).transpose()
    }

    async fn apply_report_review(&self, report_id: &str, review: &ReportReview) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE reports
            SET status = $2, reviewed_by = $3, reviewed_at = $4,
                admin_action = $5, admin_notes = $6
            WHERE id = $1
            "#,
        )
        .bind(report_id)
        .bind(review.status.as_str())
        .bind(&review.reviewed_by)
        .bind(review.reviewed_at)
        .bind(review.admin_action.as_str())
        .bind(&review.admin_notes)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Report {} not found", report_id)));
        }
        Ok(())
    }

    async fn list_pending_reports(&self) -> Result<Vec<Report>> {
        let rows =
            sqlx::query("SELECT * FROM reports WHERE status = 'pending' ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(store_err)?;
        rows.iter().map(map_report).collect()
    }

    async fn get_post(&self, post_id: &str) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT * FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(map_post).transpose()
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, author_id, category_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.category_id)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn delete_post(&self, post_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn migrate_posts(&self, from_category: &str, to_category: &str) -> Result<u64> {
        let result = sqlx::query("UPDATE posts SET category_id = $2 WHERE category_id = $1")
            .bind(from_category)
            .bind(to_category)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected())
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, name_normalized, sort_order)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(category.normalized_name())
        .bind(category.order)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(map_category).transpose()
    }

    async fn find_category_by_name(&self, normalized_name: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE name_normalized = $1")
            .bind(normalized_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        row.as_ref().map(map_category).transpose()
    }

    async fn delete_category(&self, category_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY sort_order ASC, name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        rows.iter().map(map_category).collect()
    }
}
