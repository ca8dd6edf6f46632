//! In-memory store adapter
//!
//! Backs tests and local development. Besides the trait contract it offers
//! two test affordances: per-operation failure injection (to exercise
//! remote-unavailable and partial-failure paths) and per-operation call
//! counters (to assert the status cache suppresses lookups).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{ModerationStore, ReportReview};
use crate::domain::entities::{Category, Post, Report, RoleGrant, UserRecord};
use parlor_common::{Error, Result};

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    grants: HashMap<String, (RoleGrant, u32)>,
    reports: HashMap<String, Report>,
    posts: HashMap<String, Post>,
    categories: HashMap<String, Category>,
}

/// In-memory document store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    failing: Mutex<HashSet<String>>,
    counters: Mutex<HashMap<String, u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named operation fail with a store error until cleared
    pub fn set_failing(&self, op: &str, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(op.to_string());
        } else {
            set.remove(op);
        }
    }

    /// How many times the named operation has been invoked
    pub fn op_count(&self, op: &str) -> u64 {
        *self.counters.lock().unwrap().get(op).unwrap_or(&0)
    }

    fn enter(&self, op: &str) -> Result<()> {
        *self.counters.lock().unwrap().entry(op.to_string()).or_insert(0) += 1;
        if self.failing.lock().unwrap().contains(op) {
            return Err(Error::Store(format!("injected failure: {}", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl ModerationStore for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.enter("get_user")?;
        Ok(self.inner.read().await.users.get(user_id).cloned())
    }

    async fn upsert_user(&self, user: &UserRecord) -> Result<()> {
        self.enter("upsert_user")?;
        self.inner
            .write()
            .await
            .users
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn apply_ban(
        &self,
        user_id: &str,
        banned_by: &str,
        reason: &str,
        banned_at: DateTime<Utc>,
    ) -> Result<()> {
        self.enter("apply_ban")?;
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(user_id)
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))?;
        user.is_banned = true;
        user.banned_at = Some(banned_at);
        user.banned_by = Some(banned_by.to_string());
        user.ban_reason = Some(reason.to_string());
        Ok(())
    }

    async fn clear_ban(&self, user_id: &str) -> Result<()> {
        self.enter("clear_ban")?;
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(user_id)
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))?;
        user.is_banned = false;
        user.banned_at = None;
        user.banned_by = None;
        user.ban_reason = None;
        Ok(())
    }

    async fn list_banned_users(&self) -> Result<Vec<UserRecord>> {
        self.enter("list_banned_users")?;
        let inner = self.inner.read().await;
        let mut banned: Vec<UserRecord> = inner
            .users
            .values()
            .filter(|u| u.is_banned)
            .cloned()
            .collect();
        banned.sort_by(|a, b| b.banned_at.cmp(&a.banned_at));
        Ok(banned)
    }

    async fn get_role_grant(&self, user_id: &str) -> Result<Option<RoleGrant>> {
        self.enter("get_role_grant")?;
        Ok(self
            .inner
            .read()
            .await
            .grants
            .get(user_id)
            .map(|(grant, _)| grant.clone()))
    }

    async fn upsert_role_grant(&self, grant: &RoleGrant) -> Result<u32> {
        self.enter("upsert_role_grant")?;
        let mut inner = self.inner.write().await;
        let revision = inner
            .grants
            .get(&grant.user_id)
            .map(|(_, rev)| rev + 1)
            .unwrap_or(1);
        inner
            .grants
            .insert(grant.user_id.clone(), (grant.clone(), revision));
        Ok(revision)
    }

    async fn delete_role_grant(&self, user_id: &str) -> Result<()> {
        self.enter("delete_role_grant")?;
        self.inner.write().await.grants.remove(user_id);
        Ok(())
    }

    async fn list_role_grants(&self) -> Result<Vec<RoleGrant>> {
        self.enter("list_role_grants")?;
        let inner = self.inner.read().await;
        let mut grants: Vec<RoleGrant> =
            inner.grants.values().map(|(g, _)| g.clone()).collect();
        grants.sort_by(|a, b| a.granted_at.cmp(&b.granted_at));
        Ok(grants)
    }

    async fn insert_report(&self, report: &Report) -> Result<()> {
        self.enter("insert_report")?;
        self.inner
            .write()
            .await
            .reports
            .insert(report.id.clone(), report.clone());
        Ok(())
    }

    async fn get_report(&self, report_id: &str) -> Result<Option<Report>> {
        self.enter("get_report")?;
        Ok(self.inner.read().await.reports.get(report_id).cloned())
    }

    async fn apply_report_review(&self, report_id: &str, review: &ReportReview) -> Result<()> {
        self.enter("apply_report_review")?;
        let mut inner = self.inner.write().await;
        let report = inner
            .reports
            .get_mut(report_id)
            .ok_or_else(|| Error::NotFound(format!("Report {} not found", report_id)))?;
        report.status = review.status;
        report.reviewed_by = Some(review.reviewed_by.clone());
        report.reviewed_at = Some(review.reviewed_at);
        report.admin_action = review.admin_action;
        report.admin_notes = review.admin_notes.clone();
        Ok(())
    }

    async fn list_pending_reports(&self) -> Result<Vec<Report>> {
        self.enter("list_pending_reports")?;
        let inner = self.inner.read().await;
        let mut pending: Vec<Report> = inner
            .reports
            .values()
            .filter(|r| r.status == crate::ReportStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }

    async fn get_post(&self, post_id: &str) -> Result<Option<Post>> {
        self.enter("get_post")?;
        Ok(self.inner.read().await.posts.get(post_id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> Result<()> {
        self.enter("insert_post")?;
        self.inner
            .write()
            .await
            .posts
            .insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn delete_post(&self, post_id: &str) -> Result<()> {
        self.enter("delete_post")?;
        self.inner.write().await.posts.remove(post_id);
        Ok(())
    }

    async fn migrate_posts(&self, from_category: &str, to_category: &str) -> Result<u64> {
        self.enter("migrate_posts")?;
        let mut inner = self.inner.write().await;
        let mut migrated = 0;
        for post in inner.posts.values_mut() {
            if post.category_id == from_category {
                post.category_id = to_category.to_string();
                migrated += 1;
            }
        }
        Ok(migrated)
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        self.enter("insert_category")?;
        self.inner
            .write()
            .await
            .categories
            .insert(category.id.clone(), category.clone());
        Ok(())
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>> {
        self.enter("get_category")?;
        Ok(self.inner.read().await.categories.get(category_id).cloned())
    }

    async fn find_category_by_name(&self, normalized_name: &str) -> Result<Option<Category>> {
        self.enter("find_category_by_name")?;
        let inner = self.inner.read().await;
        Ok(inner
            .categories
            .values()
            .find(|c| c.normalized_name() == normalized_name)
            .cloned())
    }

    async fn delete_category(&self, category_id: &str) -> Result<()> {
        self.enter("delete_category")?;
        self.inner.write().await.categories.remove(category_id);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.enter("list_categories")?;
        let inner = self.inner.read().await;
        let mut categories: Vec<Category> = inner.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }
}
