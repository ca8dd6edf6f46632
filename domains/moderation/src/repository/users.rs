//! User ban repository

use std::sync::Arc;

use crate::domain::entities::UserRecord;
use crate::store::ModerationStore;
use parlor_common::{Clock, Result};

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn ModerationStore>,
    clock: Arc<dyn Clock>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn ModerationStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Ban a user. Sets the ban fields in one update; violation and warning
    /// counters belong to the escalation path and are not touched here.
    pub async fn ban_user(&self, target: &str, admin: &str, reason: &str) -> Result<()> {
        self.store
            .apply_ban(target, admin, reason, self.clock.now())
            .await?;
        tracing::info!(target = %target, admin = %admin, reason = %reason, "User banned");
        Ok(())
    }

    /// Lift a ban, clearing ban metadata but preserving the counters
    pub async fn unban_user(&self, target: &str) -> Result<()> {
        self.store.clear_ban(target).await?;
        tracing::info!(target = %target, "User unbanned");
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.store.get_user(user_id).await
    }

    /// Banned users, most recently banned first
    pub async fn list_banned(&self) -> Result<Vec<UserRecord>> {
        self.store.list_banned_users().await
    }
}
