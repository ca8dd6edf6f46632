//! Admin role grant repository

use std::sync::Arc;

use crate::domain::entities::{AdminRole, RoleGrant};
use crate::store::ModerationStore;
use parlor_common::{Clock, Result};

#[derive(Clone)]
pub struct AdminRepository {
    store: Arc<dyn ModerationStore>,
    clock: Arc<dyn Clock>,
}

impl AdminRepository {
    pub fn new(store: Arc<dyn ModerationStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Grant an admin role, overwriting any existing grant for the target
    /// (last write wins). Returns the revision count for the grant.
    pub async fn grant_admin_role(
        &self,
        target: &str,
        role: AdminRole,
        granted_by: &str,
        permissions: Vec<String>,
    ) -> Result<u32> {
        let grant = RoleGrant {
            user_id: target.to_string(),
            role,
            granted_by: granted_by.to_string(),
            granted_at: self.clock.now(),
            permissions,
        };

        let revision = self.store.upsert_role_grant(&grant).await?;
        tracing::info!(target = %target, role = %role, granted_by = %granted_by, revision, "Admin role granted");
        Ok(revision)
    }

    /// Revoke the target's role grant; succeeds when no grant exists
    pub async fn revoke_admin_role(&self, target: &str) -> Result<()> {
        self.store.delete_role_grant(target).await?;
        tracing::info!(target = %target, "Admin role revoked");
        Ok(())
    }

    /// Find the target's role grant, if any
    pub async fn get_grant(&self, target: &str) -> Result<Option<RoleGrant>> {
        self.store.get_role_grant(target).await
    }

    /// All current grants, oldest first
    pub async fn list_admins(&self) -> Result<Vec<RoleGrant>> {
        self.store.list_role_grants().await
    }
}
