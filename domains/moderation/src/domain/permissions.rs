//! Client-facing permission checks
//!
//! Every check is advisory: the store enforces the authoritative rules
//! server-side, and a client-side "allow" is never a security boundary.
//! Checks never fail — any ambiguity (missing identity, unreachable store)
//! resolves to deny, except where the legacy allow-list grandfathers an
//! identity in.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::cache::{AdminStatus, StatusCache};
use crate::store::ModerationStore;
use crate::AdminRole;

/// The requester on whose behalf a check runs: the provider's identity
/// plus its email claim (used only for the legacy fallback).
#[derive(Debug, Clone)]
pub struct Requester {
    pub id: String,
    pub email: Option<String>,
}

impl Requester {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// Grandfathered identities honored while the role store migration is in
/// flight, or when the store is unreachable.
///
/// This is a trust bootstrap: an explicit configuration value rather than
/// constants buried in decision logic, so it can be retired deliberately by
/// supplying empty lists. Do not remove without a migration plan.
#[derive(Debug, Clone, Default)]
pub struct LegacyAllowList {
    super_admins: HashSet<String>,
    admin_emails: HashSet<String>,
}

impl LegacyAllowList {
    pub fn new(super_admins: Vec<String>, admin_emails: Vec<String>) -> Self {
        Self {
            super_admins: super_admins.into_iter().collect(),
            admin_emails: admin_emails
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    pub fn is_super_admin(&self, identity: &str) -> bool {
        self.super_admins.contains(identity)
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.contains(&email.to_lowercase())
    }
}

/// Pure decision logic for moderation permissions.
///
/// Lookup order for role checks: status cache, then the `admin_users`
/// collection, then (on store failure or missing grant) the legacy
/// allow-list.
pub struct PermissionEvaluator {
    store: Arc<dyn ModerationStore>,
    cache: Arc<StatusCache>,
    allow_list: LegacyAllowList,
}

impl PermissionEvaluator {
    pub fn new(
        store: Arc<dyn ModerationStore>,
        cache: Arc<StatusCache>,
        allow_list: LegacyAllowList,
    ) -> Self {
        Self {
            store,
            cache,
            allow_list,
        }
    }

    /// The injected cache, shared with whoever handles logout
    pub fn cache(&self) -> &Arc<StatusCache> {
        &self.cache
    }

    /// Resolve the requester's admin classification
    async fn status(&self, who: &Requester) -> AdminStatus {
        if let Some(status) = self.cache.get(&who.id) {
            return status;
        }

        let legacy = self.legacy_status(who);

        match self.store.get_role_grant(&who.id).await {
            Ok(grant) => {
                let status = AdminStatus {
                    is_admin: grant.is_some() || legacy.is_admin,
                    is_super_admin: grant
                        .map(|g| g.role == AdminRole::SuperAdmin)
                        .unwrap_or(false)
                        || legacy.is_super_admin,
                };
                self.cache.insert(&who.id, status);
                status
            }
            Err(e) => {
                // Remote unavailable: degrade to the allow-list, uncached
                // so the store is retried on the next check.
                tracing::warn!(identity = %who.id, error = %e, "Role lookup failed, using legacy allow-list");
                legacy
            }
        }
    }

    fn legacy_status(&self, who: &Requester) -> AdminStatus {
        let is_super = self.allow_list.is_super_admin(&who.id);
        let is_admin_email = who
            .email
            .as_deref()
            .map(|e| self.allow_list.is_admin_email(e))
            .unwrap_or(false);

        AdminStatus {
            is_admin: is_super || is_admin_email,
            is_super_admin: is_super,
        }
    }

    /// Does the requester hold any admin role (admin or super-admin)?
    pub async fn is_admin(&self, who: Option<&Requester>) -> bool {
        match who {
            Some(who) => self.status(who).await.is_admin,
            None => false,
        }
    }

    /// Does the requester hold the super-admin role?
    pub async fn is_super_admin(&self, who: Option<&Requester>) -> bool {
        match who {
            Some(who) => self.status(who).await.is_super_admin,
            None => false,
        }
    }

    /// Either admin classification
    pub async fn is_any_admin(&self, who: Option<&Requester>) -> bool {
        match who {
            Some(who) => {
                let status = self.status(who).await;
                status.is_admin || status.is_super_admin
            }
            None => false,
        }
    }

    /// Owners may delete their own posts; admins may delete any post
    pub async fn can_delete_post(&self, who: Option<&Requester>, post_owner: &str) -> bool {
        match who {
            Some(who) => who.id == post_owner || self.status(who).await.is_admin,
            None => false,
        }
    }

    /// Category management requires an admin role
    pub async fn can_modify_categories(&self, who: Option<&Requester>) -> bool {
        self.is_any_admin(who).await
    }

    /// A report may only be filed by the identity it claims as reporter
    pub fn can_create_report(&self, who: Option<&Requester>, claimed_reporter: &str) -> bool {
        match who {
            Some(who) => who.id == claimed_reporter,
            None => false,
        }
    }
}
