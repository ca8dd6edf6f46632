//! Moderation domain state and auth integration

use std::sync::Arc;

use axum::extract::FromRef;
use parlor_auth::{AuthVerifier, CurrentUser};

use crate::dashboard::Dashboard;
use crate::domain::permissions::{PermissionEvaluator, Requester};
use crate::repository::ModerationRepositories;

/// Application state for the moderation domain
#[derive(Clone)]
pub struct ModerationState {
    pub repos: ModerationRepositories,
    pub dashboard: Arc<Dashboard>,
    pub evaluator: Arc<PermissionEvaluator>,
    pub auth: AuthVerifier,
}

impl FromRef<ModerationState> for AuthVerifier {
    fn from_ref(state: &ModerationState) -> Self {
        state.auth.clone()
    }
}

impl From<&CurrentUser> for Requester {
    fn from(user: &CurrentUser) -> Self {
        Requester::new(user.id.clone(), user.email.clone())
    }
}
