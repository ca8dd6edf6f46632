//! Parlor moderation service composition root
//!
//! Wires the store, permission evaluator, repositories, and dashboard into
//! a single application router.

use std::sync::Arc;

use axum::Router;
use parlor_auth::{AuthConfig, AuthVerifier};
use parlor_common::{Clock, Config, SystemClock};
use parlor_moderation::{
    Dashboard, LegacyAllowList, ModerationRepositories, ModerationState, ModerationStore, Notice,
    PermissionEvaluator, StatusCache,
};

/// Create the main application router with all routes and middleware
pub async fn create_app(
    config: Config,
    store: Arc<dyn ModerationStore>,
) -> Result<Router, anyhow::Error> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // One injected cache instance, shared by the evaluator and dashboard
    let cache = Arc::new(StatusCache::new(clock.clone()));
    let allow_list = LegacyAllowList::new(
        config.legacy_super_admins.clone(),
        config.legacy_admin_emails.clone(),
    );
    let evaluator = Arc::new(PermissionEvaluator::new(
        store.clone(),
        cache.clone(),
        allow_list,
    ));

    let repos = ModerationRepositories::new(store, clock);
    let (dashboard, notices) = Dashboard::new(repos.clone(), cache);
    drain_notices(notices);

    let auth = AuthVerifier::new(AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
    });

    let state = ModerationState {
        repos,
        dashboard: Arc::new(dashboard),
        evaluator,
        auth,
    };

    // Build router — compose domain routes with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Parlor Moderation API v0.1.0" }),
        )
        .merge(parlor_moderation::routes().with_state(state));

    Ok(app)
}

/// Log mutation notices as they are consumed from the queue
fn drain_notices(mut notices: tokio::sync::mpsc::UnboundedReceiver<Notice>) {
    tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            match notice {
                Notice::Success(message) => tracing::info!(%message, "Mutation succeeded"),
                Notice::Error(message) => tracing::warn!(%message, "Mutation failed"),
            }
        }
    });
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
