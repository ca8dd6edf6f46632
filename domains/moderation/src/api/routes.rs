//! Route definitions for the moderation domain API

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{admins, categories, dashboard, reports, users};
use super::middleware::ModerationState;

/// Create report filing routes (any authenticated identity)
fn report_routes() -> Router<ModerationState> {
    Router::new().route("/v1/reports", post(reports::create_report))
}

/// Create admin role management routes
fn admin_routes() -> Router<ModerationState> {
    Router::new()
        .route(
            "/v1/moderation/admins",
            get(admins::list_admins).post(admins::grant_admin),
        )
        .route(
            "/v1/moderation/admins/{user_id}",
            delete(admins::revoke_admin),
        )
}

/// Create ban management routes
fn ban_routes() -> Router<ModerationState> {
    Router::new()
        .route("/v1/moderation/users/banned", get(users::list_banned))
        .route(
            "/v1/moderation/users/{user_id}/ban",
            post(users::ban_user).delete(users::unban_user),
        )
}

/// Create report review routes
fn review_routes() -> Router<ModerationState> {
    Router::new()
        .route("/v1/moderation/reports", get(reports::list_pending))
        .route(
            "/v1/moderation/reports/{report_id}/review",
            post(reports::review_report),
        )
}

/// Create category management routes
fn category_routes() -> Router<ModerationState> {
    Router::new()
        .route(
            "/v1/moderation/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/v1/moderation/categories/{category_id}",
            delete(categories::delete_category),
        )
}

/// Create dashboard routes
fn dashboard_routes() -> Router<ModerationState> {
    Router::new()
        .route("/v1/moderation/dashboard", get(dashboard::get_dashboard))
        .route(
            "/v1/moderation/dashboard/load",
            post(dashboard::load_dashboard),
        )
}

/// All moderation domain routes
pub fn routes() -> Router<ModerationState> {
    Router::new()
        .merge(report_routes())
        .merge(admin_routes())
        .merge(ban_routes())
        .merge(review_routes())
        .merge(category_routes())
        .merge(dashboard_routes())
}
