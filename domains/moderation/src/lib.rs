//! Moderation domain: admin roles, bans, report review, dashboard state
//!
//! The service is organized the way the wider Parlor backend lays out a
//! domain: pure entities and decision logic under `domain`, the document
//! store port and its adapters under `store`, the mutation surface under
//! `repository`, the aggregate read-model under `dashboard`, and the HTTP
//! surface under `api`.

pub mod api;
pub mod dashboard;
pub mod domain;
pub mod repository;
pub mod store;

// Re-export domain types at the crate root for convenience
pub use domain::cache::{AdminStatus, StatusCache, STATUS_TTL_MILLIS};
pub use domain::entities::*;
pub use domain::permissions::{LegacyAllowList, PermissionEvaluator, Requester};
pub use domain::state::{ReportEvent, ReportStateMachine, ReportStatus, StateError};

// Re-export repository types
pub use repository::{
    AdminRepository, CategoryRepository, ModerationRepositories, ReportRepository, UserRepository,
};

// Re-export store types
pub use store::{memory::MemoryStore, postgres::PgStore, ModerationStore, ReportReview};

// Re-export dashboard types
pub use dashboard::{Dashboard, DashboardState, Notice, Slice};

// Re-export API types
pub use api::routes;
pub use api::ModerationState;
