//! Repository implementations for the moderation domain
//!
//! The mutation surface over the document store. Repositories do not
//! re-check permissions — that is the call site's responsibility, and the
//! store enforces the authoritative rules regardless.

pub mod admins;
pub mod categories;
pub mod reports;
pub mod users;

use std::sync::Arc;

use crate::store::ModerationStore;
use parlor_common::Clock;

pub use admins::AdminRepository;
pub use categories::CategoryRepository;
pub use reports::ReportRepository;
pub use users::UserRepository;

/// Combined repository access for the moderation domain
#[derive(Clone)]
pub struct ModerationRepositories {
    pub admins: AdminRepository,
    pub users: UserRepository,
    pub reports: ReportRepository,
    pub categories: CategoryRepository,
}

impl ModerationRepositories {
    pub fn new(store: Arc<dyn ModerationStore>, clock: Arc<dyn Clock>) -> Self {
        let users = UserRepository::new(store.clone(), clock.clone());
        Self {
            admins: AdminRepository::new(store.clone(), clock.clone()),
            reports: ReportRepository::new(store.clone(), clock.clone(), users.clone()),
            categories: CategoryRepository::new(store.clone()),
            users,
        }
    }
}
