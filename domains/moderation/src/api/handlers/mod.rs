//! HTTP handlers for the moderation domain

pub mod admins;
pub mod categories;
pub mod dashboard;
pub mod reports;
pub mod users;
