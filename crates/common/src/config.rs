//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Legacy super-admin identity grandfathered in before the role store
/// existed. Kept as a default until the migration is complete.
const DEFAULT_LEGACY_SUPER_ADMIN: &str = "EWBjQFvMu2YU7BVDUZZGcDFpKWA3";

/// Legacy admin emails honored when the role store is unreachable.
const DEFAULT_LEGACY_ADMIN_EMAILS: &[&str] = &["admin@parlor.app", "mod@parlor.app"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// JWT verification
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,

    /// Grandfathered super-admin identities (comma-separated in env)
    pub legacy_super_admins: Vec<String>,
    /// Grandfathered admin emails (comma-separated in env)
    pub legacy_admin_emails: Vec<String>,

    /// Runtime configuration
    pub log_level: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?,
            jwt_issuer: env::var("JWT_ISSUER").ok(),
            jwt_audience: env::var("JWT_AUDIENCE").ok(),

            legacy_super_admins: env::var("LEGACY_SUPER_ADMINS")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| vec![DEFAULT_LEGACY_SUPER_ADMIN.to_string()]),
            legacy_admin_emails: env::var("LEGACY_ADMIN_EMAILS")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| {
                    DEFAULT_LEGACY_ADMIN_EMAILS
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
