//! Identity provider integration for Parlor
//!
//! The moderation service never stores credentials; it verifies tokens
//! minted by the external identity provider and exposes the authenticated
//! identity (and its email claim) to handlers via an axum extractor.

pub mod claims;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jwt;

pub use claims::IdentityClaims;
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AuthVerifier, CurrentUser};
pub use jwt::encode_token;
