//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims minted by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (opaque identity)
    pub sub: String,
    /// Email claim, used only for the legacy admin-by-email fallback
    pub email: Option<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
}
