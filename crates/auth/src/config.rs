//! Authentication configuration

/// JWT verification settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 shared secret
    pub jwt_secret: String,
    /// Expected issuer; unchecked when absent
    pub issuer: Option<String>,
    /// Expected audience; unchecked when absent
    pub audience: Option<String>,
}
