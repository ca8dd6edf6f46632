//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthVerifier: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwt::{extract_bearer_token, validate_jwt_token};

/// Verifies bearer tokens against the identity provider's signing secret
#[derive(Clone)]
pub struct AuthVerifier {
    config: AuthConfig,
}

impl AuthVerifier {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Authenticate a raw bearer token
    pub fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = validate_jwt_token(token, &self.config)?;
        Ok(CurrentUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}

/// Authenticated identity extractor
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Opaque identity from the provider's `sub` claim
    pub id: String,
    /// Email claim, if the provider supplied one
    pub email: Option<String>,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let verifier = AuthVerifier::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        verifier.authenticate(&token)
    }
}
