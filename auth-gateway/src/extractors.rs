// Handler-side access to the verified session
use std::ops::Deref;

use async_trait::async_trait;
use auth_identity::AuthContext;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::GatewayError;

/// Verified caller identity placed in extensions by
/// [`crate::middleware::session_authenticator`].
///
/// Rejects with `401` if the route was not behind the perimeter or no
/// session was attached.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthContext);

impl Deref for Authenticated {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(GatewayError::missing_session)
    }
}

/// Session identity on public routes, where a caller may or may not be
/// signed in.
#[derive(Debug, Clone, Default)]
pub struct MaybeAuthenticated(pub Option<AuthContext>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthenticated
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthenticated(parts.extensions.get::<AuthContext>().cloned()))
    }
}
