//! JWT claims extractors.

use crate::middleware::TokenRejection;
use crate::responses::AppError;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use devhabit_core::{DevHabitError, Role, UserId};
use devhabit_security::{Claims, ClaimsExt};

/// Extractor for authenticated user claims.
///
/// The claims are validated by [`crate::middleware::auth_middleware`], this
/// extractor only reads the outcome from the request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl std::ops::Deref for AuthenticatedUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(Self(claims.clone()));
        }

        if let Some(rejection) = parts.extensions.get::<TokenRejection>() {
            return Err(AppError(rejection.to_error()));
        }

        let error = if parts.headers.contains_key(AUTHORIZATION) {
            DevHabitError::unauthorized("Invalid authorization format")
        } else {
            DevHabitError::unauthorized("Missing authorization header")
        };
        Err(AppError(error))
    }
}

/// Authenticated member together with the application user it maps to.
///
/// Rejects with 403 when the token lacks the `Member` role and with 401 when
/// no application user is linked to the identity.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub claims: Claims,
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        claims.require_role(Role::Member)?;

        let user_id = state
            .user_context
            .user_id(claims.identity_id())
            .await?
            .ok_or_else(|| DevHabitError::unauthorized("User is not authenticated."))?;

        Ok(Self { claims, user_id })
    }
}
