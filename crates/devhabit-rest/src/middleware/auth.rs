//! Authentication middleware.

use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use devhabit_core::DevHabitError;
use tracing::debug;

/// Why a presented bearer token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Expired,
    Invalid,
}

impl TokenRejection {
    /// Error reported to handlers that require authentication.
    #[must_use]
    pub fn to_error(self) -> DevHabitError {
        match self {
            Self::Expired => DevHabitError::TokenExpired,
            Self::Invalid => DevHabitError::InvalidToken("Invalid or expired token".to_string()),
        }
    }
}

/// Authentication middleware that validates JWT tokens.
///
/// Valid claims are added to the request extensions. A rejected token is
/// recorded as [`TokenRejection`] instead, anonymous endpoints still run and
/// protected handlers decide through their extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        match state.token_provider.validate_token(bearer.token()) {
            Ok(claims) => {
                debug!("Authenticated identity: {}", claims.identity_id());
                request.extensions_mut().insert(claims);
            }
            Err(e) => {
                debug!("Token validation failed: {}", e);
                let rejection = match e {
                    DevHabitError::TokenExpired => TokenRejection::Expired,
                    _ => TokenRejection::Invalid,
                };
                request.extensions_mut().insert(rejection);
            }
        }
    }

    next.run(request).await
}
