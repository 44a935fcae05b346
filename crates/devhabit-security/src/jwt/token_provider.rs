//! JWT token provider for creating and validating tokens.

use super::Claims;
use crate::encryption::random_token;
use chrono::Utc;
use devhabit_config::JwtAuthConfig;
use devhabit_core::{DevHabitError, DevHabitResult, Interface};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, warn};
use utoipa::ToSchema;

/// Length in bytes of a refresh token before encoding.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Identity data placed into an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub identity_id: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Token pair returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokens {
    /// Signed JWT.
    pub access_token: String,
    /// Opaque random token.
    pub refresh_token: String,
}

/// Interface for token operations.
pub trait TokenProviderInterface: Interface {
    /// Issues an access token and a fresh refresh token.
    fn create(&self, request: &TokenRequest) -> DevHabitResult<AccessTokens>;

    /// Validates a bearer token and returns its claims.
    fn validate_token(&self, token: &str) -> DevHabitResult<Claims>;

    /// Lifetime of stored refresh tokens.
    fn refresh_token_lifetime_days(&self) -> i64;
}

/// JWT token provider service.
#[derive(Component, Clone)]
#[shaku(interface = TokenProviderInterface)]
pub struct TokenProvider {
    config: Arc<JwtAuthConfig>,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<JwtAuthConfig>) -> Self {
        Self { config }
    }

    /// Returns the configuration, used to build the DI parameters.
    #[must_use]
    pub fn config(&self) -> Arc<JwtAuthConfig> {
        Arc::clone(&self.config)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation
    }

    /// Generates a signed access token.
    pub fn generate_access_token(&self, request: &TokenRequest) -> DevHabitResult<String> {
        let expires_at = Utc::now() + self.config.access_token_lifetime();

        let claims = Claims::new(
            request.identity_id.clone(),
            request.email.clone(),
            request.roles.clone(),
            self.config.issuer.clone(),
            self.config.audience.clone(),
            expires_at,
        );

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.key.as_bytes()),
        )
        .map_err(|e| DevHabitError::Internal(format!("Failed to generate access token: {}", e)))?;

        debug!("Generated access token for identity {}", request.identity_id);
        Ok(token)
    }

    /// Generates an opaque refresh token.
    #[must_use]
    pub fn generate_refresh_token(&self) -> String {
        random_token(REFRESH_TOKEN_BYTES)
    }
}

impl TokenProviderInterface for TokenProvider {
    fn create(&self, request: &TokenRequest) -> DevHabitResult<AccessTokens> {
        Ok(AccessTokens {
            access_token: self.generate_access_token(request)?,
            refresh_token: self.generate_refresh_token(),
        })
    }

    fn validate_token(&self, token: &str) -> DevHabitResult<Claims> {
        let decoding_key = DecodingKey::from_secret(self.config.key.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &self.validation()).map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => DevHabitError::TokenExpired,
                ErrorKind::InvalidSignature => DevHabitError::InvalidToken("Invalid token signature".to_string()),
                ErrorKind::InvalidIssuer => DevHabitError::InvalidToken("Invalid token issuer".to_string()),
                ErrorKind::InvalidAudience => DevHabitError::InvalidToken("Invalid token audience".to_string()),
                _ => DevHabitError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    fn refresh_token_lifetime_days(&self) -> i64 {
        self.config.refresh_token_expiration_in_days
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}
