//! Identity accounts, roles and refresh tokens.
//!
//! Identity data is kept apart from the application [`User`](crate::User):
//! an identity account owns credentials and roles, the application user owns
//! profile data and habits.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Authorization roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Role {
    /// Full access to user administration.
    Admin,
    /// Regular account that owns habits and tags.
    Member,
}

impl Role {
    /// Returns all available roles.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Admin, Self::Member]
    }

    /// Name as stored and placed in tokens.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Member => "Member",
        }
    }

    /// Parses a role name, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|r| r.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials of a person who can sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at_utc: DateTime<Utc>,
}

impl IdentityUser {
    /// Creates an identity account with a fresh id.
    #[must_use]
    pub fn new(email: String, password_hash: String, roles: Vec<Role>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            roles,
            created_at_utc: Utc::now(),
        }
    }

    /// Role names as placed in tokens.
    #[must_use]
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(ToString::to_string).collect()
    }
}

/// Long lived opaque token exchanged for a new access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: Uuid,
    pub identity_id: String,
    pub token: String,
    pub expires_at_utc: DateTime<Utc>,
}

impl RefreshToken {
    /// Creates a token valid for `lifetime_days`.
    #[must_use]
    pub fn new(identity_id: String, token: String, lifetime_days: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            identity_id,
            token,
            expires_at_utc: Utc::now() + Duration::days(lifetime_days),
        }
    }

    /// Checks if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at_utc < Utc::now()
    }

    /// Swaps in a new token value and restarts its lifetime.
    pub fn rotate(&mut self, token: String, lifetime_days: i64) {
        self.token = token;
        self.expires_at_utc = Utc::now() + Duration::days(lifetime_days);
    }
}
