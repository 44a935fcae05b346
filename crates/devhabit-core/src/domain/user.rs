//! Application user entity.

use crate::UserId;
use chrono::{DateTime, Utc};

/// Application user, linked to an identity account by `identity_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Id of the identity account the user signs in with.
    pub identity_id: String,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a user for an identity account.
    #[must_use]
    pub fn new(name: String, email: String, identity_id: String) -> Self {
        Self {
            id: UserId::new(),
            name,
            email,
            identity_id,
            created_at_utc: Utc::now(),
            updated_at_utc: None,
        }
    }
}
