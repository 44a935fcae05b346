//! Tag entity.

use crate::{TagId, UserId};
use chrono::{DateTime, Utc};

/// Maximum length of a tag name.
pub const TAG_NAME_MAX_LENGTH: u64 = 50;

/// Maximum length of a tag description.
pub const TAG_DESCRIPTION_MAX_LENGTH: u64 = 500;

/// A user defined label that can be attached to habits.
///
/// Names are unique per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: Option<DateTime<Utc>>,
}

impl Tag {
    /// Creates a new tag.
    #[must_use]
    pub fn new(user_id: UserId, name: String, description: Option<String>) -> Self {
        Self {
            id: TagId::new(),
            user_id,
            name,
            description,
            created_at_utc: Utc::now(),
            updated_at_utc: None,
        }
    }

    /// Replaces name and description.
    pub fn update(&mut self, name: String, description: Option<String>) {
        self.name = name;
        self.description = description;
        self.updated_at_utc = Some(Utc::now());
    }
}
