//! Typed, prefixed string IDs for domain entities.
//!
//! Every generated id is a short resource prefix followed by the simple
//! (hyphenless) form of a random UUID, truncated to 26 characters overall.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

/// Total length of a generated id, prefix included.
pub const ID_LENGTH: usize = 26;

/// Generates a new prefixed id.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    let mut id = format!("{prefix}{}", Uuid::new_v4().simple());
    id.truncate(ID_LENGTH);
    id
}

macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Prefix that every generated id starts with.
            pub const PREFIX: &'static str = $prefix;

            /// Creates a new random id.
            #[must_use]
            pub fn new() -> Self {
                Self(generate_id(Self::PREFIX))
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

prefixed_id!(
    /// Id of a habit, `h_` prefixed.
    HabitId,
    "h_"
);
prefixed_id!(
    /// Id of a tag, `t_` prefixed.
    TagId,
    "t_"
);
prefixed_id!(
    /// Id of an application user, `u_` prefixed.
    UserId,
    "u_"
);
prefixed_id!(
    /// Id of a stored GitHub access token, `gh_` prefixed.
    GitHubAccessTokenId,
    "gh_"
);
