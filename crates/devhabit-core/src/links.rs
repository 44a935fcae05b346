//! HATEOAS link descriptor.

use serde::{Deserialize, Serialize};

/// A link to a related action on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LinkDto {
    /// Absolute URL of the target.
    pub href: String,
    /// Relation name, e.g. `self` or `next`.
    pub rel: String,
    /// HTTP method to use.
    pub method: String,
}

impl LinkDto {
    /// Creates a link.
    #[must_use]
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.into(),
        }
    }
}

/// Well-known relation names.
pub mod rel {
    pub const SELF: &str = "self";
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const PARTIAL_UPDATE: &str = "partial-update";
    pub const DELETE: &str = "delete";
    pub const NEXT: &str = "next";
    pub const PREVIOUS: &str = "previous";
    pub const UPSERT_TAGS: &str = "upsert-tags";
    pub const STORE_TOKEN: &str = "store-token";
    pub const REVOKE_TOKEN: &str = "revoke-token";
}
