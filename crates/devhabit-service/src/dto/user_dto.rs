//! User DTOs.

use chrono::{DateTime, Utc};
use devhabit_core::LinkDto;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Application user representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDto>>,
}

impl UserDto {
    #[must_use]
    pub fn with_links(mut self, links: Vec<LinkDto>) -> Self {
        self.links = Some(links);
        self
    }
}
