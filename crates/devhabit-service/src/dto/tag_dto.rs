//! Tag DTOs.

use chrono::{DateTime, Utc};
use devhabit_core::{rules, LinkDto, Shape, ShapedEntry};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Tag representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: Option<DateTime<Utc>>,
}

impl Shape for TagDto {
    const FIELDS: &'static [&'static str] = &["id", "name", "description", "createdAtUtc", "updatedAtUtc"];

    fn id(&self) -> &str {
        &self.id
    }
}

/// Unpaged tag collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TagsCollectionDto {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<ShapedEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDto>>,
}

/// Request to create a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTagRequest {
    #[validate(
        custom(function = "rules::not_blank"),
        length(min = 3, max = 50, message = "Name must be between 3 and 50 characters")
    )]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

/// Request to replace a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTagRequest {
    #[validate(
        custom(function = "rules::not_blank"),
        length(min = 3, max = 50, message = "Name must be between 3 and 50 characters")
    )]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}
