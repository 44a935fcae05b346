//! Tag service trait definition.

use crate::dto::{CreateTagRequest, TagsQuery, UpdateTagRequest};
use async_trait::async_trait;
use devhabit_core::{DevHabitResult, Interface, Tag, TagId, UserId};

/// Tag service trait.
#[async_trait]
pub trait TagService: Interface + Send + Sync {
    /// Returns every tag of the user, sorted.
    async fn get_tags(&self, user_id: &UserId, query: &TagsQuery) -> DevHabitResult<Vec<Tag>>;

    /// Returns a tag.
    async fn get_tag(&self, user_id: &UserId, id: &TagId, fields: Option<&str>) -> DevHabitResult<Tag>;

    /// Creates a tag. Names are unique per user.
    async fn create_tag(&self, user_id: &UserId, request: CreateTagRequest) -> DevHabitResult<Tag>;

    /// Replaces name and description of a tag.
    async fn update_tag(&self, user_id: &UserId, id: &TagId, request: UpdateTagRequest) -> DevHabitResult<()>;

    /// Deletes a tag and its habit links.
    async fn delete_tag(&self, user_id: &UserId, id: &TagId) -> DevHabitResult<()>;
}
