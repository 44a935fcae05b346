//! Habit tag service trait definition.

use crate::dto::{UpsertHabitTagsRequest, UpsertOutcome};
use async_trait::async_trait;
use devhabit_core::{DevHabitResult, HabitId, Interface, TagId, UserId};

/// Manages the tags linked to a habit.
#[async_trait]
pub trait HabitTagService: Interface + Send + Sync {
    /// Makes the linked tags equal to the requested set.
    async fn upsert_habit_tags(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        request: UpsertHabitTagsRequest,
    ) -> DevHabitResult<UpsertOutcome>;

    /// Removes one link.
    async fn delete_habit_tag(&self, user_id: &UserId, habit_id: &HabitId, tag_id: &TagId) -> DevHabitResult<()>;
}
