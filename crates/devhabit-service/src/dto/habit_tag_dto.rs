//! Habit to tag link DTOs.

use devhabit_core::TagId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Replaces the set of tags linked to a habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertHabitTagsRequest {
    #[schema(value_type = Vec<String>)]
    pub tag_ids: Vec<TagId>,
}

impl UpsertHabitTagsRequest {
    /// Requested ids without duplicates, first occurrence wins.
    #[must_use]
    pub fn distinct_tag_ids(&self) -> Vec<TagId> {
        let mut ids: Vec<TagId> = Vec::with_capacity(self.tag_ids.len());
        for id in &self.tag_ids {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

/// Result of an upsert, decides between `200 OK` and `204 No Content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Unchanged,
    Updated,
}
