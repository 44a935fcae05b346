//! Sort mapping registry of the habit and tag representations.
//!
//! Public sort names are spelled the way the DTO serializes the field.
//! Columns are the storage column names understood by the repositories.

use crate::dto::{HabitDto, HabitDtoV2, TagDto};
use devhabit_core::{Habit, OrderKey, SortMapping, SortMappingDefinition, SortMappingProvider, Tag};

/// Habit mappings shared by every representation version.
macro_rules! habit_mappings {
    ($created:literal, $updated:literal, $completed:literal) => {
        &[
            SortMapping::new("id", &["id"]),
            SortMapping::new("name", &["name"]),
            SortMapping::new("description", &["description"]),
            SortMapping::new("type", &["type"]),
            SortMapping::new("status", &["status"]),
            SortMapping::new("isArchived", &["is_archived"]),
            SortMapping::new("endDate", &["end_date"]),
            SortMapping::new("frequency", &["frequency_type", "frequency_times_per_period"]),
            SortMapping::new("target", &["target_value", "target_unit"]),
            SortMapping::new($created, &["created_at_utc"]),
            SortMapping::new($updated, &["updated_at_utc"]),
            SortMapping::new($completed, &["last_completed_at_utc"]),
        ]
    };
}

pub const HABIT_V1_SORT_MAPPINGS: &[SortMapping] =
    habit_mappings!("createdAtUtc", "updatedAtUtc", "lastCompletedAtUtc");

pub const HABIT_V2_SORT_MAPPINGS: &[SortMapping] = habit_mappings!("createdAt", "updatedAt", "lastCompletedAt");

pub const TAG_SORT_MAPPINGS: &[SortMapping] = &[
    SortMapping::new("id", &["id"]),
    SortMapping::new("name", &["name"]),
    SortMapping::new("description", &["description"]),
    SortMapping::new("createdAtUtc", &["created_at_utc"]),
    SortMapping::new("updatedAtUtc", &["updated_at_utc"]),
];

/// Order of a habit list without a sort expression.
pub const HABIT_DEFAULT_ORDER: &[OrderKey] = &[OrderKey::asc("created_at_utc")];

/// Order of the tag list without a sort expression.
pub const TAG_DEFAULT_ORDER: &[OrderKey] = &[OrderKey::asc("name")];

/// Last key of every order, keeps pages stable.
pub const TIEBREAKER: &str = "id";

/// Builds the provider with every registered mapping.
#[must_use]
pub fn sort_mapping_provider() -> SortMappingProvider {
    SortMappingProvider::new(vec![
        SortMappingDefinition::new::<HabitDto, Habit>(HABIT_V1_SORT_MAPPINGS),
        SortMappingDefinition::new::<HabitDtoV2, Habit>(HABIT_V2_SORT_MAPPINGS),
        SortMappingDefinition::new::<TagDto, Tag>(TAG_SORT_MAPPINGS),
    ])
}
