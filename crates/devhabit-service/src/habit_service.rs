//! Habit service trait definition.

use crate::dto::{ApiVersion, CreateHabitRequest, HabitsQuery, UpdateHabitRequest};
use crate::patch::PatchDocument;
use async_trait::async_trait;
use devhabit_core::{DevHabitResult, Habit, HabitId, Interface, PaginationResult, UserId};

/// Habit service trait.
///
/// Sort and field selectors are checked against the representation of the
/// requested `version` before any repository call.
#[async_trait]
pub trait HabitService: Interface + Send + Sync {
    /// Returns one page of the user's habits.
    async fn get_habits(
        &self,
        user_id: &UserId,
        query: &HabitsQuery,
        version: ApiVersion,
    ) -> DevHabitResult<PaginationResult<Habit>>;

    /// Returns a habit with the names of its tags.
    async fn get_habit(
        &self,
        user_id: &UserId,
        id: &HabitId,
        fields: Option<&str>,
        version: ApiVersion,
    ) -> DevHabitResult<(Habit, Vec<String>)>;

    /// Creates a habit.
    async fn create_habit(&self, user_id: &UserId, request: CreateHabitRequest) -> DevHabitResult<Habit>;

    /// Replaces the editable fields of a habit.
    async fn update_habit(&self, user_id: &UserId, id: &HabitId, request: UpdateHabitRequest) -> DevHabitResult<()>;

    /// Applies a JSON Patch document to a habit.
    async fn patch_habit(&self, user_id: &UserId, id: &HabitId, document: PatchDocument) -> DevHabitResult<()>;

    /// Deletes a habit.
    async fn delete_habit(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<()>;
}
