//! Habit tag service implementation.

use crate::dto::{UpsertHabitTagsRequest, UpsertOutcome};
use crate::habit_tag_service::HabitTagService;
use async_trait::async_trait;
use devhabit_core::{DevHabitError, DevHabitResult, HabitId, HabitTag, TagId, UserId};
use devhabit_repository::{HabitRepository, HabitTagRepository, TagRepository};
use shaku::Component;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Habit tag service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = HabitTagService)]
pub struct HabitTagServiceComponent {
    #[shaku(inject)]
    habit_repository: Arc<dyn HabitRepository>,
    #[shaku(inject)]
    tag_repository: Arc<dyn TagRepository>,
    #[shaku(inject)]
    habit_tag_repository: Arc<dyn HabitTagRepository>,
}

impl HabitTagServiceComponent {
    /// Creates the service outside of the DI container.
    #[must_use]
    pub fn new(
        habit_repository: Arc<dyn HabitRepository>,
        tag_repository: Arc<dyn TagRepository>,
        habit_tag_repository: Arc<dyn HabitTagRepository>,
    ) -> Self {
        Self {
            habit_repository,
            tag_repository,
            habit_tag_repository,
        }
    }

    async fn ensure_habit(&self, user_id: &UserId, habit_id: &HabitId) -> DevHabitResult<()> {
        match self.habit_repository.find_by_id(user_id, habit_id).await? {
            Some(_) => Ok(()),
            None => Err(DevHabitError::not_found("Habit", habit_id)),
        }
    }
}

#[async_trait]
impl HabitTagService for HabitTagServiceComponent {
    async fn upsert_habit_tags(
        &self,
        user_id: &UserId,
        habit_id: &HabitId,
        request: UpsertHabitTagsRequest,
    ) -> DevHabitResult<UpsertOutcome> {
        debug!("Upserting tags of habit {}: {:?}", habit_id, request.tag_ids);

        self.ensure_habit(user_id, habit_id).await?;

        let requested = request.distinct_tag_ids();
        let current = self.habit_tag_repository.tag_ids(habit_id).await?;

        let requested_set: HashSet<&TagId> = requested.iter().collect();
        let current_set: HashSet<&TagId> = current.iter().collect();
        if requested_set == current_set {
            return Ok(UpsertOutcome::Unchanged);
        }

        let existing = self.tag_repository.existing_ids(user_id, &requested).await?;
        if existing.len() != requested.len() {
            return Err(DevHabitError::validation("One or more tag IDs is invalid"));
        }

        let remove: Vec<TagId> = current
            .iter()
            .filter(|id| !requested_set.contains(id))
            .cloned()
            .collect();
        let add: Vec<HabitTag> = requested
            .iter()
            .filter(|id| !current_set.contains(id))
            .map(|id| HabitTag::new(habit_id.clone(), id.clone()))
            .collect();

        self.habit_tag_repository.replace(habit_id, &remove, &add).await?;

        info!(
            "Habit {} tags updated: {} added, {} removed",
            habit_id,
            add.len(),
            remove.len()
        );
        Ok(UpsertOutcome::Updated)
    }

    async fn delete_habit_tag(&self, user_id: &UserId, habit_id: &HabitId, tag_id: &TagId) -> DevHabitResult<()> {
        debug!("Removing tag {} from habit {}", tag_id, habit_id);

        let not_found = || {
            DevHabitError::Missing(format!(
                "HabitTag with Habit ID '{}' and Tag ID '{}' not found.",
                habit_id, tag_id
            ))
        };

        if self.habit_repository.find_by_id(user_id, habit_id).await?.is_none() {
            return Err(not_found());
        }
        if !self.habit_tag_repository.delete(habit_id, tag_id).await? {
            return Err(not_found());
        }

        info!("Tag {} removed from habit {}", tag_id, habit_id);
        Ok(())
    }
}

impl std::fmt::Debug for HabitTagServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HabitTagServiceComponent").finish_non_exhaustive()
    }
}
