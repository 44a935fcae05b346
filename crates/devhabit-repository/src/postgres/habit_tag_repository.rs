//! PostgreSQL habit tag link repository implementation.

use crate::{traits::HabitTagRepository, DatabasePoolInterface};
use async_trait::async_trait;
use devhabit_core::{DevHabitResult, HabitId, HabitTag, TagId};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// PostgreSQL habit tag link repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = HabitTagRepository)]
pub struct PgHabitTagRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgHabitTagRepository {
    /// Creates a new PostgreSQL habit tag repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HabitTagRepository for PgHabitTagRepository {
    async fn tag_ids(&self, habit_id: &HabitId) -> DevHabitResult<Vec<TagId>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT tag_id FROM habit_tags WHERE habit_id = $1")
            .bind(habit_id.as_str())
            .fetch_all(self.pool.inner())
            .await?;

        Ok(ids.into_iter().map(TagId::from).collect())
    }

    async fn replace(&self, habit_id: &HabitId, remove: &[TagId], add: &[HabitTag]) -> DevHabitResult<()> {
        debug!(
            "Replacing tags of habit {}: -{} +{}",
            habit_id,
            remove.len(),
            add.len()
        );

        let mut tx = self.pool.inner().begin().await?;

        if !remove.is_empty() {
            let remove: Vec<String> = remove.iter().map(|id| id.as_str().to_string()).collect();
            sqlx::query("DELETE FROM habit_tags WHERE habit_id = $1 AND tag_id = ANY($2)")
                .bind(habit_id.as_str())
                .bind(&remove)
                .execute(&mut *tx)
                .await?;
        }

        for link in add {
            sqlx::query("INSERT INTO habit_tags (habit_id, tag_id, created_at_utc) VALUES ($1, $2, $3)")
                .bind(link.habit_id.as_str())
                .bind(link.tag_id.as_str())
                .bind(link.created_at_utc)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Tags of habit {} replaced", habit_id);
        Ok(())
    }

    async fn delete(&self, habit_id: &HabitId, tag_id: &TagId) -> DevHabitResult<bool> {
        let result = sqlx::query("DELETE FROM habit_tags WHERE habit_id = $1 AND tag_id = $2")
            .bind(habit_id.as_str())
            .bind(tag_id.as_str())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for PgHabitTagRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgHabitTagRepository").finish_non_exhaustive()
    }
}
