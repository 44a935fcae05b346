//! PostgreSQL tag repository implementation.

use crate::{traits::TagRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devhabit_core::{DevHabitError, DevHabitResult, SortPlan, Tag, TagId, UserId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL tag repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = TagRepository)]
pub struct PgTagRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgTagRepository {
    /// Creates a new PostgreSQL tag repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TagRow {
    id: String,
    user_id: String,
    name: String,
    description: Option<String>,
    created_at_utc: DateTime<Utc>,
    updated_at_utc: Option<DateTime<Utc>>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: TagId::from(row.id),
            user_id: UserId::from(row.user_id),
            name: row.name,
            description: row.description,
            created_at_utc: row.created_at_utc,
            updated_at_utc: row.updated_at_utc,
        }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn find_all(&self, user_id: &UserId, order: &SortPlan) -> DevHabitResult<Vec<Tag>> {
        debug!("Finding tags for user {} order=[{}]", user_id, order.to_sql());

        let rows = sqlx::query_as::<_, TagRow>(&format!(
            "SELECT id, user_id, name, description, created_at_utc, updated_at_utc \
             FROM tags WHERE user_id = $1 ORDER BY {}",
            order.to_sql()
        ))
        .bind(user_id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_by_id(&self, user_id: &UserId, id: &TagId) -> DevHabitResult<Option<Tag>> {
        debug!("Finding tag by id: {}", id);

        let row = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, user_id, name, description, created_at_utc, updated_at_utc
            FROM tags
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Tag::from))
    }

    async fn exists_by_name(&self, user_id: &UserId, name: &str) -> DevHabitResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE user_id = $1 AND name = $2)")
            .bind(user_id.as_str())
            .bind(name)
            .fetch_one(self.pool.inner())
            .await?;

        Ok(exists)
    }

    async fn existing_ids(&self, user_id: &UserId, ids: &[TagId]) -> DevHabitResult<Vec<TagId>> {
        let ids: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();

        let found: Vec<String> = sqlx::query_scalar("SELECT id FROM tags WHERE user_id = $1 AND id = ANY($2)")
            .bind(user_id.as_str())
            .bind(&ids)
            .fetch_all(self.pool.inner())
            .await?;

        Ok(found.into_iter().map(TagId::from).collect())
    }

    async fn insert(&self, tag: &Tag) -> DevHabitResult<()> {
        debug!("Inserting tag: {}", tag.id);

        sqlx::query(
            r#"
            INSERT INTO tags (id, user_id, name, description, created_at_utc, updated_at_utc)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(tag.id.as_str())
        .bind(tag.user_id.as_str())
        .bind(&tag.name)
        .bind(&tag.description)
        .bind(tag.created_at_utc)
        .bind(tag.updated_at_utc)
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }

    async fn update(&self, tag: &Tag) -> DevHabitResult<()> {
        debug!("Updating tag: {}", tag.id);

        let result = sqlx::query(
            r#"
            UPDATE tags
            SET name = $3, description = $4, updated_at_utc = $5
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(tag.id.as_str())
        .bind(tag.user_id.as_str())
        .bind(&tag.name)
        .bind(&tag.description)
        .bind(tag.updated_at_utc)
        .execute(self.pool.inner())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DevHabitError::not_found("Tag", &tag.id));
        }
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, id: &TagId) -> DevHabitResult<bool> {
        debug!("Deleting tag: {}", id);

        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
            .bind(id.as_str())
            .bind(user_id.as_str())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for PgTagRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgTagRepository").finish_non_exhaustive()
    }
}
