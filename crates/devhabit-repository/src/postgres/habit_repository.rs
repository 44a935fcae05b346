//! PostgreSQL habit repository implementation.

use crate::{traits::HabitRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use devhabit_core::{
    DevHabitError, DevHabitResult, Frequency, FrequencyType, Habit, HabitFilter, HabitId, HabitStatus, HabitType,
    Milestone, PageRequest, SortPlan, Target, UserId,
};
use shaku::Component;
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const HABIT_COLUMNS: &str = "id, user_id, name, description, type, frequency_type, frequency_times_per_period, \
     target_value, target_unit, status, is_archived, end_date, milestone_target, milestone_current, \
     created_at_utc, updated_at_utc, last_completed_at_utc";

/// PostgreSQL habit repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = HabitRepository)]
pub struct PgHabitRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgHabitRepository {
    /// Creates a new PostgreSQL habit repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a habit.
#[derive(Debug, FromRow)]
struct HabitRow {
    id: String,
    user_id: String,
    name: String,
    description: Option<String>,
    #[sqlx(rename = "type")]
    habit_type: i16,
    frequency_type: i16,
    frequency_times_per_period: i32,
    target_value: i32,
    target_unit: String,
    status: i16,
    is_archived: bool,
    end_date: Option<NaiveDate>,
    milestone_target: Option<i32>,
    milestone_current: Option<i32>,
    created_at_utc: DateTime<Utc>,
    updated_at_utc: Option<DateTime<Utc>>,
    last_completed_at_utc: Option<DateTime<Utc>>,
}

impl TryFrom<HabitRow> for Habit {
    type Error = DevHabitError;

    fn try_from(row: HabitRow) -> Result<Self, Self::Error> {
        let corrupt = |e: DevHabitError| DevHabitError::Internal(format!("Invalid habit row '{}': {}", row.id, e));

        let habit_type = HabitType::try_from(row.habit_type).map_err(corrupt)?;
        let frequency_type = FrequencyType::try_from(row.frequency_type).map_err(corrupt)?;
        let status = HabitStatus::try_from(row.status).map_err(corrupt)?;

        let milestone = match (row.milestone_target, row.milestone_current) {
            (Some(target), current) => Some(Milestone {
                target,
                current: current.unwrap_or_default(),
            }),
            (None, _) => None,
        };

        Ok(Habit {
            id: HabitId::from(row.id),
            user_id: UserId::from(row.user_id),
            name: row.name,
            description: row.description,
            habit_type,
            frequency: Frequency {
                frequency_type,
                times_per_period: row.frequency_times_per_period,
            },
            target: Target {
                value: row.target_value,
                unit: row.target_unit,
            },
            status,
            is_archived: row.is_archived,
            end_date: row.end_date,
            milestone,
            created_at_utc: row.created_at_utc,
            updated_at_utc: row.updated_at_utc,
            last_completed_at_utc: row.last_completed_at_utc,
        })
    }
}

/// Escapes `LIKE` wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, user_id: &UserId, filter: &HabitFilter) {
    builder.push(" WHERE user_id = ").push_bind(user_id.as_str().to_string());

    if let Some(term) = filter.search_term() {
        let pattern = like_pattern(&term);
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(habit_type) = filter.habit_type {
        builder.push(" AND type = ").push_bind(habit_type.value());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.value());
    }
}

#[async_trait]
impl HabitRepository for PgHabitRepository {
    async fn find_page(
        &self,
        user_id: &UserId,
        filter: &HabitFilter,
        order: &SortPlan,
        page: PageRequest,
    ) -> DevHabitResult<(Vec<Habit>, u64)> {
        debug!(
            "Finding habits for user {} page={} size={} order=[{}]",
            user_id,
            page.page,
            page.page_size,
            order.to_sql()
        );

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM habits");
        push_filter(&mut count, user_id, filter);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool.inner()).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM habits", HABIT_COLUMNS));
        push_filter(&mut select, user_id, filter);
        select
            .push(" ORDER BY ")
            .push(order.to_sql())
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<HabitRow> = select.build_query_as().fetch_all(self.pool.inner()).await?;
        let habits = rows.into_iter().map(Habit::try_from).collect::<DevHabitResult<Vec<_>>>()?;

        Ok((habits, u64::try_from(total).unwrap_or_default()))
    }

    async fn find_by_id(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<Option<Habit>> {
        debug!("Finding habit by id: {}", id);

        let row = sqlx::query_as::<_, HabitRow>(&format!(
            "SELECT {} FROM habits WHERE id = $1 AND user_id = $2",
            HABIT_COLUMNS
        ))
        .bind(id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Habit::try_from).transpose()
    }

    async fn find_with_tags(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<Option<(Habit, Vec<String>)>> {
        let Some(habit) = self.find_by_id(user_id, id).await? else {
            return Ok(None);
        };

        let tags: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT t.name
            FROM tags t
            JOIN habit_tags ht ON ht.tag_id = t.id
            WHERE ht.habit_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(id.as_str())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(Some((habit, tags)))
    }

    async fn insert(&self, habit: &Habit) -> DevHabitResult<()> {
        debug!("Inserting habit: {}", habit.id);

        sqlx::query(&format!(
            "INSERT INTO habits ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
            HABIT_COLUMNS
        ))
        .bind(habit.id.as_str())
        .bind(habit.user_id.as_str())
        .bind(&habit.name)
        .bind(&habit.description)
        .bind(habit.habit_type.value())
        .bind(habit.frequency.frequency_type.value())
        .bind(habit.frequency.times_per_period)
        .bind(habit.target.value)
        .bind(&habit.target.unit)
        .bind(habit.status.value())
        .bind(habit.is_archived)
        .bind(habit.end_date)
        .bind(habit.milestone.map(|m| m.target))
        .bind(habit.milestone.map(|m| m.current))
        .bind(habit.created_at_utc)
        .bind(habit.updated_at_utc)
        .bind(habit.last_completed_at_utc)
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }

    async fn update(&self, habit: &Habit) -> DevHabitResult<()> {
        debug!("Updating habit: {}", habit.id);

        let result = sqlx::query(
            r#"
            UPDATE habits
            SET name = $3, description = $4, type = $5, frequency_type = $6,
                frequency_times_per_period = $7, target_value = $8, target_unit = $9,
                status = $10, is_archived = $11, end_date = $12, milestone_target = $13,
                milestone_current = $14, updated_at_utc = $15, last_completed_at_utc = $16
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(habit.id.as_str())
        .bind(habit.user_id.as_str())
        .bind(&habit.name)
        .bind(&habit.description)
        .bind(habit.habit_type.value())
        .bind(habit.frequency.frequency_type.value())
        .bind(habit.frequency.times_per_period)
        .bind(habit.target.value)
        .bind(&habit.target.unit)
        .bind(habit.status.value())
        .bind(habit.is_archived)
        .bind(habit.end_date)
        .bind(habit.milestone.map(|m| m.target))
        .bind(habit.milestone.map(|m| m.current))
        .bind(habit.updated_at_utc)
        .bind(habit.last_completed_at_utc)
        .execute(self.pool.inner())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DevHabitError::not_found("Habit", &habit.id));
        }
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<bool> {
        debug!("Deleting habit: {}", id);

        let result = sqlx::query("DELETE FROM habits WHERE id = $1 AND user_id = $2")
            .bind(id.as_str())
            .bind(user_id.as_str())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, user_id: &UserId) -> DevHabitResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM habits WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

impl std::fmt::Debug for PgHabitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgHabitRepository").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("read"), "%read%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }

    #[test]
    fn test_filter_sql() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM habits");
        let filter = HabitFilter {
            search: Some(" Read ".to_string()),
            habit_type: Some(HabitType::Binary),
            status: Some(HabitStatus::Ongoing),
        };
        push_filter(&mut builder, &UserId::from("u_1"), &filter);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM habits WHERE user_id = $1 AND (name ILIKE $2 OR description ILIKE $3) \
             AND type = $4 AND status = $5"
        );
    }

    #[test]
    fn test_row_conversion() {
        let row = HabitRow {
            id: "h_1".to_string(),
            user_id: "u_1".to_string(),
            name: "Read".to_string(),
            description: None,
            habit_type: 2,
            frequency_type: 1,
            frequency_times_per_period: 1,
            target_value: 30,
            target_unit: "pages".to_string(),
            status: 1,
            is_archived: false,
            end_date: None,
            milestone_target: Some(100),
            milestone_current: None,
            created_at_utc: Utc::now(),
            updated_at_utc: None,
            last_completed_at_utc: None,
        };

        let habit = Habit::try_from(row).unwrap();
        assert_eq!(habit.habit_type, HabitType::Measurable);
        assert_eq!(habit.frequency.frequency_type, FrequencyType::Daily);
        assert_eq!(habit.milestone, Some(Milestone { target: 100, current: 0 }));
    }

    #[test]
    fn test_row_with_unknown_enum_is_rejected() {
        let row = HabitRow {
            id: "h_1".to_string(),
            user_id: "u_1".to_string(),
            name: "Read".to_string(),
            description: None,
            habit_type: 9,
            frequency_type: 1,
            frequency_times_per_period: 1,
            target_value: 30,
            target_unit: "pages".to_string(),
            status: 1,
            is_archived: false,
            end_date: None,
            milestone_target: None,
            milestone_current: None,
            created_at_utc: Utc::now(),
            updated_at_utc: None,
            last_completed_at_utc: None,
        };

        assert!(matches!(Habit::try_from(row), Err(DevHabitError::Internal(_))));
    }
}
