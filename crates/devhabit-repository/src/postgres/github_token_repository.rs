//! PostgreSQL GitHub access token repository implementation.

use crate::{traits::GitHubAccessTokenRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devhabit_core::{DevHabitResult, GitHubAccessToken, GitHubAccessTokenId, UserId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL GitHub access token repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = GitHubAccessTokenRepository)]
pub struct PgGitHubAccessTokenRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgGitHubAccessTokenRepository {
    /// Creates a new PostgreSQL GitHub token repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GitHubAccessTokenRow {
    id: String,
    user_id: String,
    token: String,
    expires_at_utc: DateTime<Utc>,
    created_at_utc: DateTime<Utc>,
}

impl From<GitHubAccessTokenRow> for GitHubAccessToken {
    fn from(row: GitHubAccessTokenRow) -> Self {
        GitHubAccessToken {
            id: GitHubAccessTokenId::from(row.id),
            user_id: UserId::from(row.user_id),
            token: row.token,
            expires_at_utc: row.expires_at_utc,
            created_at_utc: row.created_at_utc,
        }
    }
}

#[async_trait]
impl GitHubAccessTokenRepository for PgGitHubAccessTokenRepository {
    async fn find_by_user(&self, user_id: &UserId) -> DevHabitResult<Option<GitHubAccessToken>> {
        let row = sqlx::query_as::<_, GitHubAccessTokenRow>(
            "SELECT id, user_id, token, expires_at_utc, created_at_utc FROM github_access_tokens WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(GitHubAccessToken::from))
    }

    async fn upsert(&self, token: &GitHubAccessToken) -> DevHabitResult<()> {
        debug!("Storing GitHub access token for user {}", token.user_id);

        sqlx::query(
            r#"
            INSERT INTO github_access_tokens (id, user_id, token, expires_at_utc, created_at_utc)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET token = EXCLUDED.token, expires_at_utc = EXCLUDED.expires_at_utc
            "#,
        )
        .bind(token.id.as_str())
        .bind(token.user_id.as_str())
        .bind(&token.token)
        .bind(token.expires_at_utc)
        .bind(token.created_at_utc)
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }

    async fn delete_by_user(&self, user_id: &UserId) -> DevHabitResult<bool> {
        let result = sqlx::query("DELETE FROM github_access_tokens WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for PgGitHubAccessTokenRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgGitHubAccessTokenRepository").finish_non_exhaustive()
    }
}
