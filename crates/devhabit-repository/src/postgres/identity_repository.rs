//! PostgreSQL identity repository implementation.
//!
//! Identity accounts live apart from application users; registration writes
//! both in one transaction so neither can exist without the other.

use crate::{traits::IdentityRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use devhabit_core::{DevHabitResult, IdentityUser, RefreshToken, Role, User};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const IDENTITY_SELECT: &str = r#"
    SELECT u.id, u.email, u.password_hash, u.created_at_utc,
           COALESCE(ARRAY_AGG(r.role_name::TEXT) FILTER (WHERE r.role_name IS NOT NULL), ARRAY[]::TEXT[]) AS roles
    FROM identity_users u
    LEFT JOIN identity_user_roles r ON r.identity_id = u.id
"#;

/// PostgreSQL identity repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = IdentityRepository)]
pub struct PgIdentityRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgIdentityRepository {
    /// Creates a new PostgreSQL identity repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: String,
    email: String,
    password_hash: String,
    created_at_utc: DateTime<Utc>,
    roles: Vec<String>,
}

impl From<IdentityRow> for IdentityUser {
    fn from(row: IdentityRow) -> Self {
        let roles = row
            .roles
            .iter()
            .filter_map(|name| {
                let role = Role::parse(name);
                if role.is_none() {
                    warn!("Ignoring unknown role '{}' of identity {}", name, row.id);
                }
                role
            })
            .collect();

        IdentityUser {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            roles,
            created_at_utc: row.created_at_utc,
        }
    }
}

#[derive(Debug, FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    identity_id: String,
    token: String,
    expires_at_utc: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshToken {
    fn from(row: RefreshTokenRow) -> Self {
        RefreshToken {
            id: row.id,
            identity_id: row.identity_id,
            token: row.token,
            expires_at_utc: row.expires_at_utc,
        }
    }
}

#[async_trait]
impl IdentityRepository for PgIdentityRepository {
    async fn find_by_email(&self, email: &str) -> DevHabitResult<Option<IdentityUser>> {
        debug!("Finding identity by email: {}", email);

        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "{} WHERE LOWER(u.email) = LOWER($1) GROUP BY u.id",
            IDENTITY_SELECT
        ))
        .bind(email)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(IdentityUser::from))
    }

    async fn find_by_id(&self, id: &str) -> DevHabitResult<Option<IdentityUser>> {
        debug!("Finding identity by id: {}", id);

        let row = sqlx::query_as::<_, IdentityRow>(&format!("{} WHERE u.id = $1 GROUP BY u.id", IDENTITY_SELECT))
            .bind(id)
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(IdentityUser::from))
    }

    async fn register(
        &self,
        identity: &IdentityUser,
        user: &User,
        refresh_token: Option<&RefreshToken>,
    ) -> DevHabitResult<()> {
        debug!("Registering identity {} for user {}", identity.id, user.id);

        let mut tx = self.pool.inner().begin().await?;

        sqlx::query("INSERT INTO identity_users (id, email, password_hash, created_at_utc) VALUES ($1, $2, $3, $4)")
            .bind(&identity.id)
            .bind(&identity.email)
            .bind(&identity.password_hash)
            .bind(identity.created_at_utc)
            .execute(&mut *tx)
            .await?;

        for role in &identity.roles {
            sqlx::query("INSERT INTO identity_user_roles (identity_id, role_name) VALUES ($1, $2)")
                .bind(&identity.id)
                .bind(role.as_str())
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, identity_id, created_at_utc, updated_at_utc)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.identity_id)
        .bind(user.created_at_utc)
        .bind(user.updated_at_utc)
        .execute(&mut *tx)
        .await?;

        if let Some(token) = refresh_token {
            sqlx::query("INSERT INTO refresh_tokens (id, identity_id, token, expires_at_utc) VALUES ($1, $2, $3, $4)")
                .bind(token.id)
                .bind(&token.identity_id)
                .bind(&token.token)
                .bind(token.expires_at_utc)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Identity registered: {}", identity.id);
        Ok(())
    }

    async fn ensure_roles(&self) -> DevHabitResult<()> {
        for role in Role::all() {
            sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT DO NOTHING")
                .bind(role.as_str())
                .execute(self.pool.inner())
                .await?;
        }
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> DevHabitResult<Option<RefreshToken>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT id, identity_id, token, expires_at_utc FROM refresh_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(RefreshToken::from))
    }

    async fn save_refresh_token(&self, token: &RefreshToken) -> DevHabitResult<()> {
        debug!("Saving refresh token {} for identity {}", token.id, token.identity_id);

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, identity_id, token, expires_at_utc)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET token = EXCLUDED.token, expires_at_utc = EXCLUDED.expires_at_utc
            "#,
        )
        .bind(token.id)
        .bind(&token.identity_id)
        .bind(&token.token)
        .bind(token.expires_at_utc)
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }
}

impl std::fmt::Debug for PgIdentityRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgIdentityRepository").finish_non_exhaustive()
    }
}
