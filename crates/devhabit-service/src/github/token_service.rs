//! Encrypted storage of GitHub personal access tokens.

use crate::dto::StoreGitHubAccessTokenRequest;
use async_trait::async_trait;
use devhabit_core::{DevHabitResult, GitHubAccessToken, Interface, UserId, ValidateExt};
use devhabit_repository::GitHubAccessTokenRepository;
use devhabit_security::EncryptionServiceInterface;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Stores, reads and revokes the GitHub token of a user.
#[async_trait]
pub trait GitHubAccessTokenService: Interface + Send + Sync {
    /// Encrypts and stores the token, replacing a previous one.
    async fn store(&self, user_id: &UserId, request: StoreGitHubAccessTokenRequest) -> DevHabitResult<()>;

    /// Returns the decrypted token, `None` when nothing is stored.
    async fn get(&self, user_id: &UserId) -> DevHabitResult<Option<String>>;

    /// Removes the stored token. Revoking a missing token is not an error.
    async fn revoke(&self, user_id: &UserId) -> DevHabitResult<()>;
}

/// GitHub token service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = GitHubAccessTokenService)]
pub struct GitHubAccessTokenServiceComponent {
    #[shaku(inject)]
    token_repository: Arc<dyn GitHubAccessTokenRepository>,
    #[shaku(inject)]
    encryption: Arc<dyn EncryptionServiceInterface>,
}

impl GitHubAccessTokenServiceComponent {
    #[must_use]
    pub fn new(
        token_repository: Arc<dyn GitHubAccessTokenRepository>,
        encryption: Arc<dyn EncryptionServiceInterface>,
    ) -> Self {
        Self {
            token_repository,
            encryption,
        }
    }
}

#[async_trait]
impl GitHubAccessTokenService for GitHubAccessTokenServiceComponent {
    async fn store(&self, user_id: &UserId, request: StoreGitHubAccessTokenRequest) -> DevHabitResult<()> {
        debug!("Storing GitHub token for user {}", user_id);

        request.validate_request()?;

        let encrypted = self.encryption.encrypt(&request.access_token)?;
        let token = match self.token_repository.find_by_user(user_id).await? {
            Some(mut existing) => {
                existing.replace(encrypted, request.expires_in_days);
                existing
            }
            None => GitHubAccessToken::new(user_id.clone(), encrypted, request.expires_in_days),
        };
        self.token_repository.upsert(&token).await?;

        info!("GitHub token stored for user {}", user_id);
        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> DevHabitResult<Option<String>> {
        debug!("Reading GitHub token of user {}", user_id);

        match self.token_repository.find_by_user(user_id).await? {
            Some(token) => self.encryption.decrypt(&token.token).map(Some),
            None => Ok(None),
        }
    }

    async fn revoke(&self, user_id: &UserId) -> DevHabitResult<()> {
        debug!("Revoking GitHub token of user {}", user_id);

        if self.token_repository.delete_by_user(user_id).await? {
            info!("GitHub token revoked for user {}", user_id);
        }
        Ok(())
    }
}

impl std::fmt::Debug for GitHubAccessTokenServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAccessTokenServiceComponent").finish_non_exhaustive()
    }
}
