//! GitHub profile and activity of the current user.

use super::{GitHubAccessTokenService, GitHubApi};
use crate::dto::{GitHubEventDto, GitHubUserProfileDto};
use async_trait::async_trait;
use devhabit_core::{DevHabitError, DevHabitResult, Interface, UserId};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// Reads GitHub data with the user's stored token.
#[async_trait]
pub trait GitHubService: Interface + Send + Sync {
    /// Profile of the linked GitHub account.
    async fn profile(&self, user_id: &UserId) -> DevHabitResult<GitHubUserProfileDto>;

    /// Public events of the linked GitHub account.
    async fn events(&self, user_id: &UserId) -> DevHabitResult<Vec<GitHubEventDto>>;
}

/// GitHub service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = GitHubService)]
pub struct GitHubServiceComponent {
    #[shaku(inject)]
    tokens: Arc<dyn GitHubAccessTokenService>,
    #[shaku(inject)]
    api: Arc<dyn GitHubApi>,
}

impl GitHubServiceComponent {
    #[must_use]
    pub fn new(tokens: Arc<dyn GitHubAccessTokenService>, api: Arc<dyn GitHubApi>) -> Self {
        Self { tokens, api }
    }

    async fn token(&self, user_id: &UserId) -> DevHabitResult<String> {
        self.tokens
            .get(user_id)
            .await?
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DevHabitError::missing("No GitHub access token is stored for the user."))
    }

    async fn profile_with(&self, token: &str) -> DevHabitResult<GitHubUserProfileDto> {
        self.api
            .user_profile(token)
            .await?
            .ok_or_else(|| DevHabitError::missing("GitHub user profile not found."))
    }
}

#[async_trait]
impl GitHubService for GitHubServiceComponent {
    async fn profile(&self, user_id: &UserId) -> DevHabitResult<GitHubUserProfileDto> {
        debug!("Getting GitHub profile of user {}", user_id);

        let token = self.token(user_id).await?;
        self.profile_with(&token).await
    }

    async fn events(&self, user_id: &UserId) -> DevHabitResult<Vec<GitHubEventDto>> {
        debug!("Getting GitHub events of user {}", user_id);

        let token = self.token(user_id).await?;
        let profile = self.profile_with(&token).await?;
        self.api.user_events(&profile.login, &token).await
    }
}

impl std::fmt::Debug for GitHubServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::StoreGitHubAccessTokenRequest;
    use parking_lot::Mutex;

    /// Token store holding at most one token.
    #[derive(Default)]
    struct StubTokens(Option<String>);

    #[async_trait]
    impl GitHubAccessTokenService for StubTokens {
        async fn store(&self, _: &UserId, _: StoreGitHubAccessTokenRequest) -> DevHabitResult<()> {
            Ok(())
        }

        async fn get(&self, _: &UserId) -> DevHabitResult<Option<String>> {
            Ok(self.0.clone())
        }

        async fn revoke(&self, _: &UserId) -> DevHabitResult<()> {
            Ok(())
        }
    }

    /// GitHub API answering with a fixed profile and recording event lookups.
    #[derive(Default)]
    struct StubApi {
        profile: Option<GitHubUserProfileDto>,
        event_logins: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GitHubApi for StubApi {
        async fn user_profile(&self, _: &str) -> DevHabitResult<Option<GitHubUserProfileDto>> {
            Ok(self.profile.clone())
        }

        async fn user_events(&self, login: &str, _: &str) -> DevHabitResult<Vec<GitHubEventDto>> {
            self.event_logins.lock().push(login.to_string());
            Ok(Vec::new())
        }
    }

    fn octocat() -> GitHubUserProfileDto {
        serde_json::from_value(serde_json::json!({"login": "octocat", "id": 1})).unwrap()
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let service = GitHubServiceComponent::new(Arc::new(StubTokens(None)), Arc::new(StubApi::default()));
        let err = service.profile(&UserId::from("u_1")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_profile_not_found_on_github() {
        let service = GitHubServiceComponent::new(
            Arc::new(StubTokens(Some("ghp".to_string()))),
            Arc::new(StubApi::default()),
        );
        let err = service.profile(&UserId::from("u_1")).await.unwrap_err();
        assert_eq!(err.to_string(), "GitHub user profile not found.");
    }

    #[tokio::test]
    async fn test_events_use_profile_login() {
        let api = Arc::new(StubApi {
            profile: Some(octocat()),
            event_logins: Mutex::new(Vec::new()),
        });
        let service = GitHubServiceComponent::new(Arc::new(StubTokens(Some("ghp".to_string()))), api.clone());

        service.events(&UserId::from("u_1")).await.unwrap();
        assert_eq!(*api.event_logins.lock(), vec!["octocat".to_string()]);
    }
}
