//! Minimal GitHub REST API client.

use crate::dto::{GitHubEventDto, GitHubUserProfileDto};
use async_trait::async_trait;
use devhabit_config::GitHubConfig;
use devhabit_core::{DevHabitError, DevHabitResult, Interface};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use shaku::Component;
use std::time::Duration;
use tracing::{debug, warn};

/// Media type requested from the GitHub API.
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Page size of the events feed.
pub const EVENTS_PER_PAGE: u32 = 100;

/// Read access to the GitHub API on behalf of a token holder.
///
/// Unsuccessful responses are not errors: they yield `None` or an empty list.
#[async_trait]
pub trait GitHubApi: Interface + Send + Sync {
    /// Profile of the token owner.
    async fn user_profile(&self, access_token: &str) -> DevHabitResult<Option<GitHubUserProfileDto>>;

    /// Public events of `login`.
    async fn user_events(&self, login: &str, access_token: &str) -> DevHabitResult<Vec<GitHubEventDto>>;
}

/// `reqwest` based GitHub client.
#[derive(Component)]
#[shaku(interface = GitHubApi)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Creates a client from configuration.
    pub fn new(config: &GitHubConfig) -> DevHabitResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| DevHabitError::Configuration(format!("Invalid GitHub user agent: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DevHabitError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url))
    }

    /// Creates a client over a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the parts needed to build the DI parameters.
    #[must_use]
    pub fn into_parts(self) -> (Client, String) {
        (self.client, self.base_url)
    }

    fn get(&self, path: &str, access_token: &str) -> RequestBuilder {
        self.client
            .get(format!("{}/{}", self.base_url, path))
            .bearer_auth(access_token)
    }
}

fn external(error: reqwest::Error) -> DevHabitError {
    DevHabitError::ExternalService {
        service: "github".to_string(),
        message: error.to_string(),
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn user_profile(&self, access_token: &str) -> DevHabitResult<Option<GitHubUserProfileDto>> {
        debug!("Fetching GitHub user profile");

        let response = self.get("user", access_token).send().await.map_err(external)?;
        if !response.status().is_success() {
            warn!("Failed to fetch GitHub user profile. Status code: {}", response.status());
            return Ok(None);
        }

        response.json().await.map(Some).map_err(external)
    }

    async fn user_events(&self, login: &str, access_token: &str) -> DevHabitResult<Vec<GitHubEventDto>> {
        if login.trim().is_empty() {
            return Err(DevHabitError::validation("GitHub login must not be empty"));
        }
        debug!("Fetching GitHub events of {}", login);

        let path = format!("users/{login}/events?per_page={EVENTS_PER_PAGE}");
        let response = self.get(&path, access_token).send().await.map_err(external)?;
        if !response.status().is_success() {
            warn!("Failed to fetch GitHub user events. Status code: {}", response.status());
            return Ok(Vec::new());
        }

        response.json().await.map_err(external)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
