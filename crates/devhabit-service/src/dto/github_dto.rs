//! GitHub DTOs.
//!
//! Payloads read from the GitHub API arrive in snake case and are served back
//! in camel case.

use chrono::{DateTime, Utc};
use devhabit_core::{rules, LinkDto};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Stores a personal access token for the current user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreGitHubAccessTokenRequest {
    #[validate(custom(function = "rules::not_blank"))]
    pub access_token: String,

    #[validate(range(min = 1, max = 365, message = "Expiry must be between 1 and 365 days"))]
    pub expires_in_days: i64,
}

/// Public profile of the GitHub account behind a stored token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all(deserialize = "snake_case", serialize = "camelCase"))]
pub struct GitHubUserProfileDto {
    pub login: String,
    pub id: i64,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub public_repos: i64,
    #[serde(default)]
    pub followers: i64,
    #[serde(default)]
    pub following: i64,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDto>>,
}

/// Event of the public GitHub activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all(deserialize = "snake_case", serialize = "camelCase"))]
pub struct GitHubEventDto {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub actor: GitHubEventActorDto,
    pub repo: GitHubEventRepoDto,
    #[serde(default)]
    pub payload: GitHubEventPayloadDto,
    #[serde(default)]
    pub public: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all(deserialize = "snake_case", serialize = "camelCase"))]
pub struct GitHubEventActorDto {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub display_login: Option<String>,
    #[serde(default)]
    pub gravatar_id: Option<String>,
    pub url: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all(deserialize = "snake_case", serialize = "camelCase"))]
pub struct GitHubEventRepoDto {
    pub id: i64,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all(deserialize = "snake_case", serialize = "camelCase"))]
pub struct GitHubEventPayloadDto {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub commits: Option<Vec<GitHubCommitDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all(deserialize = "snake_case", serialize = "camelCase"))]
pub struct GitHubCommitDto {
    pub sha: String,
    pub author: GitHubCommitAuthorDto,
    pub message: String,
    #[serde(default)]
    pub distinct: bool,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GitHubCommitAuthorDto {
    pub email: String,
    pub name: String,
}
