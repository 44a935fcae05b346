//! GitHub integration controller.

use crate::{
    extractors::{CurrentUser, Links, MediaType, ValidatedJson},
    links::{actions, methods},
    responses::{negotiated, no_content, ApiResult},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, routing::{get, put}, Router};
use devhabit_core::{rel, DevHabitResult, LinkDto, ProblemDetails};
use devhabit_service::{GitHubEventDto, GitHubUserProfileDto, StoreGitHubAccessTokenRequest};
use tracing::debug;

/// Creates the GitHub router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/personal-access-token",
            put(store_access_token).delete(revoke_access_token),
        )
        .route("/profile", get(get_user_profile))
        .route("/events", get(get_user_events))
}

/// Store an encrypted personal access token for the caller.
#[utoipa::path(
    put,
    path = "/github/personal-access-token",
    tag = "github",
    request_body = StoreGitHubAccessTokenRequest,
    responses(
        (status = 204, description = "Token stored"),
        (status = 400, description = "Validation failed", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn store_access_token(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(request): ValidatedJson<StoreGitHubAccessTokenRequest>,
) -> ApiResult<StatusCode> {
    debug!("Store GitHub token request for: {}", user.user_id);

    state.github_token_service.store(&user.user_id, request).await?;
    Ok(no_content())
}

/// Remove the caller's stored token.
#[utoipa::path(
    delete,
    path = "/github/personal-access-token",
    tag = "github",
    responses((status = 204, description = "Token revoked")),
    security(("bearer_auth" = []))
)]
pub async fn revoke_access_token(State(state): State<AppState>, user: CurrentUser) -> ApiResult<StatusCode> {
    debug!("Revoke GitHub token request for: {}", user.user_id);

    state.github_token_service.revoke(&user.user_id).await?;
    Ok(no_content())
}

/// Profile of the GitHub account behind the stored token.
#[utoipa::path(
    get,
    path = "/github/profile",
    tag = "github",
    responses(
        (status = 200, description = "GitHub profile", body = GitHubUserProfileDto),
        (status = 404, description = "No stored token or no profile", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    media: MediaType,
    links: Links,
) -> ApiResult {
    let mut profile = state.github_service.profile(&user.user_id).await?;
    if media.include_links {
        profile.links = Some(profile_links(&links)?);
    }

    Ok(negotiated(&media, StatusCode::OK, &profile))
}

/// Public events of the GitHub account behind the stored token.
#[utoipa::path(
    get,
    path = "/github/events",
    tag = "github",
    responses(
        (status = 200, description = "GitHub events", body = Vec<GitHubEventDto>),
        (status = 404, description = "No stored token or no profile", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_events(
    State(state): State<AppState>,
    user: CurrentUser,
    media: MediaType,
) -> ApiResult {
    let events = state.github_service.events(&user.user_id).await?;
    Ok(negotiated(&media, StatusCode::OK, &events))
}

fn profile_links(links: &Links) -> DevHabitResult<Vec<LinkDto>> {
    Ok(vec![
        links.create(actions::GET_USER_PROFILE, rel::SELF, methods::GET, &[])?,
        links.create(actions::STORE_ACCESS_TOKEN, rel::STORE_TOKEN, methods::PUT, &[])?,
        links.create(actions::REVOKE_ACCESS_TOKEN, rel::REVOKE_TOKEN, methods::DELETE, &[])?,
    ])
}
