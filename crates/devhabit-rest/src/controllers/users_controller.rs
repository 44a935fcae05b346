//! Users controller.

use crate::{
    extractors::{AuthenticatedUser, Links, MediaType},
    links::{actions, methods},
    responses::{negotiated, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use devhabit_core::{rel, DevHabitResult, LinkDto, ProblemDetails, Role, User, UserId};
use devhabit_security::ClaimsExt;
use devhabit_service::UserDto;
use tracing::debug;

/// Creates the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/:id", get(get_user_by_id))
}

/// Get a user by id, callers may only read themselves.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserDto),
        (status = 401, description = "Not authenticated", body = ProblemDetails),
        (status = 403, description = "Not the caller", body = ProblemDetails),
        (status = 404, description = "User not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    claims: AuthenticatedUser,
    media: MediaType,
    links: Links,
    Path(id): Path<UserId>,
) -> ApiResult {
    debug!("Get user request: {}", id);
    claims.require_role(Role::Admin)?;

    let caller = state.user_context.user_id(claims.identity_id()).await?;
    let user = state.user_service.get_user(caller.as_ref(), &id).await?;

    respond(&media, &links, &user)
}

/// Get the authenticated user.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Not authenticated", body = ProblemDetails),
        (status = 404, description = "Current user not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    claims: AuthenticatedUser,
    media: MediaType,
    links: Links,
) -> ApiResult {
    claims.require_role(Role::Member)?;

    let caller = state.user_context.user_id(claims.identity_id()).await?;
    let user = state.user_service.get_current_user(caller.as_ref()).await?;

    respond(&media, &links, &user)
}

fn respond(media: &MediaType, links: &Links, user: &User) -> ApiResult {
    let mut dto = UserDto::from(user);
    if media.include_links {
        dto = dto.with_links(vec![user_link(links, &user.id)?]);
    }
    Ok(negotiated(media, StatusCode::OK, &dto))
}

fn user_link(links: &Links, id: &UserId) -> DevHabitResult<LinkDto> {
    links.create(
        actions::GET_USER_BY_ID,
        rel::SELF,
        methods::GET,
        &[("id", Some(id.to_string()))],
    )
}
