//! Habit tags controller, mounted under `/habits`.

use crate::{
    extractors::{CurrentUser, ValidatedJson},
    responses::{no_content, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, put},
    Router,
};
use devhabit_core::{HabitId, ProblemDetails, TagId};
use devhabit_service::{UpsertHabitTagsRequest, UpsertOutcome};
use tracing::debug;

/// Creates the habit tags router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/tags", put(upsert_habit_tags))
        .route("/:id/tags/:tag_id", delete(delete_habit_tag))
}

/// Replace the tags linked to a habit.
#[utoipa::path(
    put,
    path = "/habits/{habitId}/tags",
    tag = "habit-tags",
    params(("habitId" = String, Path, description = "Habit id")),
    request_body = UpsertHabitTagsRequest,
    responses(
        (status = 200, description = "Tags replaced"),
        (status = 204, description = "Tags already matched the request"),
        (status = 400, description = "Unknown tag ids", body = ProblemDetails),
        (status = 404, description = "Habit not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert_habit_tags(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(habit_id): Path<HabitId>,
    ValidatedJson(request): ValidatedJson<UpsertHabitTagsRequest>,
) -> ApiResult<StatusCode> {
    debug!("Upsert habit tags request: {} ({} tags)", habit_id, request.tag_ids.len());

    let outcome = state
        .habit_tag_service
        .upsert_habit_tags(&user.user_id, &habit_id, request)
        .await?;

    Ok(match outcome {
        UpsertOutcome::Updated => StatusCode::OK,
        UpsertOutcome::Unchanged => no_content(),
    })
}

/// Unlink one tag from a habit.
#[utoipa::path(
    delete,
    path = "/habits/{habitId}/tags/{tagId}",
    tag = "habit-tags",
    params(
        ("habitId" = String, Path, description = "Habit id"),
        ("tagId" = String, Path, description = "Tag id")
    ),
    responses(
        (status = 204, description = "Tag unlinked"),
        (status = 404, description = "Link not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_habit_tag(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((habit_id, tag_id)): Path<(HabitId, TagId)>,
) -> ApiResult<StatusCode> {
    debug!("Delete habit tag request: {} / {}", habit_id, tag_id);

    state
        .habit_tag_service
        .delete_habit_tag(&user.user_id, &habit_id, &tag_id)
        .await?;
    Ok(no_content())
}
