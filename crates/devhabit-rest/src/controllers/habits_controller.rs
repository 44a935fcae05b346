//! Habits controller.

use super::attach_links;
use crate::{
    extractors::{ApiJson, ApiQuery, CurrentUser, Links, MediaType, ValidatedJson},
    links::{actions, methods},
    responses::{created, negotiated, no_content, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use devhabit_core::{
    rel, DevHabitResult, Habit, HabitId, LinkDto, PaginationResult, ProblemDetails, Shape, ShapedEntry,
};
use devhabit_service::{
    ApiVersion, CreateHabitRequest, FieldsQuery, HabitDto, HabitDtoV2, HabitWithTagsDto, HabitWithTagsDtoV2,
    HabitsQuery, PatchDocument, PatchOperation, UpdateHabitRequest,
};
use tracing::debug;

/// Creates the habits router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_habits).post(create_habit))
        .route(
            "/:id",
            get(get_habit)
                .put(update_habit)
                .patch(patch_habit)
                .delete(delete_habit),
        )
}

/// List the caller's habits.
#[utoipa::path(
    get,
    path = "/habits",
    tag = "habits",
    params(HabitsQuery),
    responses(
        (status = 200, description = "Page of shaped habits"),
        (status = 400, description = "Invalid sort, fields or media type", body = ProblemDetails),
        (status = 401, description = "Not authenticated", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_habits(
    State(state): State<AppState>,
    user: CurrentUser,
    media: MediaType,
    links: Links,
    ApiQuery(query): ApiQuery<HabitsQuery>,
) -> ApiResult {
    debug!("Get habits request: {:?}", query);

    let page = state
        .habit_service
        .get_habits(&user.user_id, &query, media.version)
        .await?;

    let items = match media.version {
        ApiVersion::V1 => shape_habits::<HabitDto>(&state, &page.items, &query, &media, &links)?,
        ApiVersion::V2 => shape_habits::<HabitDtoV2>(&state, &page.items, &query, &media, &links)?,
    };

    let mut result = page.with_items(items);
    if media.include_links {
        let collection_links = collection_links(&links, &query, &result)?;
        result = result.with_links(collection_links);
    }

    Ok(negotiated(&media, StatusCode::OK, &result))
}

/// Get a habit with its tags.
#[utoipa::path(
    get,
    path = "/habits/{id}",
    tag = "habits",
    params(("id" = String, Path, description = "Habit id"), FieldsQuery),
    responses(
        (status = 200, description = "Shaped habit", body = HabitWithTagsDto),
        (status = 404, description = "Habit not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_habit(
    State(state): State<AppState>,
    user: CurrentUser,
    media: MediaType,
    links: Links,
    Path(id): Path<HabitId>,
    ApiQuery(query): ApiQuery<FieldsQuery>,
) -> ApiResult {
    debug!("Get habit request: {}", id);

    let fields = query.fields.as_deref();
    let (habit, tags) = state
        .habit_service
        .get_habit(&user.user_id, &id, fields, media.version)
        .await?;

    let mut entry = match media.version {
        ApiVersion::V1 => state
            .data_shaping
            .shape_one(&HabitWithTagsDto::new(&habit, tags), fields)?,
        ApiVersion::V2 => state
            .data_shaping
            .shape_one(&HabitWithTagsDtoV2::new(&habit, tags), fields)?,
    };
    if media.include_links {
        attach_links(&mut entry, habit_links(&links, habit.id.as_str(), fields)?)?;
    }

    Ok(negotiated(&media, StatusCode::OK, &entry))
}

/// Create a habit.
#[utoipa::path(
    post,
    path = "/habits",
    tag = "habits",
    request_body = CreateHabitRequest,
    responses(
        (status = 201, description = "Habit created", body = HabitDto),
        (status = 400, description = "Validation failed", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_habit(
    State(state): State<AppState>,
    user: CurrentUser,
    media: MediaType,
    links: Links,
    ValidatedJson(request): ValidatedJson<CreateHabitRequest>,
) -> ApiResult {
    debug!("Create habit request: {}", request.name);

    let habit = state.habit_service.create_habit(&user.user_id, request).await?;

    let mut entry = shape_habit(&state, &habit, media.version)?;
    if media.include_links {
        attach_links(&mut entry, habit_links(&links, habit.id.as_str(), None)?)?;
    }
    let location = links.create(
        actions::GET_HABIT,
        rel::SELF,
        methods::GET,
        &[("id", Some(habit.id.to_string()))],
    )?;

    Ok(created(&media, &location, &entry))
}

/// Replace a habit.
#[utoipa::path(
    put,
    path = "/habits/{id}",
    tag = "habits",
    params(("id" = String, Path, description = "Habit id")),
    request_body = UpdateHabitRequest,
    responses(
        (status = 204, description = "Habit updated"),
        (status = 404, description = "Habit not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_habit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<HabitId>,
    ValidatedJson(request): ValidatedJson<UpdateHabitRequest>,
) -> ApiResult<StatusCode> {
    debug!("Update habit request: {}", id);

    state.habit_service.update_habit(&user.user_id, &id, request).await?;
    Ok(no_content())
}

/// Apply a JSON Patch document to a habit.
#[utoipa::path(
    patch,
    path = "/habits/{id}",
    tag = "habits",
    params(("id" = String, Path, description = "Habit id")),
    request_body(content = Vec<PatchOperation>, content_type = "application/json-patch+json"),
    responses(
        (status = 204, description = "Habit patched"),
        (status = 400, description = "Invalid patch", body = ProblemDetails),
        (status = 404, description = "Habit not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn patch_habit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<HabitId>,
    ApiJson(document): ApiJson<PatchDocument>,
) -> ApiResult<StatusCode> {
    debug!("Patch habit request: {} ({} operations)", id, document.len());

    state.habit_service.patch_habit(&user.user_id, &id, document).await?;
    Ok(no_content())
}

/// Delete a habit.
#[utoipa::path(
    delete,
    path = "/habits/{id}",
    tag = "habits",
    params(("id" = String, Path, description = "Habit id")),
    responses(
        (status = 204, description = "Habit deleted"),
        (status = 404, description = "Habit not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_habit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<HabitId>,
) -> ApiResult<StatusCode> {
    debug!("Delete habit request: {}", id);

    state.habit_service.delete_habit(&user.user_id, &id).await?;
    Ok(no_content())
}

fn shape_habit(state: &AppState, habit: &Habit, version: ApiVersion) -> DevHabitResult<ShapedEntry> {
    match version {
        ApiVersion::V1 => state.data_shaping.shape_one(&HabitDto::from(habit), None),
        ApiVersion::V2 => state.data_shaping.shape_one(&HabitDtoV2::from(habit), None),
    }
}

fn shape_habits<D>(
    state: &AppState,
    habits: &[Habit],
    query: &HabitsQuery,
    media: &MediaType,
    links: &Links,
) -> DevHabitResult<Vec<ShapedEntry>>
where
    D: Shape + for<'a> From<&'a Habit>,
{
    let dtos: Vec<D> = habits.iter().map(D::from).collect();
    let fields = query.fields.as_deref();

    if media.include_links {
        state
            .data_shaping
            .shape_many_with_links(&dtos, fields, |id, fields| habit_links(links, id, fields))
    } else {
        state.data_shaping.shape_many(&dtos, fields)
    }
}

/// Links of a single habit.
pub(crate) fn habit_links(links: &Links, id: &str, fields: Option<&str>) -> DevHabitResult<Vec<LinkDto>> {
    let id = Some(id.to_string());
    Ok(vec![
        links.create(
            actions::GET_HABIT,
            rel::SELF,
            methods::GET,
            &[("id", id.clone()), ("fields", fields.map(ToString::to_string))],
        )?,
        links.create(actions::UPDATE_HABIT, rel::UPDATE, methods::PUT, &[("id", id.clone())])?,
        links.create(
            actions::PATCH_HABIT,
            rel::PARTIAL_UPDATE,
            methods::PATCH,
            &[("id", id.clone())],
        )?,
        links.create(actions::DELETE_HABIT, rel::DELETE, methods::DELETE, &[("id", id.clone())])?,
        links.create(
            actions::UPSERT_HABIT_TAGS,
            rel::UPSERT_TAGS,
            methods::PUT,
            &[("habitId", id)],
        )?,
    ])
}

/// Links of a habits page, carrying the request's filter, sort and fields.
fn collection_links<T>(
    links: &Links,
    query: &HabitsQuery,
    page: &PaginationResult<T>,
) -> DevHabitResult<Vec<LinkDto>> {
    let page_link = |number: u32, rel: &str| {
        links.create(
            actions::GET_HABITS,
            rel,
            methods::GET,
            &[
                ("page", Some(number.to_string())),
                ("pageSize", Some(page.page_size.to_string())),
                ("fields", query.fields.clone()),
                ("search", query.search.clone()),
                ("sort", query.sort.clone()),
                ("type", query.habit_type.map(|t| t.value().to_string())),
                ("status", query.status.map(|s| s.value().to_string())),
            ],
        )
    };

    let mut collection = vec![
        page_link(page.page, rel::SELF)?,
        links.create(actions::CREATE_HABIT, rel::CREATE, methods::POST, &[])?,
    ];
    if page.has_next_page {
        collection.push(page_link(page.page + 1, rel::NEXT)?);
    }
    if page.has_previous_page {
        collection.push(page_link(page.page - 1, rel::PREVIOUS)?);
    }
    Ok(collection)
}
