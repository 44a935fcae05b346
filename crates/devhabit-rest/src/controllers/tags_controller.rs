//! Tags controller.

use super::attach_links;
use crate::{
    extractors::{ApiQuery, CurrentUser, Links, MediaType, ValidatedJson},
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
use devhabit_core::{rel, DevHabitResult, LinkDto, ProblemDetails, TagId};
use devhabit_service::{CreateTagRequest, FieldsQuery, TagDto, TagsCollectionDto, TagsQuery, UpdateTagRequest};
use tracing::debug;

/// Creates the tags router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_tags).post(create_tag))
        .route("/:id", get(get_tag).put(update_tag).delete(delete_tag))
}

/// List the caller's tags.
#[utoipa::path(
    get,
    path = "/tags",
    tag = "tags",
    params(TagsQuery),
    responses(
        (status = 200, description = "Shaped tags", body = TagsCollectionDto),
        (status = 400, description = "Invalid sort or fields", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_tags(
    State(state): State<AppState>,
    user: CurrentUser,
    media: MediaType,
    links: Links,
    ApiQuery(query): ApiQuery<TagsQuery>,
) -> ApiResult {
    debug!("Get tags request: {:?}", query);

    let tags = state.tag_service.get_tags(&user.user_id, &query).await?;
    let dtos: Vec<TagDto> = tags.iter().map(TagDto::from).collect();
    let fields = query.fields.as_deref();

    let collection = if media.include_links {
        TagsCollectionDto {
            items: state
                .data_shaping
                .shape_many_with_links(&dtos, fields, |id, fields| tag_links(&links, id, fields))?,
            links: Some(vec![
                links.create(actions::GET_TAGS, rel::SELF, methods::GET, &[])?,
                links.create(actions::CREATE_TAG, rel::CREATE, methods::POST, &[])?,
            ]),
        }
    } else {
        TagsCollectionDto {
            items: state.data_shaping.shape_many(&dtos, fields)?,
            links: None,
        }
    };

    Ok(negotiated(&media, StatusCode::OK, &collection))
}

/// Get a tag.
#[utoipa::path(
    get,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = String, Path, description = "Tag id"), FieldsQuery),
    responses(
        (status = 200, description = "Shaped tag", body = TagDto),
        (status = 404, description = "Tag not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_tag(
    State(state): State<AppState>,
    user: CurrentUser,
    media: MediaType,
    links: Links,
    Path(id): Path<TagId>,
    ApiQuery(query): ApiQuery<FieldsQuery>,
) -> ApiResult {
    debug!("Get tag request: {}", id);

    let fields = query.fields.as_deref();
    let tag = state.tag_service.get_tag(&user.user_id, &id, fields).await?;

    let mut entry = state.data_shaping.shape_one(&TagDto::from(&tag), fields)?;
    if media.include_links {
        attach_links(&mut entry, tag_links(&links, tag.id.as_str(), fields)?)?;
    }

    Ok(negotiated(&media, StatusCode::OK, &entry))
}

/// Create a tag.
#[utoipa::path(
    post,
    path = "/tags",
    tag = "tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagDto),
        (status = 400, description = "Validation failed", body = ProblemDetails),
        (status = 409, description = "Tag name already used", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_tag(
    State(state): State<AppState>,
    user: CurrentUser,
    media: MediaType,
    links: Links,
    ValidatedJson(request): ValidatedJson<CreateTagRequest>,
) -> ApiResult {
    debug!("Create tag request: {}", request.name);

    let tag = state.tag_service.create_tag(&user.user_id, request).await?;

    let mut entry = state.data_shaping.shape_one(&TagDto::from(&tag), None)?;
    if media.include_links {
        attach_links(&mut entry, tag_links(&links, tag.id.as_str(), None)?)?;
    }
    let location = links.create(
        actions::GET_TAG,
        rel::SELF,
        methods::GET,
        &[("id", Some(tag.id.to_string()))],
    )?;

    Ok(created(&media, &location, &entry))
}

/// Replace a tag.
#[utoipa::path(
    put,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = String, Path, description = "Tag id")),
    request_body = UpdateTagRequest,
    responses(
        (status = 204, description = "Tag updated"),
        (status = 404, description = "Tag not found", body = ProblemDetails),
        (status = 409, description = "Tag name already used", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_tag(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TagId>,
    ValidatedJson(request): ValidatedJson<UpdateTagRequest>,
) -> ApiResult<StatusCode> {
    debug!("Update tag request: {}", id);

    state.tag_service.update_tag(&user.user_id, &id, request).await?;
    Ok(no_content())
}

/// Delete a tag.
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = String, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found", body = ProblemDetails)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TagId>,
) -> ApiResult<StatusCode> {
    debug!("Delete tag request: {}", id);

    state.tag_service.delete_tag(&user.user_id, &id).await?;
    Ok(no_content())
}

fn tag_links(links: &Links, id: &str, fields: Option<&str>) -> DevHabitResult<Vec<LinkDto>> {
    let id = Some(id.to_string());
    Ok(vec![
        links.create(
            actions::GET_TAG,
            rel::SELF,
            methods::GET,
            &[("id", id.clone()), ("fields", fields.map(ToString::to_string))],
        )?,
        links.create(actions::UPDATE_TAG, rel::UPDATE, methods::PUT, &[("id", id.clone())])?,
        links.create(actions::DELETE_TAG, rel::DELETE, methods::DELETE, &[("id", id)])?,
    ])
}
