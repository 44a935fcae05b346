//! OpenAPI documentation configuration.

use crate::controllers::HealthResponse;
use devhabit_core::{FieldError, LinkDto, ProblemDetails};
use devhabit_service::{
    AccessTokens, CreateHabitRequest, CreateTagRequest, FrequencyDto, GitHubEventDto, GitHubUserProfileDto,
    HabitDto, HabitDtoV2, HabitWithTagsDto, HabitWithTagsDtoV2, LoginUserRequest, MilestoneDto, PatchOperation,
    RefreshTokenRequest, RegisterUserRequest, StoreGitHubAccessTokenRequest, TagDto, TagsCollectionDto, TargetDto,
    UpdateHabitRequest, UpdateMilestoneDto, UpdateTagRequest, UpsertHabitTagsRequest, UserDto,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the DevHabit API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DevHabit API",
        version = "1.0.0",
        description = "Habit tracking API with field selection, sorting, paging and hypermedia links"
    ),
    paths(
        crate::controllers::habits_controller::get_habits,
        crate::controllers::habits_controller::get_habit,
        crate::controllers::habits_controller::create_habit,
        crate::controllers::habits_controller::update_habit,
        crate::controllers::habits_controller::patch_habit,
        crate::controllers::habits_controller::delete_habit,
        crate::controllers::habit_tags_controller::upsert_habit_tags,
        crate::controllers::habit_tags_controller::delete_habit_tag,
        crate::controllers::tags_controller::get_tags,
        crate::controllers::tags_controller::get_tag,
        crate::controllers::tags_controller::create_tag,
        crate::controllers::tags_controller::update_tag,
        crate::controllers::tags_controller::delete_tag,
        crate::controllers::users_controller::get_user_by_id,
        crate::controllers::users_controller::get_current_user,
        crate::controllers::auth_controller::register,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::refresh,
        crate::controllers::github_controller::store_access_token,
        crate::controllers::github_controller::revoke_access_token,
        crate::controllers::github_controller::get_user_profile,
        crate::controllers::github_controller::get_user_events,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ProblemDetails,
            FieldError,
            LinkDto,
            HabitDto,
            HabitDtoV2,
            HabitWithTagsDto,
            HabitWithTagsDtoV2,
            FrequencyDto,
            TargetDto,
            MilestoneDto,
            UpdateMilestoneDto,
            CreateHabitRequest,
            UpdateHabitRequest,
            PatchOperation,
            UpsertHabitTagsRequest,
            TagDto,
            TagsCollectionDto,
            CreateTagRequest,
            UpdateTagRequest,
            UserDto,
            RegisterUserRequest,
            LoginUserRequest,
            RefreshTokenRequest,
            AccessTokens,
            StoreGitHubAccessTokenRequest,
            GitHubUserProfileDto,
            GitHubEventDto,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "habits", description = "Habit management"),
        (name = "habit-tags", description = "Tags linked to a habit"),
        (name = "tags", description = "Tag management"),
        (name = "users", description = "Application users"),
        (name = "auth", description = "Registration and tokens"),
        (name = "github", description = "GitHub integration"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Registers the JWT bearer scheme referenced by `security(("bearer_auth" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
