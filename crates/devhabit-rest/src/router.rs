//! Main application router.

use crate::{
    controllers::{
        auth_controller, github_controller, habit_tags_controller, habits_controller, health_controller,
        tags_controller, users_controller,
    },
    links::LinkService,
    middleware::{auth_middleware, logging_middleware, problem_details_middleware},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, Router};
use devhabit_config::ServerConfig;
use devhabit_repository::DatabasePoolInterface;
use devhabit_security::TokenProviderInterface;
use devhabit_service::{
    AuthService, GitHubAccessTokenService, GitHubService, HabitService, HabitTagService, TagService, UserContext,
    UserService,
};
use shaku::{HasComponent, Module};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router from a Shaku module.
pub fn create_router<M>(module: &M, server_config: &ServerConfig) -> Router
where
    M: Module
        + HasComponent<dyn HabitService>
        + HasComponent<dyn TagService>
        + HasComponent<dyn HabitTagService>
        + HasComponent<dyn UserService>
        + HasComponent<dyn AuthService>
        + HasComponent<dyn GitHubService>
        + HasComponent<dyn GitHubAccessTokenService>
        + HasComponent<dyn UserContext>
        + HasComponent<dyn TokenProviderInterface>
        + HasComponent<dyn DatabasePoolInterface>,
{
    let links = LinkService::new(server_config.public_base_url.clone());
    let state = AppState::from_module(module, links);
    build_router(state, server_config)
}

/// Creates the router around an already assembled state.
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let api_router = Router::new()
        .nest(
            "/habits",
            habits_controller::router().merge(habit_tags_controller::router()),
        )
        .nest("/tags", tags_controller::router())
        .nest("/users", users_controller::router())
        .nest("/auth", auth_controller::router())
        .nest("/github", github_controller::router())
        .merge(health_controller::router())
        .layer(middleware::from_fn(problem_details_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state);

    let router = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
