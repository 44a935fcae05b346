//! Authentication controller.

use crate::{
    extractors::ValidatedJson,
    responses::ApiResult,
    state::AppState,
};
use axum::{extract::State, routing::post, Json, Router};
use devhabit_core::ProblemDetails;
use devhabit_service::{AccessTokens, LoginUserRequest, RefreshTokenRequest, RegisterUserRequest};
use tracing::debug;

/// Creates the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

/// Register a new member.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Registered, tokens issued", body = AccessTokens),
        (status = 400, description = "Validation failed", body = ProblemDetails),
        (status = 409, description = "Email already registered", body = ProblemDetails)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterUserRequest>,
) -> ApiResult<Json<AccessTokens>> {
    debug!("Registration request for: {}", request.email);

    let tokens = state.auth_service.register(request).await?;
    Ok(Json(tokens))
}

/// Login with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginUserRequest,
    responses(
        (status = 200, description = "Tokens issued", body = AccessTokens),
        (status = 401, description = "Invalid email or password", body = ProblemDetails)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginUserRequest>,
) -> ApiResult<Json<AccessTokens>> {
    debug!("Login request for: {}", request.email);

    let tokens = state.auth_service.login(request).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new token pair.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = AccessTokens),
        (status = 401, description = "Unknown or expired refresh token", body = ProblemDetails)
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<AccessTokens>> {
    debug!("Token refresh request");

    let tokens = state.auth_service.refresh(request).await?;
    Ok(Json(tokens))
}
