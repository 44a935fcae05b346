//! API response types.
//!
//! Every failure leaves a handler as [`AppError`] and is rendered as RFC 7807
//! problem details. The request id and path are filled in afterwards by
//! [`crate::middleware::problem_details_middleware`], which sees the request.

use crate::extractors::MediaType;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use devhabit_core::{DevHabitError, LinkDto, ProblemDetails};
use serde::Serialize;
use tracing::{error, warn};

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub DevHabitError);

impl From<DevHabitError> for AppError {
    fn from(err: DevHabitError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        } else {
            warn!(error = %self.0, code = self.0.error_code(), "Request rejected");
        }
        problem_response(ProblemDetails::from_error(&self.0))
    }
}

/// Renders a problem and keeps a copy in the response extensions.
pub fn problem_response(problem: ProblemDetails) -> Response {
    let status = StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(&problem)).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(ProblemDetails::CONTENT_TYPE),
    );
    response.extensions_mut().insert(problem);
    response
}

/// Result type for Axum handlers.
pub type ApiResult<T = Response> = Result<T, AppError>;

/// Serializes `body` with the negotiated `Content-Type`.
pub fn negotiated<T: Serialize>(media: &MediaType, status: StatusCode, body: &T) -> Response {
    let mut response = (status, Json(body)).into_response();
    if response.status() == status {
        media.apply(&mut response);
    }
    response
}

/// 201 with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(media: &MediaType, location: &LinkDto, body: &T) -> Response {
    let mut response = negotiated(media, StatusCode::CREATED, body);
    if let Ok(value) = HeaderValue::from_str(&location.href) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

/// Helper to create a no content (204) response.
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
