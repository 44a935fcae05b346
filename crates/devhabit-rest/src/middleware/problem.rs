//! Completes problem details with request data.

use super::REQUEST_ID_HEADER;
use crate::responses::problem_response;
use axum::{
    body::Body,
    http::{header::CONTENT_LENGTH, Request},
    middleware::Next,
    response::Response,
};
use devhabit_core::ProblemDetails;

/// Adds `instance` and `requestId` to problem details responses.
///
/// Handlers render errors without access to the request, they leave the
/// problem in the response extensions and this layer re-renders it.
pub async fn problem_details_middleware(request: Request<Body>, next: Next) -> Response {
    let instance = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(ToString::to_string);

    let mut response = next.run(request).await;

    let Some(mut problem) = response.extensions_mut().remove::<ProblemDetails>() else {
        return response;
    };
    problem = problem.with_instance(instance);
    if let Some(request_id) = request_id {
        problem = problem.with_request_id(request_id);
    }

    let mut rendered = problem_response(problem);
    for (name, value) in response.headers() {
        if name != CONTENT_LENGTH && !rendered.headers().contains_key(name) {
            rendered.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rendered
}
