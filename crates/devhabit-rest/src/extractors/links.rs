//! Per-request link factory.

use crate::links::{LinkService, RouteValues};
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::HOST, request::Parts},
};
use devhabit_core::{DevHabitResult, LinkDto};
use std::convert::Infallible;
use std::sync::Arc;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// [`LinkService`] bound to the base URL of the current request.
#[derive(Debug, Clone)]
pub struct Links {
    service: Arc<LinkService>,
    base_url: String,
}

impl Links {
    #[must_use]
    pub fn new(service: Arc<LinkService>, base_url: impl Into<String>) -> Self {
        Self {
            service,
            base_url: base_url.into(),
        }
    }

    /// Creates a link to `action`, see [`LinkService::create`].
    pub fn create(&self, action: &str, rel: &str, method: &str, values: &RouteValues<'_>) -> DevHabitResult<LinkDto> {
        self.service.create(&self.base_url, action, rel, method, values, None)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Links {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let base_url = match state.links.public_base_url() {
            Some(url) => url.to_string(),
            None => request_base_url(parts),
        };
        Ok(Self::new(state.links.clone(), base_url))
    }
}

/// Scheme and authority the client used to reach the API.
fn request_base_url(parts: &Parts) -> String {
    let scheme = parts
        .headers
        .get(FORWARDED_PROTO)
        .and_then(|h| h.to_str().ok())
        .or_else(|| parts.uri.scheme_str())
        .unwrap_or("http");
    let host = parts
        .headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| parts.uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    format!("{scheme}://{host}")
}
