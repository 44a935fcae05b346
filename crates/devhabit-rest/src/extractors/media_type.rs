//! `Accept` header negotiation.
//!
//! Vendor media types select the representation version and whether HATEOAS
//! links are embedded, e.g. `application/vnd.dev-habit.hateoas.2+json`.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderName, HeaderValue},
    response::Response,
};
use devhabit_core::DevHabitError;
use devhabit_service::ApiVersion;

/// Vendor media type names.
pub mod media_types {
    pub const JSON: &str = "application/json";
    pub const JSON_V1: &str = "application/vnd.dev-habit.1+json";
    pub const JSON_V2: &str = "application/vnd.dev-habit.2+json";
    pub const HATEOAS_JSON: &str = "application/vnd.dev-habit.hateoas+json";
    pub const HATEOAS_JSON_V1: &str = "application/vnd.dev-habit.hateoas.1+json";
    pub const HATEOAS_JSON_V2: &str = "application/vnd.dev-habit.hateoas.2+json";
}

const VENDOR_PREFIX: &str = "vnd.dev-habit";
const HATEOAS_SUBTYPE: &str = "hateoas";

/// Header listing the representation versions the API serves.
pub const API_SUPPORTED_VERSIONS: HeaderName = HeaderName::from_static("api-supported-versions");

/// Outcome of content negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub version: ApiVersion,
    pub include_links: bool,
    content_type: String,
}

impl Default for MediaType {
    fn default() -> Self {
        Self {
            version: ApiVersion::V1,
            include_links: false,
            content_type: media_types::JSON.to_string(),
        }
    }
}

impl MediaType {
    /// Negotiates from an `Accept` header value.
    ///
    /// The first vendor media range wins. Without one, plain JSON v1 is
    /// served.
    pub fn parse(accept: Option<&str>) -> Result<Self, DevHabitError> {
        let Some(accept) = accept else {
            return Ok(Self::default());
        };

        for range in accept.split(',') {
            if let Some(media) = Self::parse_range(range)? {
                return Ok(media);
            }
        }
        Ok(Self::default())
    }

    fn parse_range(range: &str) -> Result<Option<Self>, DevHabitError> {
        let mut parts = range.split(';').map(str::trim);
        let essence = parts.next().unwrap_or_default().to_ascii_lowercase();

        let Some(subtype) = essence.strip_prefix("application/") else {
            return Ok(None);
        };
        let subtype = subtype.strip_suffix("+json").unwrap_or(subtype);
        if !subtype.starts_with(VENDOR_PREFIX) {
            return Ok(None);
        }

        let mut include_links = false;
        let mut version = None;
        for segment in subtype[VENDOR_PREFIX.len()..].split('.').filter(|s| !s.is_empty()) {
            if segment == HATEOAS_SUBTYPE {
                include_links = true;
            } else if let Ok(number) = segment.parse::<u32>() {
                version = Some(number);
            }
        }

        let mut version_param = None;
        for param in parts {
            if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case("v") {
                    version_param = Some(value.trim().trim_matches('"').to_string());
                }
            }
        }

        if let Some(param) = &version_param {
            let number = param
                .split('.')
                .next()
                .and_then(|major| major.parse::<u32>().ok())
                .ok_or_else(unsupported_version)?;
            version = Some(number);
        }

        let version = ApiVersion::from_number(version.unwrap_or(1)).ok_or_else(unsupported_version)?;
        let content_type = match version_param {
            Some(param) => format!("{essence};v={param}"),
            None => essence,
        };

        Ok(Some(Self {
            version,
            include_links,
            content_type,
        }))
    }

    /// The negotiated `Content-Type`.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Writes the negotiated headers to a response.
    pub fn apply(&self, response: &mut Response) {
        if let Ok(value) = HeaderValue::from_str(&self.content_type) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response
            .headers_mut()
            .insert(API_SUPPORTED_VERSIONS.clone(), HeaderValue::from_static("1.0, 2.0"));
    }
}

fn unsupported_version() -> DevHabitError {
    DevHabitError::validation("Unsupported API version")
}

#[async_trait]
impl<S> FromRequestParts<S> for MediaType
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts.headers.get(header::ACCEPT).and_then(|h| h.to_str().ok());
        Ok(Self::parse(accept)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_is_v1_without_links() {
        for accept in [None, Some("application/json"), Some("*/*"), Some("text/html")] {
            let media = MediaType::parse(accept).unwrap();
            assert_eq!(media.version, ApiVersion::V1);
            assert!(!media.include_links);
            assert_eq!(media.content_type(), media_types::JSON);
        }
    }

    #[test]
    fn test_vendor_types() {
        let media = MediaType::parse(Some(media_types::HATEOAS_JSON_V2)).unwrap();
        assert_eq!(media.version, ApiVersion::V2);
        assert!(media.include_links);
        assert_eq!(media.content_type(), media_types::HATEOAS_JSON_V2);

        let media = MediaType::parse(Some(media_types::JSON_V2)).unwrap();
        assert_eq!(media.version, ApiVersion::V2);
        assert!(!media.include_links);

        let media = MediaType::parse(Some(media_types::HATEOAS_JSON)).unwrap();
        assert_eq!(media.version, ApiVersion::V1);
        assert!(media.include_links);
    }

    #[test]
    fn test_version_parameter() {
        let media = MediaType::parse(Some("application/vnd.dev-habit+json; v=2")).unwrap();
        assert_eq!(media.version, ApiVersion::V2);
        assert_eq!(media.content_type(), "application/vnd.dev-habit+json;v=2");
    }

    #[test]
    fn test_first_vendor_range_wins() {
        let media = MediaType::parse(Some("application/json, application/vnd.dev-habit.hateoas.1+json")).unwrap();
        assert!(media.include_links);
        assert_eq!(media.version, ApiVersion::V1);
    }

    #[test]
    fn test_unsupported_version() {
        let err = MediaType::parse(Some("application/vnd.dev-habit.3+json")).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Unsupported API version");

        assert!(MediaType::parse(Some("application/vnd.dev-habit+json;v=abc")).is_err());
    }
}
