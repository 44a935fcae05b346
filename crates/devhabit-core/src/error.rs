//! Unified error type and the RFC 7807 problem details body.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of DevHabit.
///
/// The `Display` output of client-facing variants is used verbatim as the
/// `detail` of the problem details response, so messages are written for API
/// consumers.
#[derive(Error, Debug)]
pub enum DevHabitError {
    // ============ Domain Errors ============
    /// Resource not found by id
    #[error("{resource_type} with ID '{id}' not found.")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Resource not found, with a caller supplied message
    #[error("{0}")]
    Missing(String),

    /// Validation error
    #[error("{0}")]
    Validation(String),

    /// Field level validation failures from a request body
    #[error("One or more validation errors occurred.")]
    InvalidFields(Vec<FieldError>),

    /// Conflict error (e.g., duplicate entry)
    #[error("{0}")]
    Conflict(String),

    // ============ Authentication/Authorization Errors ============
    /// Unauthorized access
    #[error("{0}")]
    Unauthorized(String),

    /// Forbidden access
    #[error("{0}")]
    Forbidden(String),

    /// Invalid token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token expired
    #[error("Token expired")]
    TokenExpired,

    /// Invalid credentials
    #[error("Invalid email or password")]
    InvalidCredentials,

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// External service error
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Encryption or decryption failure
    #[error("Encryption error: {0}")]
    Encryption(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DevHabitError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::Missing(_) => 404,
            Self::Validation(_) | Self::InvalidFields(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_) | Self::InvalidToken(_) | Self::TokenExpired | Self::InvalidCredentials => 401,
            Self::Forbidden(_) => 403,
            Self::ExternalService { .. } => 502,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Encryption(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::Missing(_) => "NOT_FOUND",
            Self::Validation(_) | Self::InvalidFields(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Encryption(_) => "ENCRYPTION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is caused by the server rather than the request.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a not found error with a custom message.
    #[must_use]
    pub fn missing<T: Into<String>>(message: T) -> Self {
        Self::Missing(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Rejects a sort expression naming an unmapped field.
    #[must_use]
    pub fn invalid_sort(sort: Option<&str>) -> Self {
        Self::Validation(format!(
            "The provided sort parameter isn't valid: '{}'",
            sort.unwrap_or_default()
        ))
    }

    /// Rejects a data shaping selector naming an unknown field.
    #[must_use]
    pub fn invalid_fields(fields: Option<&str>) -> Self {
        Self::Validation(format!(
            "The provided data shaping fields aren't valid: '{}'",
            fields.unwrap_or_default()
        ))
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for DevHabitError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "Row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique violation
                if db_err.code().as_deref() == Some("23505") {
                    return Self::Conflict(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DevHabitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

/// RFC 7807 problem details returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// Reference to the HTTP status definition
    #[serde(rename = "type")]
    pub kind: String,
    /// Short summary of the status
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Human-readable explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Request path that produced the problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Correlation id of the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Field-level validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ProblemDetails {
    /// Media type of serialized problem details.
    pub const CONTENT_TYPE: &'static str = "application/problem+json";

    /// Creates an empty problem for a status code.
    #[must_use]
    pub fn new(status: u16) -> Self {
        let (kind, title) = describe_status(status);
        Self {
            kind: kind.to_string(),
            title: title.to_string(),
            status,
            detail: None,
            instance: None,
            request_id: None,
            errors: None,
        }
    }

    /// Creates a problem from an error.
    ///
    /// Server errors never expose their internal message.
    #[must_use]
    pub fn from_error(error: &DevHabitError) -> Self {
        let mut problem = Self::new(error.status_code());
        if !error.is_server_error() {
            problem.detail = Some(error.to_string());
        }
        if let DevHabitError::InvalidFields(errors) = error {
            problem.errors = Some(errors.clone());
        }
        problem
    }

    /// Sets the detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets the request instance path.
    #[must_use]
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Sets the request correlation id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl From<&DevHabitError> for ProblemDetails {
    fn from(error: &DevHabitError) -> Self {
        Self::from_error(error)
    }
}

const fn describe_status(status: u16) -> (&'static str, &'static str) {
    match status {
        400 => ("https://tools.ietf.org/html/rfc9110#section-15.5.1", "Bad Request"),
        401 => ("https://tools.ietf.org/html/rfc9110#section-15.5.2", "Unauthorized"),
        403 => ("https://tools.ietf.org/html/rfc9110#section-15.5.4", "Forbidden"),
        404 => ("https://tools.ietf.org/html/rfc9110#section-15.5.5", "Not Found"),
        409 => ("https://tools.ietf.org/html/rfc9110#section-15.5.10", "Conflict"),
        502 => ("https://tools.ietf.org/html/rfc9110#section-15.6.3", "Bad Gateway"),
        _ => ("https://tools.ietf.org/html/rfc9110#section-15.6.1", "Internal Server Error"),
    }
}
