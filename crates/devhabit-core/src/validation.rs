//! Validation utilities.

use crate::{DevHabitError, FieldError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `DevHabitError` on failure.
    fn validate_request(&self) -> Result<(), DevHabitError> {
        self.validate().map_err(validation_errors_to_devhabit_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
///
/// Nested struct errors are reported with a dotted path, e.g. `target.value`.
#[must_use]
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect_into(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect_into(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            (*field).to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errors) => {
                out.extend(errors.iter().map(|error| FieldError {
                    field: path.clone(),
                    message: error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string),
                    code: error.code.to_string(),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_into(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_into(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// Converts `validator::ValidationErrors` to `DevHabitError`.
#[must_use]
pub fn validation_errors_to_devhabit_error(errors: ValidationErrors) -> DevHabitError {
    DevHabitError::InvalidFields(collect_field_errors(&errors))
}

/// Common validation functions.
pub mod rules {
    use chrono::{NaiveDate, Utc};
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that a date lies strictly after today (UTC).
    pub fn future_date(value: &NaiveDate) -> Result<(), ValidationError> {
        if *value <= Utc::now().date_naive() {
            let mut error = ValidationError::new("future_date");
            error.message = Some("End date must be in the future".into());
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use chrono::{Duration, Utc};

    #[derive(Validate)]
    struct Inner {
        #[validate(range(min = 1))]
        value: i32,
    }

    #[derive(Validate)]
    struct Outer {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: String,
        #[validate(nested)]
        inner: Inner,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_future_date() {
        let today = Utc::now().date_naive();
        assert!(future_date(&(today + Duration::days(1))).is_ok());
        assert!(future_date(&today).is_err());
        assert!(future_date(&(today - Duration::days(3))).is_err());
    }

    #[test]
    fn test_validate_request_collects_nested_errors() {
        let outer = Outer {
            name: "ab".to_string(),
            inner: Inner { value: 0 },
        };
        let err = outer.validate_request().unwrap_err();
        let DevHabitError::InvalidFields(errors) = err else {
            panic!("expected field errors");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "inner.value");
        assert_eq!(errors[1].field, "name");
        assert_eq!(errors[1].message, "Name must be at least 3 characters");
    }

    #[test]
    fn test_validate_request_ok() {
        let outer = Outer {
            name: "abc".to_string(),
            inner: Inner { value: 1 },
        };
        assert!(outer.validate_request().is_ok());
    }
}
