//! JSON Patch (RFC 6902) documents for partial habit updates.
//!
//! Only `add`, `replace` and `remove` are accepted, and only on the paths
//! `/name` and `/description`.

use crate::dto::HabitPatchTarget;
use devhabit_core::{DevHabitError, DevHabitResult, ValidateExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A JSON Patch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatchOperation {
    pub op: String,
    pub path: String,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub value: Option<Value>,
}

/// A JSON Patch document.
pub type PatchDocument = Vec<PatchOperation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatchPath {
    Name,
    Description,
}

impl PatchPath {
    fn parse(path: &str) -> DevHabitResult<Self> {
        let path = path.trim();
        if path.eq_ignore_ascii_case("/name") {
            Ok(Self::Name)
        } else if path.eq_ignore_ascii_case("/description") {
            Ok(Self::Description)
        } else {
            Err(DevHabitError::validation(format!("The path '{path}' cannot be patched")))
        }
    }
}

/// Applies `document` to `target` and validates the result.
///
/// The target is left untouched when any operation fails.
pub fn apply_patch(target: &HabitPatchTarget, document: &[PatchOperation]) -> DevHabitResult<HabitPatchTarget> {
    let mut patched = target.clone();

    for operation in document {
        let path = PatchPath::parse(&operation.path)?;
        match operation.op.to_ascii_lowercase().as_str() {
            "add" | "replace" => {
                let value = string_value(operation)?;
                match path {
                    PatchPath::Name => {
                        patched.name = value.ok_or_else(|| DevHabitError::validation("The name cannot be null"))?;
                    }
                    PatchPath::Description => patched.description = value,
                }
            }
            "remove" => match path {
                PatchPath::Name => return Err(DevHabitError::validation("The name cannot be removed")),
                PatchPath::Description => patched.description = None,
            },
            other => {
                return Err(DevHabitError::validation(format!(
                    "The patch operation '{other}' is not supported"
                )))
            }
        }
    }

    patched.validate_request()?;
    Ok(patched)
}

fn string_value(operation: &PatchOperation) -> DevHabitResult<Option<String>> {
    match &operation.value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DevHabitError::validation(format!(
            "The value for '{}' must be a string",
            operation.path
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target() -> HabitPatchTarget {
        HabitPatchTarget {
            name: "Read Books".to_string(),
            description: Some("Fiction".to_string()),
        }
    }

    fn document(value: Value) -> PatchDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_replace_name_and_remove_description() {
        let patch = document(json!([
            {"op": "replace", "path": "/name", "value": "Read More Books"},
            {"op": "remove", "path": "/description"}
        ]));
        let patched = apply_patch(&target(), &patch).unwrap();
        assert_eq!(patched.name, "Read More Books");
        assert!(patched.description.is_none());
    }

    #[test]
    fn test_other_paths_are_rejected() {
        let patch = document(json!([{"op": "replace", "path": "/status", "value": 2}]));
        assert_eq!(apply_patch(&target(), &patch).unwrap_err().status_code(), 400);
    }

    #[test]
    fn test_unsupported_operation() {
        let patch = document(json!([{"op": "move", "from": "/name", "path": "/description"}]));
        assert!(apply_patch(&target(), &patch).is_err());
    }

    #[test]
    fn test_patched_value_is_validated() {
        let patch = document(json!([{"op": "add", "path": "/name", "value": "ab"}]));
        let err = apply_patch(&target(), &patch).unwrap_err();
        assert!(matches!(err, DevHabitError::InvalidFields(_)));
    }

    #[test]
    fn test_name_cannot_be_removed() {
        let patch = document(json!([{"op": "remove", "path": "/name"}]));
        assert!(apply_patch(&target(), &patch).is_err());
    }
}
