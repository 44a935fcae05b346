//! Query string parameters of list and detail endpoints.

use devhabit_core::{HabitFilter, HabitStatus, HabitType, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Representation version negotiated from the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

impl ApiVersion {
    /// Maps a numeric version, `None` when unsupported.
    #[must_use]
    pub const fn from_number(version: u32) -> Option<Self> {
        match version {
            1 => Some(Self::V1),
            2 => Some(Self::V2),
            _ => None,
        }
    }

    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }
}

/// Parameters of `GET /habits`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HabitsQuery {
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    #[serde(rename = "type")]
    #[param(value_type = Option<i16>)]
    pub habit_type: Option<HabitType>,
    #[param(value_type = Option<i16>)]
    pub status: Option<HabitStatus>,
    /// Comma separated sort fields, `-` prefix for descending.
    pub sort: Option<String>,
    /// Comma separated fields to return.
    pub fields: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl HabitsQuery {
    #[must_use]
    pub fn filter(&self) -> HabitFilter {
        HabitFilter {
            search: self.search.clone(),
            habit_type: self.habit_type,
            status: self.status,
        }
    }

    /// Page request with out of range values clamped.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.map(clamp_u32), self.page_size.map(clamp_u32))
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Parameters of `GET /tags`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TagsQuery {
    pub sort: Option<String>,
    pub fields: Option<String>,
}

/// Field selection of single resource endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FieldsQuery {
    pub fields: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_clamps() {
        let query = HabitsQuery::default();
        assert_eq!(query.page_request(), PageRequest::new(1, 10));

        let query = HabitsQuery {
            page: Some(-3),
            page_size: Some(1000),
            ..HabitsQuery::default()
        };
        assert_eq!(query.page_request(), PageRequest::new(1, 100));
    }

    #[test]
    fn test_deserialize_camel_case_and_enums() {
        let query: HabitsQuery =
            serde_json::from_str(r#"{"type":2,"status":1,"pageSize":5,"search":"read"}"#).unwrap();
        assert_eq!(query.habit_type, Some(HabitType::Measurable));
        assert_eq!(query.status, Some(HabitStatus::Ongoing));
        assert_eq!(query.page_size, Some(5));
        assert_eq!(query.filter().search_term().as_deref(), Some("read"));
    }

    #[test]
    fn test_api_version_numbers() {
        assert_eq!(ApiVersion::from_number(2), Some(ApiVersion::V2));
        assert_eq!(ApiVersion::from_number(3), None);
        assert_eq!(ApiVersion::default().number(), 1);
    }
}
