//! Habit DTOs.
//!
//! Two response representations exist: v1 names timestamps with a `Utc`
//! suffix, v2 drops it. Both share the nested value DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use devhabit_core::{is_unit_allowed, rules, FrequencyType, HabitStatus, HabitType, Shape};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Habit frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyDto {
    #[serde(rename = "type")]
    #[schema(value_type = i16)]
    pub frequency_type: FrequencyType,
    #[validate(range(min = 1, message = "Times per period must be greater than zero"))]
    pub times_per_period: i32,
}

/// Habit target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetDto {
    #[validate(range(min = 1, message = "Target value must be greater than zero"))]
    pub value: i32,
    #[validate(custom(function = "rules::not_blank"))]
    pub unit: String,
}

/// Habit milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDto {
    pub target: i32,
    pub current: i32,
}

/// Milestone part of create and update requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestoneDto {
    #[validate(range(min = 1, message = "Milestone target must be greater than zero"))]
    pub target: i32,
}

/// Habit representation, version 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HabitDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[schema(value_type = i16)]
    pub habit_type: HabitType,
    pub frequency: FrequencyDto,
    pub target: TargetDto,
    #[schema(value_type = i16)]
    pub status: HabitStatus,
    pub is_archived: bool,
    pub end_date: Option<NaiveDate>,
    pub milestone: Option<MilestoneDto>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: Option<DateTime<Utc>>,
    pub last_completed_at_utc: Option<DateTime<Utc>>,
}

const HABIT_V1_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "type",
    "frequency",
    "target",
    "status",
    "isArchived",
    "endDate",
    "milestone",
    "createdAtUtc",
    "updatedAtUtc",
    "lastCompletedAtUtc",
];

impl Shape for HabitDto {
    const FIELDS: &'static [&'static str] = HABIT_V1_FIELDS;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Habit representation, version 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HabitDtoV2 {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[schema(value_type = i16)]
    pub habit_type: HabitType,
    pub frequency: FrequencyDto,
    pub target: TargetDto,
    #[schema(value_type = i16)]
    pub status: HabitStatus,
    pub is_archived: bool,
    pub end_date: Option<NaiveDate>,
    pub milestone: Option<MilestoneDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_completed_at: Option<DateTime<Utc>>,
}

const HABIT_V2_FIELDS: &[&str] = &[
    "id",
    "name",
    "description",
    "type",
    "frequency",
    "target",
    "status",
    "isArchived",
    "endDate",
    "milestone",
    "createdAt",
    "updatedAt",
    "lastCompletedAt",
];

impl Shape for HabitDtoV2 {
    const FIELDS: &'static [&'static str] = HABIT_V2_FIELDS;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Single habit with the names of its tags, version 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HabitWithTagsDto {
    #[serde(flatten)]
    pub habit: HabitDto,
    pub tags: Vec<String>,
}

impl Shape for HabitWithTagsDto {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "type",
        "frequency",
        "target",
        "status",
        "isArchived",
        "endDate",
        "milestone",
        "createdAtUtc",
        "updatedAtUtc",
        "lastCompletedAtUtc",
        "tags",
    ];

    fn id(&self) -> &str {
        &self.habit.id
    }
}

/// Single habit with the names of its tags, version 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HabitWithTagsDtoV2 {
    #[serde(flatten)]
    pub habit: HabitDtoV2,
    pub tags: Vec<String>,
}

impl Shape for HabitWithTagsDtoV2 {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "type",
        "frequency",
        "target",
        "status",
        "isArchived",
        "endDate",
        "milestone",
        "createdAt",
        "updatedAt",
        "lastCompletedAt",
        "tags",
    ];

    fn id(&self) -> &str {
        &self.habit.id
    }
}

/// Request to create a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_unit", skip_on_field_errors = false))]
pub struct CreateHabitRequest {
    #[validate(length(min = 3, max = 100, message = "Name must be between 3 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[serde(rename = "type")]
    #[schema(value_type = i16)]
    pub habit_type: HabitType,

    #[validate(nested)]
    pub frequency: FrequencyDto,

    #[validate(nested)]
    pub target: TargetDto,

    #[validate(custom(function = "rules::future_date"))]
    pub end_date: Option<NaiveDate>,

    #[validate(nested)]
    pub milestone: Option<UpdateMilestoneDto>,
}

/// Request to replace the editable fields of a habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_unit", skip_on_field_errors = false))]
pub struct UpdateHabitRequest {
    #[validate(length(min = 3, max = 100, message = "Name must be between 3 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[serde(rename = "type")]
    #[schema(value_type = i16)]
    pub habit_type: HabitType,

    #[validate(nested)]
    pub frequency: FrequencyDto,

    #[validate(nested)]
    pub target: TargetDto,

    #[validate(custom(function = "rules::future_date"))]
    pub end_date: Option<NaiveDate>,

    #[validate(nested)]
    pub milestone: Option<UpdateMilestoneDto>,
}

/// The fields a JSON Patch document may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct HabitPatchTarget {
    #[validate(length(min = 3, max = 100, message = "Name must be between 3 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

fn check_unit(habit_type: HabitType, unit: &str) -> Result<(), ValidationError> {
    if is_unit_allowed(habit_type, unit) {
        Ok(())
    } else {
        let mut error = ValidationError::new("unit");
        error.message = Some(format!("Unit '{}' is not allowed for this habit type", unit).into());
        Err(error)
    }
}

fn validate_create_unit(request: &CreateHabitRequest) -> Result<(), ValidationError> {
    check_unit(request.habit_type, &request.target.unit)
}

fn validate_update_unit(request: &UpdateHabitRequest) -> Result<(), ValidationError> {
    check_unit(request.habit_type, &request.target.unit)
}
