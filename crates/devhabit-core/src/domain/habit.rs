//! Habit entity and its value objects.

use crate::{DevHabitError, HabitId, TagId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Declares a fieldless enum stored and serialized as its `i16` value.
macro_rules! int_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(try_from = "i16", into = "i16")]
        pub enum $name {
            #[default]
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            /// All values in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stored integer value.
            #[must_use]
            pub const fn value(self) -> i16 {
                self as i16
            }
        }

        impl From<$name> for i16 {
            fn from(value: $name) -> Self {
                value as i16
            }
        }

        impl TryFrom<i16> for $name {
            type Error = DevHabitError;

            fn try_from(value: i16) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(DevHabitError::validation(format!(
                        "{} is not a valid {}",
                        other,
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

int_enum!(
    /// How a habit is measured.
    HabitType {
        None = 0,
        /// Done or not done.
        Binary = 1,
        /// Tracked against a numeric target.
        Measurable = 2,
    }
);

int_enum!(
    /// Lifecycle state of a habit.
    HabitStatus {
        None = 0,
        Ongoing = 1,
        Completed = 2,
    }
);

int_enum!(
    /// Period a habit repeats in.
    FrequencyType {
        None = 0,
        Daily = 1,
        Weekly = 2,
        Monthly = 3,
        Yearly = 4,
    }
);

/// How often a habit should be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Frequency {
    pub frequency_type: FrequencyType,
    pub times_per_period: i32,
}

/// Amount to reach per occurrence, e.g. 30 minutes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Target {
    pub value: i32,
    pub unit: String,
}

/// Long running goal attached to a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Milestone {
    pub target: i32,
    pub current: i32,
}

/// Units a habit target may use.
pub const ALLOWED_UNITS: &[&str] = &[
    "minutes", "hours", "steps", "km", "cal", "pages", "books", "tasks", "sessions",
];

/// Units a binary habit may use.
pub const BINARY_UNITS: &[&str] = &["sessions", "tasks"];

/// Checks that `unit` is allowed for a habit of `habit_type`.
#[must_use]
pub fn is_unit_allowed(habit_type: HabitType, unit: &str) -> bool {
    let unit = unit.to_lowercase();
    let allowed = match habit_type {
        HabitType::Binary => BINARY_UNITS,
        HabitType::None | HabitType::Measurable => ALLOWED_UNITS,
    };
    allowed.contains(&unit.as_str())
}

/// A habit owned by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct Habit {
    pub id: HabitId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub habit_type: HabitType,
    pub frequency: Frequency,
    pub target: Target,
    pub status: HabitStatus,
    pub is_archived: bool,
    pub end_date: Option<NaiveDate>,
    pub milestone: Option<Milestone>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: Option<DateTime<Utc>>,
    pub last_completed_at_utc: Option<DateTime<Utc>>,
}

impl Habit {
    /// Creates an ongoing, unarchived habit.
    #[must_use]
    pub fn new(user_id: UserId, name: String, habit_type: HabitType, frequency: Frequency, target: Target) -> Self {
        Self {
            id: HabitId::new(),
            user_id,
            name,
            description: None,
            habit_type,
            frequency,
            target,
            status: HabitStatus::Ongoing,
            is_archived: false,
            end_date: None,
            milestone: None,
            created_at_utc: Utc::now(),
            updated_at_utc: None,
            last_completed_at_utc: None,
        }
    }

    /// Replaces name and description, the only fields a partial update touches.
    pub fn rename(&mut self, name: String, description: Option<String>) {
        self.name = name;
        self.description = description;
        self.touch();
    }

    /// Sets the milestone target, creating the milestone when absent.
    pub fn set_milestone_target(&mut self, target: i32) {
        self.milestone.get_or_insert_with(Milestone::default).target = target;
    }

    /// Records a modification.
    pub fn touch(&mut self) {
        self.updated_at_utc = Some(Utc::now());
    }
}

/// Link between a habit and a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitTag {
    pub habit_id: HabitId,
    pub tag_id: TagId,
    pub created_at_utc: DateTime<Utc>,
}

impl HabitTag {
    #[must_use]
    pub fn new(habit_id: HabitId, tag_id: TagId) -> Self {
        Self {
            habit_id,
            tag_id,
            created_at_utc: Utc::now(),
        }
    }
}

/// Filter applied to habit list queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitFilter {
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
    pub habit_type: Option<HabitType>,
    pub status: Option<HabitStatus>,
}

impl HabitFilter {
    /// Normalized search term, `None` when blank.
    #[must_use]
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Checks an in-memory habit against the filter.
    #[must_use]
    pub fn matches(&self, habit: &Habit) -> bool {
        if self.habit_type.is_some_and(|t| t != habit.habit_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != habit.status) {
            return false;
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                habit.name.to_lowercase().contains(&term)
                    || habit
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
        }
    }
}
