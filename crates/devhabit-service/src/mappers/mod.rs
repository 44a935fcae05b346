//! Entity-DTO mappers.

use crate::dto::{
    CreateHabitRequest, CreateTagRequest, FrequencyDto, HabitDto, HabitDtoV2, HabitPatchTarget, HabitWithTagsDto,
    HabitWithTagsDtoV2, MilestoneDto, TagDto, TargetDto, UpdateHabitRequest, UserDto,
};
use devhabit_core::{Frequency, Habit, Milestone, Tag, Target, User, UserId};

impl From<&Frequency> for FrequencyDto {
    fn from(frequency: &Frequency) -> Self {
        Self {
            frequency_type: frequency.frequency_type,
            times_per_period: frequency.times_per_period,
        }
    }
}

impl From<FrequencyDto> for Frequency {
    fn from(dto: FrequencyDto) -> Self {
        Self {
            frequency_type: dto.frequency_type,
            times_per_period: dto.times_per_period,
        }
    }
}

impl From<&Target> for TargetDto {
    fn from(target: &Target) -> Self {
        Self {
            value: target.value,
            unit: target.unit.clone(),
        }
    }
}

impl From<TargetDto> for Target {
    fn from(dto: TargetDto) -> Self {
        Self {
            value: dto.value,
            unit: dto.unit,
        }
    }
}

impl From<&Milestone> for MilestoneDto {
    fn from(milestone: &Milestone) -> Self {
        Self {
            target: milestone.target,
            current: milestone.current,
        }
    }
}

impl From<&Habit> for HabitDto {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id.to_string(),
            name: habit.name.clone(),
            description: habit.description.clone(),
            habit_type: habit.habit_type,
            frequency: FrequencyDto::from(&habit.frequency),
            target: TargetDto::from(&habit.target),
            status: habit.status,
            is_archived: habit.is_archived,
            end_date: habit.end_date,
            milestone: habit.milestone.as_ref().map(MilestoneDto::from),
            created_at_utc: habit.created_at_utc,
            updated_at_utc: habit.updated_at_utc,
            last_completed_at_utc: habit.last_completed_at_utc,
        }
    }
}

impl From<&Habit> for HabitDtoV2 {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id.to_string(),
            name: habit.name.clone(),
            description: habit.description.clone(),
            habit_type: habit.habit_type,
            frequency: FrequencyDto::from(&habit.frequency),
            target: TargetDto::from(&habit.target),
            status: habit.status,
            is_archived: habit.is_archived,
            end_date: habit.end_date,
            milestone: habit.milestone.as_ref().map(MilestoneDto::from),
            created_at: habit.created_at_utc,
            updated_at: habit.updated_at_utc,
            last_completed_at: habit.last_completed_at_utc,
        }
    }
}

impl HabitWithTagsDto {
    #[must_use]
    pub fn new(habit: &Habit, tags: Vec<String>) -> Self {
        Self {
            habit: HabitDto::from(habit),
            tags,
        }
    }
}

impl HabitWithTagsDtoV2 {
    #[must_use]
    pub fn new(habit: &Habit, tags: Vec<String>) -> Self {
        Self {
            habit: HabitDtoV2::from(habit),
            tags,
        }
    }
}

impl CreateHabitRequest {
    /// Builds a new ongoing habit owned by `user_id`.
    #[must_use]
    pub fn into_habit(self, user_id: UserId) -> Habit {
        let mut habit = Habit::new(
            user_id,
            self.name,
            self.habit_type,
            self.frequency.into(),
            self.target.into(),
        );
        habit.description = self.description;
        habit.end_date = self.end_date;
        if let Some(milestone) = self.milestone {
            habit.set_milestone_target(milestone.target);
        }
        habit
    }
}

impl UpdateHabitRequest {
    /// Copies every editable field onto `habit`.
    pub fn apply_to(self, habit: &mut Habit) {
        habit.habit_type = self.habit_type;
        habit.frequency = self.frequency.into();
        habit.target = self.target.into();
        habit.end_date = self.end_date;
        if let Some(milestone) = self.milestone {
            habit.set_milestone_target(milestone.target);
        }
        habit.rename(self.name, self.description);
    }
}

impl From<&Habit> for HabitPatchTarget {
    fn from(habit: &Habit) -> Self {
        Self {
            name: habit.name.clone(),
            description: habit.description.clone(),
        }
    }
}

impl From<&Tag> for TagDto {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.to_string(),
            name: tag.name.clone(),
            description: tag.description.clone(),
            created_at_utc: tag.created_at_utc,
            updated_at_utc: tag.updated_at_utc,
        }
    }
}

impl CreateTagRequest {
    #[must_use]
    pub fn into_tag(self, user_id: UserId) -> Tag {
        Tag::new(user_id, self.name, self.description)
    }
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at_utc: user.created_at_utc,
            updated_at_utc: user.updated_at_utc,
            links: None,
        }
    }
}
