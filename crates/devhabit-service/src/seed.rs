//! Development seed data.
//!
//! Inserted rows bypass request validation, a few sample habits use units
//! or end dates a request would reject.

use chrono::{Duration, Months, Utc};
use devhabit_core::{
    DevHabitError, DevHabitResult, Frequency, FrequencyType, Habit, HabitStatus, HabitType, IdentityUser, Milestone,
    Role, Target, User,
};
use devhabit_repository::{HabitRepository, IdentityRepository, UserRepository};
use devhabit_security::PasswordHasherInterface;
use std::sync::Arc;
use tracing::{debug, info};

/// Email of the seeded demo member.
pub const DEMO_EMAIL: &str = "demo@devhabit.local";

/// Password of the seeded demo member.
pub const DEMO_PASSWORD: &str = "Demo123!";

/// Seeds roles, the demo member and sample habits.
pub struct DataSeeder {
    identity_repository: Arc<dyn IdentityRepository>,
    user_repository: Arc<dyn UserRepository>,
    habit_repository: Arc<dyn HabitRepository>,
    password_hasher: Arc<dyn PasswordHasherInterface>,
}

impl DataSeeder {
    #[must_use]
    pub fn new(
        identity_repository: Arc<dyn IdentityRepository>,
        user_repository: Arc<dyn UserRepository>,
        habit_repository: Arc<dyn HabitRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
    ) -> Self {
        Self {
            identity_repository,
            user_repository,
            habit_repository,
            password_hasher,
        }
    }

    /// Runs every seed step. Each step is skipped when already applied.
    pub async fn seed(&self) -> DevHabitResult<()> {
        self.identity_repository.ensure_roles().await?;

        let user = self.demo_user().await?;
        if self.habit_repository.count(&user.id).await? > 0 {
            debug!("Demo user already has habits, skipping habit seed");
            return Ok(());
        }

        let habits = sample_habits(&user);
        for habit in &habits {
            self.habit_repository.insert(habit).await?;
        }

        info!("Seeded {} habits into the database", habits.len());
        Ok(())
    }

    async fn demo_user(&self) -> DevHabitResult<User> {
        if let Some(identity) = self.identity_repository.find_by_email(DEMO_EMAIL).await? {
            return self
                .user_repository
                .find_by_identity_id(&identity.id)
                .await?
                .ok_or_else(|| DevHabitError::internal("Demo identity has no application user"));
        }

        let password_hash = self.password_hasher.hash(DEMO_PASSWORD)?;
        let identity = IdentityUser::new(DEMO_EMAIL.to_string(), password_hash, vec![Role::Member]);
        let user = User::new("Demo User".to_string(), DEMO_EMAIL.to_string(), identity.id.clone());
        self.identity_repository.register(&identity, &user, None).await?;

        info!("Seeded demo user {}", DEMO_EMAIL);
        Ok(user)
    }
}

impl std::fmt::Debug for DataSeeder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSeeder").finish_non_exhaustive()
    }
}

struct SampleHabit {
    name: &'static str,
    description: &'static str,
    habit_type: HabitType,
    frequency: (FrequencyType, i32),
    target: (i32, &'static str),
    milestone: Option<(i32, i32)>,
    created_days_ago: i64,
    completed_days_ago: i64,
    end: SampleEnd,
    finished: bool,
}

#[derive(Clone, Copy)]
enum SampleEnd {
    Open,
    InMonths(u32),
    DaysAgo(i64),
}

const SAMPLE_HABITS: &[SampleHabit] = &[
    SampleHabit {
        name: "Morning Exercise",
        description: "30 minutes of morning workout to start the day energetically",
        habit_type: HabitType::Measurable,
        frequency: (FrequencyType::Daily, 1),
        target: (30, "minutes"),
        milestone: Some((100, 25)),
        created_days_ago: 30,
        completed_days_ago: 1,
        end: SampleEnd::Open,
        finished: false,
    },
    SampleHabit {
        name: "Read Books",
        description: "Reading at least 20 pages per day to improve knowledge",
        habit_type: HabitType::Measurable,
        frequency: (FrequencyType::Daily, 1),
        target: (20, "pages"),
        milestone: Some((50, 35)),
        created_days_ago: 20,
        completed_days_ago: 1,
        end: SampleEnd::Open,
        finished: false,
    },
    SampleHabit {
        name: "Drink Water",
        description: "Stay hydrated by drinking enough water throughout the day",
        habit_type: HabitType::Measurable,
        frequency: (FrequencyType::Daily, 8),
        target: (8, "glasses"),
        milestone: Some((200, 150)),
        created_days_ago: 45,
        completed_days_ago: 0,
        end: SampleEnd::Open,
        finished: false,
    },
    SampleHabit {
        name: "Meditation",
        description: "Daily meditation for mental wellness and stress relief",
        habit_type: HabitType::Binary,
        frequency: (FrequencyType::Daily, 1),
        target: (15, "minutes"),
        milestone: None,
        created_days_ago: 15,
        completed_days_ago: 2,
        end: SampleEnd::Open,
        finished: false,
    },
    SampleHabit {
        name: "Learn Programming",
        description: "Weekly coding practice to improve programming skills",
        habit_type: HabitType::Measurable,
        frequency: (FrequencyType::Weekly, 3),
        target: (2, "hours"),
        milestone: Some((20, 8)),
        created_days_ago: 60,
        completed_days_ago: 3,
        end: SampleEnd::InMonths(6),
        finished: false,
    },
    SampleHabit {
        name: "Social Media Detox",
        description: "Completed 30-day challenge to reduce social media usage",
        habit_type: HabitType::Binary,
        frequency: (FrequencyType::Daily, 1),
        target: (0, "hours"),
        milestone: Some((30, 30)),
        created_days_ago: 35,
        completed_days_ago: 5,
        end: SampleEnd::DaysAgo(5),
        finished: true,
    },
    SampleHabit {
        name: "Yoga Practice",
        description: "Weekly yoga sessions for flexibility and mental peace",
        habit_type: HabitType::Binary,
        frequency: (FrequencyType::Weekly, 2),
        target: (45, "minutes"),
        milestone: Some((24, 12)),
        created_days_ago: 40,
        completed_days_ago: 4,
        end: SampleEnd::Open,
        finished: false,
    },
    SampleHabit {
        name: "Write Journal",
        description: "Daily journaling to reflect on thoughts and experiences",
        habit_type: HabitType::Binary,
        frequency: (FrequencyType::Daily, 1),
        target: (10, "minutes"),
        milestone: Some((365, 180)),
        created_days_ago: 180,
        completed_days_ago: 1,
        end: SampleEnd::Open,
        finished: false,
    },
    SampleHabit {
        name: "Monthly Budget Review",
        description: "Review and update personal budget every month",
        habit_type: HabitType::Binary,
        frequency: (FrequencyType::Monthly, 1),
        target: (60, "minutes"),
        milestone: Some((12, 3)),
        created_days_ago: 90,
        completed_days_ago: 30,
        end: SampleEnd::InMonths(12),
        finished: false,
    },
    SampleHabit {
        name: "Learn New Language",
        description: "Practice Spanish using language learning app",
        habit_type: HabitType::Measurable,
        frequency: (FrequencyType::Daily, 1),
        target: (25, "minutes"),
        milestone: Some((365, 42)),
        created_days_ago: 42,
        completed_days_ago: 0,
        end: SampleEnd::InMonths(12),
        finished: false,
    },
];

fn sample_habits(user: &User) -> Vec<Habit> {
    let now = Utc::now();
    let today = now.date_naive();

    SAMPLE_HABITS
        .iter()
        .map(|sample| {
            let mut habit = Habit::new(
                user.id.clone(),
                sample.name.to_string(),
                sample.habit_type,
                Frequency {
                    frequency_type: sample.frequency.0,
                    times_per_period: sample.frequency.1,
                },
                Target {
                    value: sample.target.0,
                    unit: sample.target.1.to_string(),
                },
            );
            habit.description = Some(sample.description.to_string());
            habit.milestone = sample.milestone.map(|(target, current)| Milestone { target, current });
            habit.created_at_utc = now - Duration::days(sample.created_days_ago);
            habit.last_completed_at_utc = Some(now - Duration::days(sample.completed_days_ago));
            habit.end_date = match sample.end {
                SampleEnd::Open => None,
                SampleEnd::InMonths(months) => today.checked_add_months(Months::new(months)),
                SampleEnd::DaysAgo(days) => Some(today - Duration::days(days)),
            };
            if sample.finished {
                habit.status = HabitStatus::Completed;
                habit.is_archived = true;
            }
            habit
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use devhabit_repository::MemoryStore;
    use devhabit_security::PasswordHasher;

    fn seeder(store: &Arc<MemoryStore>) -> DataSeeder {
        DataSeeder::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(PasswordHasher::with_cost(1)),
        )
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let seeder = seeder(&store);

        seeder.seed().await.unwrap();
        seeder.seed().await.unwrap();

        let identity = store.find_by_email(DEMO_EMAIL).await.unwrap().unwrap();
        let user = store.find_by_identity_id(&identity.id).await.unwrap().unwrap();
        assert_eq!(HabitRepository::count(store.as_ref(), &user.id).await.unwrap(), 10);
    }

    #[test]
    fn test_sample_habits() {
        let user = User::new("Demo".to_string(), DEMO_EMAIL.to_string(), "identity".to_string());
        let habits = sample_habits(&user);
        assert_eq!(habits.len(), 10);

        let detox = habits.iter().find(|h| h.name == "Social Media Detox").unwrap();
        assert_eq!(detox.status, HabitStatus::Completed);
        assert!(detox.is_archived);

        let exercise = &habits[0];
        assert_eq!(exercise.milestone, Some(Milestone { target: 100, current: 25 }));
        assert!(exercise.created_at_utc < Utc::now() - Duration::days(29));
    }
}
