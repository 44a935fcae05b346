//! In-memory repositories.
//!
//! A single [`MemoryStore`] implements every repository trait over
//! `parking_lot` locked maps. It honours the same ownership scoping,
//! filtering, ordering and paging rules as the PostgreSQL implementations,
//! so service and handler tests can run without a database.

use crate::traits::{
    GitHubAccessTokenRepository, HabitRepository, HabitTagRepository, IdentityRepository, TagRepository,
    UserRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use devhabit_core::{
    DevHabitError, DevHabitResult, GitHubAccessToken, Habit, HabitFilter, HabitId, HabitTag, IdentityUser,
    OrderKey, PageRequest, RefreshToken, SortPlan, Tag, TagId, User, UserId,
};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Shared in-memory backing store for all repositories.
#[derive(Debug, Default)]
pub struct MemoryStore {
    habits: RwLock<HashMap<HabitId, Habit>>,
    tags: RwLock<HashMap<TagId, Tag>>,
    habit_tags: RwLock<Vec<HabitTag>>,
    users: RwLock<HashMap<UserId, User>>,
    identities: RwLock<HashMap<String, IdentityUser>>,
    refresh_tokens: RwLock<Vec<RefreshToken>>,
    github_tokens: RwLock<HashMap<UserId, GitHubAccessToken>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user directly, bypassing registration.
    pub fn add_user(&self, user: User) {
        self.users.write().insert(user.id.clone(), user);
    }

    /// Number of stored refresh tokens.
    #[must_use]
    pub fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.read().len()
    }
}

/// Comparable value of one sortable column.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Time(DateTime<Utc>),
}

fn text(value: &str) -> Option<SortValue> {
    Some(SortValue::Text(value.to_string()))
}

fn habit_column(habit: &Habit, column: &str) -> Option<SortValue> {
    match column {
        "id" => text(habit.id.as_str()),
        "name" => text(&habit.name),
        "description" => habit.description.as_deref().and_then(text),
        "type" => Some(SortValue::Int(i64::from(habit.habit_type.value()))),
        "status" => Some(SortValue::Int(i64::from(habit.status.value()))),
        "frequency_type" => Some(SortValue::Int(i64::from(habit.frequency.frequency_type.value()))),
        "frequency_times_per_period" => Some(SortValue::Int(i64::from(habit.frequency.times_per_period))),
        "target_value" => Some(SortValue::Int(i64::from(habit.target.value))),
        "target_unit" => text(&habit.target.unit),
        "is_archived" => Some(SortValue::Int(i64::from(habit.is_archived))),
        "end_date" => habit.end_date.map(SortValue::Date),
        "created_at_utc" => Some(SortValue::Time(habit.created_at_utc)),
        "updated_at_utc" => habit.updated_at_utc.map(SortValue::Time),
        "last_completed_at_utc" => habit.last_completed_at_utc.map(SortValue::Time),
        _ => None,
    }
}

fn tag_column(tag: &Tag, column: &str) -> Option<SortValue> {
    match column {
        "id" => text(tag.id.as_str()),
        "name" => text(&tag.name),
        "description" => tag.description.as_deref().and_then(text),
        "created_at_utc" => Some(SortValue::Time(tag.created_at_utc)),
        "updated_at_utc" => tag.updated_at_utc.map(SortValue::Time),
        _ => None,
    }
}

/// Orders two rows by a plan. NULLs sort last ascending and first descending,
/// as in PostgreSQL.
fn compare_by<T>(plan: &SortPlan, a: &T, b: &T, column: fn(&T, &str) -> Option<SortValue>) -> Ordering {
    plan.keys()
        .iter()
        .map(|key: &OrderKey| {
            let ordering = match (column(a, key.column), column(b, key.column)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (None, None) => Ordering::Equal,
            };
            if key.descending {
                ordering.reverse()
            } else {
                ordering
            }
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl HabitRepository for MemoryStore {
    async fn find_page(
        &self,
        user_id: &UserId,
        filter: &HabitFilter,
        order: &SortPlan,
        page: PageRequest,
    ) -> DevHabitResult<(Vec<Habit>, u64)> {
        let mut habits: Vec<Habit> = self
            .habits
            .read()
            .values()
            .filter(|h| &h.user_id == user_id && filter.matches(h))
            .cloned()
            .collect();
        habits.sort_by(|a, b| compare_by(order, a, b, habit_column));

        let total = habits.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = habits.into_iter().skip(offset).take(limit).collect();
        Ok((items, total))
    }

    async fn find_by_id(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<Option<Habit>> {
        Ok(self.habits.read().get(id).filter(|h| &h.user_id == user_id).cloned())
    }

    async fn find_with_tags(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<Option<(Habit, Vec<String>)>> {
        let Some(habit) = HabitRepository::find_by_id(self, user_id, id).await? else {
            return Ok(None);
        };

        let tags = self.tags.read();
        let mut names: Vec<String> = self
            .habit_tags
            .read()
            .iter()
            .filter(|link| &link.habit_id == id)
            .filter_map(|link| tags.get(&link.tag_id).map(|t| t.name.clone()))
            .collect();
        names.sort();
        Ok(Some((habit, names)))
    }

    async fn insert(&self, habit: &Habit) -> DevHabitResult<()> {
        self.habits.write().insert(habit.id.clone(), habit.clone());
        Ok(())
    }

    async fn update(&self, habit: &Habit) -> DevHabitResult<()> {
        let mut habits = self.habits.write();
        match habits.get_mut(&habit.id) {
            Some(existing) if existing.user_id == habit.user_id => {
                *existing = habit.clone();
                Ok(())
            }
            _ => Err(DevHabitError::not_found("Habit", &habit.id)),
        }
    }

    async fn delete(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<bool> {
        let mut habits = self.habits.write();
        if !habits.get(id).is_some_and(|h| &h.user_id == user_id) {
            return Ok(false);
        }
        habits.remove(id);
        self.habit_tags.write().retain(|link| &link.habit_id != id);
        Ok(true)
    }

    async fn count(&self, user_id: &UserId) -> DevHabitResult<u64> {
        Ok(self.habits.read().values().filter(|h| &h.user_id == user_id).count() as u64)
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn find_all(&self, user_id: &UserId, order: &SortPlan) -> DevHabitResult<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .tags
            .read()
            .values()
            .filter(|t| &t.user_id == user_id)
            .cloned()
            .collect();
        tags.sort_by(|a, b| compare_by(order, a, b, tag_column));
        Ok(tags)
    }

    async fn find_by_id(&self, user_id: &UserId, id: &TagId) -> DevHabitResult<Option<Tag>> {
        Ok(self.tags.read().get(id).filter(|t| &t.user_id == user_id).cloned())
    }

    async fn exists_by_name(&self, user_id: &UserId, name: &str) -> DevHabitResult<bool> {
        Ok(self
            .tags
            .read()
            .values()
            .any(|t| &t.user_id == user_id && t.name == name))
    }

    async fn existing_ids(&self, user_id: &UserId, ids: &[TagId]) -> DevHabitResult<Vec<TagId>> {
        let tags = self.tags.read();
        Ok(ids
            .iter()
            .filter(|id| tags.get(*id).is_some_and(|t| &t.user_id == user_id))
            .cloned()
            .collect())
    }

    async fn insert(&self, tag: &Tag) -> DevHabitResult<()> {
        let mut tags = self.tags.write();
        if tags.values().any(|t| t.user_id == tag.user_id && t.name == tag.name) {
            return Err(DevHabitError::conflict(format!(
                "The tag '{}' already exists",
                tag.name
            )));
        }
        tags.insert(tag.id.clone(), tag.clone());
        Ok(())
    }

    async fn update(&self, tag: &Tag) -> DevHabitResult<()> {
        let mut tags = self.tags.write();
        match tags.get_mut(&tag.id) {
            Some(existing) if existing.user_id == tag.user_id => {
                *existing = tag.clone();
                Ok(())
            }
            _ => Err(DevHabitError::not_found("Tag", &tag.id)),
        }
    }

    async fn delete(&self, user_id: &UserId, id: &TagId) -> DevHabitResult<bool> {
        let mut tags = self.tags.write();
        if !tags.get(id).is_some_and(|t| &t.user_id == user_id) {
            return Ok(false);
        }
        tags.remove(id);
        self.habit_tags.write().retain(|link| &link.tag_id != id);
        Ok(true)
    }
}

#[async_trait]
impl HabitTagRepository for MemoryStore {
    async fn tag_ids(&self, habit_id: &HabitId) -> DevHabitResult<Vec<TagId>> {
        Ok(self
            .habit_tags
            .read()
            .iter()
            .filter(|link| &link.habit_id == habit_id)
            .map(|link| link.tag_id.clone())
            .collect())
    }

    async fn replace(&self, habit_id: &HabitId, remove: &[TagId], add: &[HabitTag]) -> DevHabitResult<()> {
        let mut links = self.habit_tags.write();
        links.retain(|link| !(&link.habit_id == habit_id && remove.contains(&link.tag_id)));
        links.extend(add.iter().cloned());
        Ok(())
    }

    async fn delete(&self, habit_id: &HabitId, tag_id: &TagId) -> DevHabitResult<bool> {
        let mut links = self.habit_tags.write();
        let before = links.len();
        links.retain(|link| !(&link.habit_id == habit_id && &link.tag_id == tag_id));
        Ok(links.len() < before)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &UserId) -> DevHabitResult<Option<User>> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn find_by_identity_id(&self, identity_id: &str) -> DevHabitResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.identity_id == identity_id)
            .cloned())
    }
}

#[async_trait]
impl IdentityRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> DevHabitResult<Option<IdentityUser>> {
        Ok(self
            .identities
            .read()
            .values()
            .find(|i| i.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> DevHabitResult<Option<IdentityUser>> {
        Ok(self.identities.read().get(id).cloned())
    }

    async fn register(
        &self,
        identity: &IdentityUser,
        user: &User,
        refresh_token: Option<&RefreshToken>,
    ) -> DevHabitResult<()> {
        let mut identities = self.identities.write();
        if identities.values().any(|i| i.email.eq_ignore_ascii_case(&identity.email)) {
            return Err(DevHabitError::conflict("duplicate key value violates unique constraint"));
        }
        identities.insert(identity.id.clone(), identity.clone());
        self.users.write().insert(user.id.clone(), user.clone());
        if let Some(token) = refresh_token {
            self.refresh_tokens.write().push(token.clone());
        }
        Ok(())
    }

    async fn ensure_roles(&self) -> DevHabitResult<()> {
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> DevHabitResult<Option<RefreshToken>> {
        Ok(self.refresh_tokens.read().iter().find(|t| t.token == token).cloned())
    }

    async fn save_refresh_token(&self, token: &RefreshToken) -> DevHabitResult<()> {
        let mut tokens = self.refresh_tokens.write();
        match tokens.iter_mut().find(|t| t.id == token.id) {
            Some(existing) => *existing = token.clone(),
            None => tokens.push(token.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl GitHubAccessTokenRepository for MemoryStore {
    async fn find_by_user(&self, user_id: &UserId) -> DevHabitResult<Option<GitHubAccessToken>> {
        Ok(self.github_tokens.read().get(user_id).cloned())
    }

    async fn upsert(&self, token: &GitHubAccessToken) -> DevHabitResult<()> {
        self.github_tokens
            .write()
            .entry(token.user_id.clone())
            .and_modify(|existing| {
                existing.token.clone_from(&token.token);
                existing.expires_at_utc = token.expires_at_utc;
            })
            .or_insert_with(|| token.clone());
        Ok(())
    }

    async fn delete_by_user(&self, user_id: &UserId) -> DevHabitResult<bool> {
        Ok(self.github_tokens.write().remove(user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devhabit_core::{Frequency, FrequencyType, HabitStatus, HabitType, Role, SortMapping, Target};

    const MAPPINGS: &[SortMapping] = &[
        SortMapping::new("name", &["name"]),
        SortMapping::new("endDate", &["end_date"]),
        SortMapping::new("frequency", &["frequency_type", "frequency_times_per_period"]),
    ];

    fn plan(sort: Option<&str>) -> SortPlan {
        SortPlan::resolve(sort, MAPPINGS, &[OrderKey::asc("name")], "id").unwrap()
    }

    fn habit(user: &UserId, name: &str, times: i32) -> Habit {
        Habit::new(
            user.clone(),
            name.to_string(),
            HabitType::Binary,
            Frequency {
                frequency_type: FrequencyType::Daily,
                times_per_period: times,
            },
            Target {
                value: 1,
                unit: "sessions".to_string(),
            },
        )
    }

    async fn seeded(user: &UserId) -> MemoryStore {
        let store = MemoryStore::new();
        for (name, times) in [("Read", 1), ("Code", 3), ("Walk", 2)] {
            HabitRepository::insert(&store, &habit(user, name, times)).await.unwrap();
        }
        store
    }

    fn names(habits: &[Habit]) -> Vec<&str> {
        habits.iter().map(|h| h.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_find_page_orders_and_pages() {
        let user = UserId::from("u_1");
        let store = seeded(&user).await;

        let (items, total) = store
            .find_page(&user, &HabitFilter::default(), &plan(Some("-name")), PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(names(&items), vec!["Walk", "Read"]);

        let (items, _) = store
            .find_page(&user, &HabitFilter::default(), &plan(Some("-name")), PageRequest::new(2, 2))
            .await
            .unwrap();
        assert_eq!(names(&items), vec!["Code"]);
    }

    #[tokio::test]
    async fn test_find_page_composite_sort() {
        let user = UserId::from("u_1");
        let store = seeded(&user).await;

        let (items, _) = store
            .find_page(&user, &HabitFilter::default(), &plan(Some("frequency")), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(names(&items), vec!["Read", "Walk", "Code"]);
    }

    #[tokio::test]
    async fn test_find_page_nulls_sort_last_ascending() {
        let user = UserId::from("u_1");
        let store = MemoryStore::new();
        let mut dated = habit(&user, "Dated", 1);
        dated.end_date = NaiveDate::from_ymd_opt(2030, 1, 1);
        HabitRepository::insert(&store, &habit(&user, "Open", 1)).await.unwrap();
        HabitRepository::insert(&store, &dated).await.unwrap();

        let (items, _) = store
            .find_page(&user, &HabitFilter::default(), &plan(Some("endDate")), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(names(&items), vec!["Dated", "Open"]);
    }

    #[tokio::test]
    async fn test_find_page_filters_and_scopes_by_user() {
        let user = UserId::from("u_1");
        let store = seeded(&user).await;
        HabitRepository::insert(&store, &habit(&UserId::from("u_2"), "Read", 1))
            .await
            .unwrap();

        let filter = HabitFilter {
            search: Some("rea".to_string()),
            status: Some(HabitStatus::Ongoing),
            ..HabitFilter::default()
        };
        let (items, total) = store
            .find_page(&user, &filter, &plan(None), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].user_id, user);
    }

    #[tokio::test]
    async fn test_other_users_rows_are_invisible() {
        let owner = UserId::from("u_1");
        let store = seeded(&owner).await;
        let (items, _) = store
            .find_page(&owner, &HabitFilter::default(), &plan(None), PageRequest::default())
            .await
            .unwrap();
        let id = items[0].id.clone();
        let stranger = UserId::from("u_2");

        assert!(HabitRepository::find_by_id(&store, &stranger, &id).await.unwrap().is_none());
        assert!(!HabitRepository::delete(&store, &stranger, &id).await.unwrap());
        assert!(HabitRepository::delete(&store, &owner, &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_habit_tags_replace_and_names() {
        let user = UserId::from("u_1");
        let store = MemoryStore::new();
        let habit = habit(&user, "Read", 1);
        HabitRepository::insert(&store, &habit).await.unwrap();
        let zen = Tag::new(user.clone(), "Zen".to_string(), None);
        let art = Tag::new(user.clone(), "Art".to_string(), None);
        TagRepository::insert(&store, &zen).await.unwrap();
        TagRepository::insert(&store, &art).await.unwrap();

        let add = vec![HabitTag::new(habit.id.clone(), zen.id.clone()), HabitTag::new(habit.id.clone(), art.id.clone())];
        store.replace(&habit.id, &[], &add).await.unwrap();
        let (_, tags) = store.find_with_tags(&user, &habit.id).await.unwrap().unwrap();
        assert_eq!(tags, vec!["Art".to_string(), "Zen".to_string()]);

        store.replace(&habit.id, &[zen.id.clone()], &[]).await.unwrap();
        assert_eq!(store.tag_ids(&habit.id).await.unwrap(), vec![art.id.clone()]);

        assert!(HabitTagRepository::delete(&store, &habit.id, &art.id).await.unwrap());
        assert!(!HabitTagRepository::delete(&store, &habit.id, &art.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_tag_name_is_unique_per_user() {
        let store = MemoryStore::new();
        let first = Tag::new(UserId::from("u_1"), "Health".to_string(), None);
        TagRepository::insert(&store, &first).await.unwrap();

        let duplicate = Tag::new(UserId::from("u_1"), "Health".to_string(), None);
        let err = TagRepository::insert(&store, &duplicate).await.unwrap_err();
        assert_eq!(err.status_code(), 409);

        let other_user = Tag::new(UserId::from("u_2"), "Health".to_string(), None);
        assert!(TagRepository::insert(&store, &other_user).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let identity = IdentityUser::new("a@b.c".to_string(), "hash".to_string(), vec![Role::Member]);
        let user = User::new("A".to_string(), "a@b.c".to_string(), identity.id.clone());
        store.register(&identity, &user, None).await.unwrap();

        let again = IdentityUser::new("A@B.C".to_string(), "hash".to_string(), vec![Role::Member]);
        let user = User::new("A".to_string(), "A@B.C".to_string(), again.id.clone());
        let err = store.register(&again, &user, None).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert!(store.find_by_email("A@b.C").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_refresh_token_upserts_by_id() {
        let store = MemoryStore::new();
        let mut token = RefreshToken::new("id".to_string(), "first".to_string(), 7);
        store.save_refresh_token(&token).await.unwrap();
        token.rotate("second".to_string(), 7);
        store.save_refresh_token(&token).await.unwrap();

        assert_eq!(store.refresh_token_count(), 1);
        assert!(store.find_refresh_token("first").await.unwrap().is_none());
        assert!(store.find_refresh_token("second").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_github_token_upsert_keeps_id() {
        let store = MemoryStore::new();
        let user = UserId::from("u_1");
        let first = GitHubAccessToken::new(user.clone(), "one".to_string(), 1);
        store.upsert(&first).await.unwrap();
        store
            .upsert(&GitHubAccessToken::new(user.clone(), "two".to_string(), 30))
            .await
            .unwrap();

        let stored = store.find_by_user(&user).await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.token, "two");
        assert!(store.delete_by_user(&user).await.unwrap());
        assert!(!store.delete_by_user(&user).await.unwrap());
    }
}
