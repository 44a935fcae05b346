//! Repository trait definitions.
//!
//! Every query on user owned data takes the owner's id; rows of other users
//! are never visible through these traits.

use async_trait::async_trait;
use devhabit_core::{
    DevHabitResult, GitHubAccessToken, Habit, HabitFilter, HabitId, HabitTag, IdentityUser, Interface, PageRequest,
    RefreshToken, SortPlan, Tag, TagId, User, UserId,
};

/// Habit repository trait.
#[async_trait]
pub trait HabitRepository: Interface {
    /// Returns one page of filtered, ordered habits and the total match count.
    async fn find_page(
        &self,
        user_id: &UserId,
        filter: &HabitFilter,
        order: &SortPlan,
        page: PageRequest,
    ) -> DevHabitResult<(Vec<Habit>, u64)>;

    /// Finds a habit by ID.
    async fn find_by_id(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<Option<Habit>>;

    /// Finds a habit with the names of its tags.
    async fn find_with_tags(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<Option<(Habit, Vec<String>)>>;

    /// Inserts a new habit.
    async fn insert(&self, habit: &Habit) -> DevHabitResult<()>;

    /// Updates an existing habit.
    async fn update(&self, habit: &Habit) -> DevHabitResult<()>;

    /// Deletes a habit. Returns `true` if deleted.
    async fn delete(&self, user_id: &UserId, id: &HabitId) -> DevHabitResult<bool>;

    /// Counts the habits of a user.
    async fn count(&self, user_id: &UserId) -> DevHabitResult<u64>;
}

/// Tag repository trait.
#[async_trait]
pub trait TagRepository: Interface {
    /// Returns all tags of a user in the given order.
    async fn find_all(&self, user_id: &UserId, order: &SortPlan) -> DevHabitResult<Vec<Tag>>;

    /// Finds a tag by ID.
    async fn find_by_id(&self, user_id: &UserId, id: &TagId) -> DevHabitResult<Option<Tag>>;

    /// Checks if the user already has a tag called `name`.
    async fn exists_by_name(&self, user_id: &UserId, name: &str) -> DevHabitResult<bool>;

    /// Returns the subset of `ids` that name tags of the user.
    async fn existing_ids(&self, user_id: &UserId, ids: &[TagId]) -> DevHabitResult<Vec<TagId>>;

    /// Inserts a new tag.
    async fn insert(&self, tag: &Tag) -> DevHabitResult<()>;

    /// Updates an existing tag.
    async fn update(&self, tag: &Tag) -> DevHabitResult<()>;

    /// Deletes a tag. Returns `true` if deleted.
    async fn delete(&self, user_id: &UserId, id: &TagId) -> DevHabitResult<bool>;
}

/// Habit to tag link repository trait.
#[async_trait]
pub trait HabitTagRepository: Interface {
    /// Returns the ids of tags linked to a habit.
    async fn tag_ids(&self, habit_id: &HabitId) -> DevHabitResult<Vec<TagId>>;

    /// Removes and adds links atomically.
    async fn replace(&self, habit_id: &HabitId, remove: &[TagId], add: &[HabitTag]) -> DevHabitResult<()>;

    /// Deletes one link. Returns `true` if deleted.
    async fn delete(&self, habit_id: &HabitId, tag_id: &TagId) -> DevHabitResult<bool>;
}

/// Application user repository trait.
#[async_trait]
pub trait UserRepository: Interface {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: &UserId) -> DevHabitResult<Option<User>>;

    /// Finds the user linked to an identity account.
    async fn find_by_identity_id(&self, identity_id: &str) -> DevHabitResult<Option<User>>;
}

/// Identity account and refresh token repository trait.
#[async_trait]
pub trait IdentityRepository: Interface {
    /// Finds an identity by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> DevHabitResult<Option<IdentityUser>>;

    /// Finds an identity by ID.
    async fn find_by_id(&self, id: &str) -> DevHabitResult<Option<IdentityUser>>;

    /// Creates the identity, its roles, the application user and optionally a
    /// refresh token in one transaction.
    async fn register(
        &self,
        identity: &IdentityUser,
        user: &User,
        refresh_token: Option<&RefreshToken>,
    ) -> DevHabitResult<()>;

    /// Inserts the known roles if missing.
    async fn ensure_roles(&self) -> DevHabitResult<()>;

    /// Finds a refresh token by value.
    async fn find_refresh_token(&self, token: &str) -> DevHabitResult<Option<RefreshToken>>;

    /// Inserts or updates a refresh token by id.
    async fn save_refresh_token(&self, token: &RefreshToken) -> DevHabitResult<()>;
}

/// GitHub personal access token repository trait.
#[async_trait]
pub trait GitHubAccessTokenRepository: Interface {
    /// Finds the token of a user.
    async fn find_by_user(&self, user_id: &UserId) -> DevHabitResult<Option<GitHubAccessToken>>;

    /// Inserts or replaces the token of a user.
    async fn upsert(&self, token: &GitHubAccessToken) -> DevHabitResult<()>;

    /// Deletes the token of a user. Returns `true` if deleted.
    async fn delete_by_user(&self, user_id: &UserId) -> DevHabitResult<bool>;
}
