//! User service trait definition.

use async_trait::async_trait;
use devhabit_core::{DevHabitResult, Interface, User, UserId};

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Gets a user by ID. Callers may only read themselves.
    async fn get_user(&self, caller: Option<&UserId>, id: &UserId) -> DevHabitResult<User>;

    /// Gets the calling user.
    async fn get_current_user(&self, caller: Option<&UserId>) -> DevHabitResult<User>;
}
