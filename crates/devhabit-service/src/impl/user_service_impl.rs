//! User service implementation.

use crate::user_service::UserService;
use async_trait::async_trait;
use devhabit_core::{DevHabitError, DevHabitResult, User, UserId};
use devhabit_repository::UserRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::debug;

/// User service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
}

impl UserServiceComponent {
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }
}

fn require_caller(caller: Option<&UserId>) -> DevHabitResult<&UserId> {
    caller.ok_or_else(|| DevHabitError::unauthorized("User is not authenticated."))
}

#[async_trait]
impl UserService for UserServiceComponent {
    async fn get_user(&self, caller: Option<&UserId>, id: &UserId) -> DevHabitResult<User> {
        debug!("Getting user: {}", id);

        let caller = require_caller(caller)?;
        if caller != id {
            return Err(DevHabitError::forbidden("Users may only read their own profile."));
        }

        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DevHabitError::not_found("User", id))
    }

    async fn get_current_user(&self, caller: Option<&UserId>) -> DevHabitResult<User> {
        let caller = require_caller(caller)?;
        debug!("Getting current user: {}", caller);

        self.user_repository
            .find_by_id(caller)
            .await?
            .ok_or_else(|| DevHabitError::missing("Current user not found."))
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devhabit_repository::MemoryStore;

    fn service_with_user() -> (UserServiceComponent, User) {
        let store = Arc::new(MemoryStore::new());
        let user = User::new("Ada".to_string(), "ada@example.com".to_string(), "identity-1".to_string());
        store.add_user(user.clone());
        (UserServiceComponent::new(store), user)
    }

    #[tokio::test]
    async fn test_get_user_checks_caller() {
        let (service, user) = service_with_user();

        let err = service.get_user(None, &user.id).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.to_string(), "User is not authenticated.");

        let other = UserId::from("u_other");
        assert_eq!(service.get_user(Some(&other), &user.id).await.unwrap_err().status_code(), 403);

        let found = service.get_user(Some(&user.id), &user.id).await.unwrap();
        assert_eq!(found.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_current_user() {
        let (service, user) = service_with_user();
        assert_eq!(service.get_current_user(Some(&user.id)).await.unwrap().id, user.id);

        let missing = UserId::from("u_missing");
        let err = service.get_current_user(Some(&missing)).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Current user not found.");
    }
}
