//! Maps authenticated identities to application users.

use async_trait::async_trait;
use devhabit_core::{DevHabitResult, Interface, UserId};
use devhabit_repository::UserRepository;
use parking_lot::RwLock;
use shaku::Component;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a resolved user id stays cached.
pub const USER_ID_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Resolves the application user of an identity (the JWT `sub`).
#[async_trait]
pub trait UserContext: Interface + Send + Sync {
    /// Returns the user id, `None` when no user is linked to the identity.
    async fn user_id(&self, identity_id: &str) -> DevHabitResult<Option<UserId>>;
}

/// User context component with an in-process cache.
#[derive(Component)]
#[shaku(interface = UserContext)]
pub struct UserContextComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(default = USER_ID_CACHE_TTL)]
    ttl: Duration,
    #[shaku(default)]
    cache: RwLock<HashMap<String, (UserId, Instant)>>,
}

impl UserContextComponent {
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self::with_ttl(user_repository, USER_ID_CACHE_TTL)
    }

    #[must_use]
    pub fn with_ttl(user_repository: Arc<dyn UserRepository>, ttl: Duration) -> Self {
        Self {
            user_repository,
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn cached(&self, identity_id: &str) -> Option<UserId> {
        self.cache
            .read()
            .get(identity_id)
            .filter(|(_, stored_at)| stored_at.elapsed() < self.ttl)
            .map(|(user_id, _)| user_id.clone())
    }

    /// Stores a resolved id, dropping entries that outlived the TTL.
    fn remember(&self, identity_id: &str, user_id: UserId) {
        let mut cache = self.cache.write();
        cache.retain(|_, (_, stored_at)| stored_at.elapsed() < self.ttl);
        cache.insert(identity_id.to_string(), (user_id, Instant::now()));
    }

    fn cached_len(&self) -> usize {
        self.cache.read().len()
    }
}

#[async_trait]
impl UserContext for UserContextComponent {
    async fn user_id(&self, identity_id: &str) -> DevHabitResult<Option<UserId>> {
        if let Some(user_id) = self.cached(identity_id) {
            return Ok(Some(user_id));
        }

        debug!("Resolving user of identity {}", identity_id);
        let Some(user) = self.user_repository.find_by_identity_id(identity_id).await? else {
            return Ok(None);
        };

        self.remember(identity_id, user.id.clone());
        Ok(Some(user.id))
    }
}

impl std::fmt::Debug for UserContextComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserContextComponent")
            .field("ttl", &self.ttl)
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devhabit_core::User;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts lookups to observe the cache.
    #[derive(Default)]
    struct CountingUsers {
        users: Vec<User>,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl UserRepository for CountingUsers {
        async fn find_by_id(&self, _id: &UserId) -> DevHabitResult<Option<User>> {
            Ok(None)
        }

        async fn find_by_identity_id(&self, identity_id: &str) -> DevHabitResult<Option<User>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.users.iter().find(|u| u.identity_id == identity_id).cloned())
        }
    }

    #[tokio::test]
    async fn test_resolves_and_caches() {
        let user = User::new("Ada".to_string(), "ada@example.com".to_string(), "identity-1".to_string());
        let repo = Arc::new(CountingUsers {
            users: vec![user.clone()],
            lookups: AtomicUsize::new(0),
        });
        let context = UserContextComponent::new(repo.clone());

        assert_eq!(context.user_id("identity-1").await.unwrap(), Some(user.id.clone()));
        assert_eq!(context.user_id("identity-1").await.unwrap(), Some(user.id));
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_identity_is_not_cached() {
        let repo = Arc::new(CountingUsers::default());
        let context = UserContextComponent::new(repo.clone());

        assert!(context.user_id("nobody").await.unwrap().is_none());
        assert!(context.user_id("nobody").await.unwrap().is_none());
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entries_are_pruned_and_reloaded() {
        let ada = User::new("Ada".to_string(), "ada@example.com".to_string(), "identity-1".to_string());
        let grace = User::new("Grace".to_string(), "grace@example.com".to_string(), "identity-2".to_string());
        let repo = Arc::new(CountingUsers {
            users: vec![ada.clone(), grace.clone()],
            lookups: AtomicUsize::new(0),
        });
        let context = UserContextComponent::with_ttl(repo.clone(), Duration::ZERO);

        assert_eq!(context.user_id("identity-1").await.unwrap(), Some(ada.id.clone()));
        assert_eq!(context.user_id("identity-2").await.unwrap(), Some(grace.id));
        assert_eq!(context.cached_len(), 1);

        assert_eq!(context.user_id("identity-1").await.unwrap(), Some(ada.id));
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 3);
        assert_eq!(context.cached_len(), 1);
    }

    #[test]
    fn test_default_ttl_is_thirty_minutes() {
        let context = UserContextComponent::new(Arc::new(CountingUsers::default()));
        assert_eq!(context.ttl, USER_ID_CACHE_TTL);
        assert_eq!(USER_ID_CACHE_TTL, Duration::from_secs(1800));
    }
}
