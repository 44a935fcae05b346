//! Stored GitHub personal access token.

use crate::{GitHubAccessTokenId, UserId};
use chrono::{DateTime, Duration, Utc};

/// A user's GitHub token. `token` always holds the encrypted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubAccessToken {
    pub id: GitHubAccessTokenId,
    pub user_id: UserId,
    pub token: String,
    pub expires_at_utc: DateTime<Utc>,
    pub created_at_utc: DateTime<Utc>,
}

impl GitHubAccessToken {
    /// Creates a token record expiring `expires_in_days` from now.
    #[must_use]
    pub fn new(user_id: UserId, encrypted_token: String, expires_in_days: i64) -> Self {
        let now = Utc::now();
        Self {
            id: GitHubAccessTokenId::new(),
            user_id,
            token: encrypted_token,
            expires_at_utc: now + Duration::days(expires_in_days),
            created_at_utc: now,
        }
    }

    /// Replaces the token and restarts its lifetime.
    pub fn replace(&mut self, encrypted_token: String, expires_in_days: i64) {
        self.token = encrypted_token;
        self.expires_at_utc = Utc::now() + Duration::days(expires_in_days);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_relative_to_now() {
        let token = GitHubAccessToken::new(UserId::from("u_1"), "cipher".to_string(), 30);
        let days = (token.expires_at_utc - token.created_at_utc).num_days();
        assert_eq!(days, 30);
    }

    #[test]
    fn test_replace_keeps_identity() {
        let mut token = GitHubAccessToken::new(UserId::from("u_1"), "old".to_string(), 1);
        let id = token.id.clone();
        token.replace("new".to_string(), 90);
        assert_eq!(token.id, id);
        assert_eq!(token.token, "new");
        assert!(token.expires_at_utc > Utc::now() + Duration::days(89));
    }
}
