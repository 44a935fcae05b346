//! JWT claims structure.

use chrono::{DateTime, Utc};
use devhabit_core::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity id).
    pub sub: String,

    /// Identity email.
    pub email: String,

    /// Role names.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Issued at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// JWT ID (unique identifier for this token).
    pub jti: String,
}

impl Claims {
    /// Creates access token claims.
    #[must_use]
    pub fn new(
        identity_id: String,
        email: String,
        roles: Vec<String>,
        issuer: String,
        audience: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: identity_id,
            email,
            roles,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer,
            aud: audience,
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Returns the identity id.
    #[must_use]
    pub fn identity_id(&self) -> &str {
        &self.sub
    }

    /// Checks if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks if the token carries `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(roles: &[&str]) -> Claims {
        Claims::new(
            "identity-1".to_string(),
            "test@example.com".to_string(),
            roles.iter().map(ToString::to_string).collect(),
            "issuer".to_string(),
            "audience".to_string(),
            Utc::now() + Duration::hours(1),
        )
    }

    #[test]
    fn test_new_claims() {
        let claims = claims(&["Member"]);
        assert_eq!(claims.identity_id(), "identity-1");
        assert!(!claims.is_expired());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_role_check() {
        let claims = claims(&["member"]);
        assert!(claims.has_role(Role::Member));
        assert!(!claims.has_role(Role::Admin));
    }

    #[test]
    fn test_missing_roles_deserialize_as_empty() {
        let json = r#"{"sub":"s","email":"e","iat":0,"exp":1,"iss":"i","aud":"a","jti":"j"}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert!(claims.roles.is_empty());
        assert!(claims.is_expired());
    }
}
