//! Role checks on validated claims.

use crate::Claims;
use devhabit_core::{DevHabitError, DevHabitResult, Role};

/// Extension trait for Claims to check roles.
pub trait ClaimsExt {
    /// Requires a specific role.
    fn require_role(&self, role: Role) -> DevHabitResult<()>;

    /// Requires at least one of `roles`.
    fn require_any_role(&self, roles: &[Role]) -> DevHabitResult<()>;

    /// Checks for the admin role.
    fn is_admin(&self) -> bool;
}

impl ClaimsExt for Claims {
    fn require_role(&self, role: Role) -> DevHabitResult<()> {
        self.require_any_role(&[role])
    }

    fn require_any_role(&self, roles: &[Role]) -> DevHabitResult<()> {
        if roles.iter().any(|role| self.has_role(*role)) {
            Ok(())
        } else {
            let required: Vec<&str> = roles.iter().map(Role::as_str).collect();
            Err(DevHabitError::forbidden(format!(
                "Required role: {}",
                required.join(" or ")
            )))
        }
    }

    fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn create_claims(roles: &[Role]) -> Claims {
        Claims::new(
            "identity".to_string(),
            "test@example.com".to_string(),
            roles.iter().map(ToString::to_string).collect(),
            "issuer".to_string(),
            "audience".to_string(),
            Utc::now() + Duration::hours(1),
        )
    }

    #[test]
    fn test_require_role() {
        let member = create_claims(&[Role::Member]);

        assert!(member.require_role(Role::Member).is_ok());
        assert!(matches!(
            member.require_role(Role::Admin),
            Err(DevHabitError::Forbidden(message)) if message == "Required role: Admin"
        ));
    }

    #[test]
    fn test_require_any_role() {
        let admin = create_claims(&[Role::Admin]);
        let nobody = create_claims(&[]);

        assert!(admin.require_any_role(&[Role::Member, Role::Admin]).is_ok());
        assert!(nobody.require_any_role(&[Role::Member, Role::Admin]).is_err());
    }

    #[test]
    fn test_is_admin() {
        assert!(create_claims(&[Role::Member, Role::Admin]).is_admin());
        assert!(!create_claims(&[Role::Member]).is_admin());
    }
}
