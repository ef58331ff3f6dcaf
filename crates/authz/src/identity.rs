//! Resolved identity of the current session's user.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use millgate_core::UserId;

/// Role name carrying the administrator escape hatch.
pub const ADMIN_ROLE: &str = "Admin";

/// Role identifier used for role-derived grants.
///
/// Roles are intentionally opaque strings at this layer; the backend owns
/// their definitions and the grant lists attached to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(Cow<'static, str>);

impl RoleName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == ADMIN_ROLE
    }
}

impl core::fmt::Display for RoleName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated user permissions are resolved for.
///
/// Construction is decoupled from authentication transport: the auth
/// session (external collaborator) hands this over once login completes.
/// `role: None` models a user with only direct grants (the console's
/// "Custom" role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Option<RoleName>,
}

impl Identity {
    pub fn new(user_id: UserId, display_name: impl Into<String>, role: Option<RoleName>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            role,
        }
    }

    /// The administrator marker: an explicit escape hatch, not derived
    /// from grant records.
    pub fn is_administrator(&self) -> bool {
        self.role.as_ref().is_some_and(RoleName::is_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_marker_is_exact() {
        let admin = Identity::new(UserId::new(), "root", Some(RoleName::new(ADMIN_ROLE)));
        let storekeeper = Identity::new(UserId::new(), "sam", Some(RoleName::new("Storekeeper")));
        let custom = Identity::new(UserId::new(), "casey", None);

        assert!(admin.is_administrator());
        assert!(!storekeeper.is_administrator());
        assert!(!custom.is_administrator());
    }

    #[test]
    fn admin_marker_is_case_sensitive() {
        let not_quite = Identity::new(UserId::new(), "eve", Some(RoleName::new("admin")));
        assert!(!not_quite.is_administrator());
    }
}
