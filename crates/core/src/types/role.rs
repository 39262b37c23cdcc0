//! User roles.

use serde::{Deserialize, Serialize};

/// Role attached to a user account by the backend.
///
/// The admin console subtree requires [`Role::Admin`]; everything else on
/// the site is available to customers and anonymous visitors alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper account.
    #[default]
    Customer,
    /// Back-office account with access to the admin console.
    Admin,
}

impl Role {
    /// Whether this role grants access to the admin console.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Customer.is_admin());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, Role::Customer);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("manager".parse::<Role>().is_err());
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    }
}
