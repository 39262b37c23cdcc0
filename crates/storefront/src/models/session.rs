//! Session-related types.
//!
//! Types stored in the session for authentication state. The session is the
//! server-side successor to the old client's local-storage keys, so the key
//! names are kept verbatim: absence of a key means "use default".

use serde::{Deserialize, Serialize};

use nonna_rues_core::{Email, Role, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Account role.
    pub role: Role,
}

/// Session keys for persisted state.
pub mod session_keys {
    /// Key for the current logged-in user record.
    pub const USER: &str = "user";

    /// Key for the bearer token of the current session.
    pub const TOKEN: &str = "token";

    /// Key for the cart line items.
    pub const CART_ITEMS: &str = "cartItems";

    /// Key for the lazily-created checkout reference id.
    pub const CHECKOUT_ID: &str = "checkoutId";
}

/// Whether a session counts as an authenticated admin.
///
/// All three legs must agree: a token is present, a user record is present,
/// and the record carries the admin role. Anything less is treated as an
/// anonymous session, even if stale keys are still lying around.
#[must_use]
pub fn is_authenticated_admin(user: Option<&CurrentUser>, token: Option<&str>) -> bool {
    match (user, token) {
        (Some(user), Some(token)) => !token.is_empty() && user.role.is_admin(),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new("u-1"),
            name: "Rue".to_string(),
            email: Email::parse("rue@nonnaandrues.com").unwrap(),
            role,
        }
    }

    #[test]
    fn test_admin_requires_all_three_legs() {
        let admin = user(Role::Admin);
        assert!(is_authenticated_admin(Some(&admin), Some("tok-123")));

        // Missing token
        assert!(!is_authenticated_admin(Some(&admin), None));
        // Empty token
        assert!(!is_authenticated_admin(Some(&admin), Some("")));
        // Missing user record
        assert!(!is_authenticated_admin(None, Some("tok-123")));
        // Wrong role
        let customer = user(Role::Customer);
        assert!(!is_authenticated_admin(Some(&customer), Some("tok-123")));
    }

    #[test]
    fn test_anonymous_session() {
        assert!(!is_authenticated_admin(None, None));
    }
}
