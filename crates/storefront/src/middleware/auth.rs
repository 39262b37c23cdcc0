//! Authentication extractors.
//!
//! Provides extractors for requiring a signed-in customer or an admin
//! session in route handlers. The admin check enforces the full session
//! invariant: a user record, a token, and the admin role must all be
//! present, or the request is treated as anonymous.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, is_authenticated_admin, session_keys};

/// Extractor that requires a signed-in customer.
///
/// If nobody is signed in, redirects to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn account_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Extractor that requires an authenticated admin session.
///
/// Anonymous and non-admin sessions are redirected to the admin login page.
pub struct RequireAdmin(pub CurrentUser);

/// Error returned when a request fails an authentication requirement.
pub enum AuthRejection {
    /// Redirect to the customer login page.
    RedirectToLogin,
    /// Redirect to the admin login page.
    RedirectToAdminLogin,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::RedirectToAdminLogin => Redirect::to("/admin/login").into_response(),
        }
    }
}

/// Read the user record and token out of the request's session.
async fn session_user(parts: &mut Parts) -> (Option<CurrentUser>, Option<String>) {
    let Some(session) = parts.extensions.get::<Session>() else {
        return (None, None);
    };

    let user = session
        .get::<CurrentUser>(session_keys::USER)
        .await
        .ok()
        .flatten();
    let token = session
        .get::<String>(session_keys::TOKEN)
        .await
        .ok()
        .flatten();

    (user, token)
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (user, token) = session_user(parts).await;

        match (user, token) {
            (Some(user), Some(token)) if !token.is_empty() => Ok(Self(user)),
            _ => Err(AuthRejection::RedirectToLogin),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (user, token) = session_user(parts).await;

        if !is_authenticated_admin(user.as_ref(), token.as_deref()) {
            return Err(AuthRejection::RedirectToAdminLogin);
        }

        // The invariant only holds with a user record present
        user.map_or(Err(AuthRejection::RedirectToAdminLogin), |user| {
            Ok(Self(user))
        })
    }
}
