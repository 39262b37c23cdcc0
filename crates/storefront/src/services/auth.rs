//! Authentication service.
//!
//! Credentials are always validated by the backend API; this service only
//! owns the session bookkeeping around it. Login writes the user record and
//! bearer token to the session, logout removes them unconditionally, and
//! profile reads re-validate the stored token against the backend.

use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use nonna_rues_core::EmailError;

use crate::commerce::{ApiUser, BackendClient, BackendError, ProfileInput};
use crate::models::{CurrentUser, session_keys};

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid credentials (wrong password or unknown account).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but lacks the admin role.
    #[error("access denied: admin role required")]
    AccessDenied,

    /// No token in the session.
    #[error("not signed in")]
    NotAuthenticated,

    /// Backend request failed.
    #[error("backend error: {0}")]
    Backend(#[source] BackendError),

    /// Session store error.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Authentication service.
///
/// Handles login, registration, logout, and profile re-validation.
pub struct AuthService<'a> {
    backend: &'a BackendClient,
    session: &'a Session,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(backend: &'a BackendClient, session: &'a Session) -> Self {
        Self { backend, session }
    }

    // =========================================================================
    // Login / Logout
    // =========================================================================

    /// Login with email and password.
    ///
    /// On success the user record and token are written to the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the backend rejects the
    /// email/password pair.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        // Validate email format before going to the network
        let _ = nonna_rues_core::Email::parse(email)?;

        let payload = self
            .backend
            .login(email, password)
            .await
            .map_err(map_credential_error)?;

        let user = current_user_from(payload.user);
        self.persist(&user, &payload.token).await?;
        Ok(user)
    }

    /// Login for the admin console.
    ///
    /// Same as [`Self::login`], but the account must carry the admin role.
    /// An account that authenticates without it gets `AccessDenied` and
    /// nothing is written to the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` or `AuthError::AccessDenied`.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login_admin(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let _ = nonna_rues_core::Email::parse(email)?;

        let payload = self
            .backend
            .login(email, password)
            .await
            .map_err(map_credential_error)?;

        if !payload.user.role.is_admin() {
            return Err(AuthError::AccessDenied);
        }

        let user = current_user_from(payload.user);
        self.persist(&user, &payload.token).await?;
        Ok(user)
    }

    /// Register a new customer account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<CurrentUser, AuthError> {
        let _ = nonna_rues_core::Email::parse(email)?;

        let payload = self
            .backend
            .register(name, email, password)
            .await
            .map_err(AuthError::Backend)?;

        let user = current_user_from(payload.user);
        self.persist(&user, &payload.token).await?;
        Ok(user)
    }

    /// Clear the persisted session unconditionally. Never fails; a session
    /// store error is logged and swallowed. Cart keys are left alone.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self
            .session
            .remove::<CurrentUser>(session_keys::USER)
            .await
        {
            tracing::warn!("Failed to remove user from session: {e}");
        }
        if let Err(e) = self.session.remove::<String>(session_keys::TOKEN).await {
            tracing::warn!("Failed to remove token from session: {e}");
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Re-validate the stored token and return the fresh user record.
    ///
    /// The refreshed record replaces the one in the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if there is no token, or if the
    /// backend no longer accepts it.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<CurrentUser, AuthError> {
        let token = self.token().await?.ok_or(AuthError::NotAuthenticated)?;

        let user = self
            .backend
            .get_profile(&token)
            .await
            .map_err(|e| {
                if e.is_unauthorized() {
                    AuthError::NotAuthenticated
                } else {
                    AuthError::Backend(e)
                }
            })?;

        let user = current_user_from(user);
        self.session.insert(session_keys::USER, &user).await?;
        Ok(user)
    }

    /// Re-validate the stored token for the admin subtree.
    ///
    /// If the remote role no longer carries admin, the local session is
    /// stale: `AccessDenied` is returned and callers must treat the session
    /// as invalid even though the keys remain until explicitly cleared.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccessDenied` on a role mismatch.
    #[instrument(skip(self))]
    pub async fn profile_admin(&self) -> Result<CurrentUser, AuthError> {
        let user = self.profile().await?;
        if !user.role.is_admin() {
            return Err(AuthError::AccessDenied);
        }
        Ok(user)
    }

    /// Update the current user's profile and replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if there is no token.
    #[instrument(skip(self))]
    pub async fn update_profile(&self, name: &str, email: &str) -> Result<CurrentUser, AuthError> {
        let _ = nonna_rues_core::Email::parse(email)?;
        let token = self.token().await?.ok_or(AuthError::NotAuthenticated)?;

        let input = ProfileInput {
            name: name.to_string(),
            email: email.to_string(),
        };
        let user = self
            .backend
            .update_profile(&input, &token)
            .await
            .map_err(AuthError::Backend)?;

        let user = current_user_from(user);
        self.session.insert(session_keys::USER, &user).await?;
        Ok(user)
    }

    // =========================================================================
    // Session Accessors
    // =========================================================================

    /// The user record currently in the session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn current_user(&self) -> Result<Option<CurrentUser>, AuthError> {
        Ok(self.session.get(session_keys::USER).await?)
    }

    /// The bearer token currently in the session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.session.get(session_keys::TOKEN).await?)
    }

    async fn persist(&self, user: &CurrentUser, token: &str) -> Result<(), AuthError> {
        self.session.insert(session_keys::USER, user).await?;
        self.session.insert(session_keys::TOKEN, token).await?;
        Ok(())
    }
}

/// Map backend rejections of a credential pair to the domain error.
fn map_credential_error(err: BackendError) -> AuthError {
    if err.is_unauthorized() {
        AuthError::InvalidCredentials
    } else {
        AuthError::Backend(err)
    }
}

fn current_user_from(user: ApiUser) -> CurrentUser {
    CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    }
}
