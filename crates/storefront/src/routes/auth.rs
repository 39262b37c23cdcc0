//! Authentication route handlers.
//!
//! Login, registration, logout, and the account page. Empty form fields are
//! caught here, before any network call; everything else is delegated to
//! [`AuthService`], which talks to the backend API.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::RequireUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

use super::Shell;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Profile update form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub status: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub shell: Shell,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub shell: Shell,
    pub error: Option<String>,
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/show.html")]
pub struct AccountTemplate {
    pub shell: Shell,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub status: Option<String>,
    pub error: Option<String>,
}

fn auth_error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_string(),
        "missing" => "Please fill in every field.".to_string(),
        "mismatch" => "Passwords do not match.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip(state, session))]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let shell = Shell::load(&state, &session).await;
    LoginTemplate {
        shell,
        error: query.error.as_deref().map(auth_error_message),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    // Local validation, before any network call
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Redirect::to("/auth/login?error=missing").into_response();
    }

    let service = AuthService::new(state.backend(), &session);
    match service.login(form.email.trim(), &form.password).await {
        Ok(user) => {
            set_sentry_user(&user.id, Some(user.email.as_str()));
            Redirect::to("/account").into_response()
        }
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Login failed: {e}");
            Redirect::to("/auth/login?error=server").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip(state, session))]
pub async fn register_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let shell = Shell::load(&state, &session).await;
    RegisterTemplate {
        shell,
        error: query.error.as_deref().map(auth_error_message),
    }
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.name.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty() {
        return Redirect::to("/auth/register?error=missing").into_response();
    }
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=mismatch").into_response();
    }

    let service = AuthService::new(state.backend(), &session);
    match service
        .register(form.name.trim(), form.email.trim(), &form.password)
        .await
    {
        Ok(user) => {
            set_sentry_user(&user.id, Some(user.email.as_str()));
            Redirect::to("/account").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/auth/register?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            Redirect::to("/auth/register?error=server").into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout. Clears the persisted session unconditionally; the cart is
/// left alone.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    let service = AuthService::new(state.backend(), &session);
    service.logout().await;
    clear_sentry_user();
    Redirect::to("/")
}

// =============================================================================
// Account
// =============================================================================

/// Display the account page.
///
/// The stored token is re-validated against the backend; a token the
/// backend no longer accepts sends the visitor back to the login page even
/// though the stale session keys are still present.
#[instrument(skip(state, session, _user))]
pub async fn account(
    State(state): State<AppState>,
    session: Session,
    RequireUser(_user): RequireUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    let service = AuthService::new(state.backend(), &session);

    let user = match service.profile().await {
        Ok(user) => user,
        Err(AuthError::NotAuthenticated) => {
            return Redirect::to("/auth/login").into_response();
        }
        Err(e) => {
            tracing::error!("Failed to load profile: {e}");
            return crate::error::AppError::Auth(e).into_response();
        }
    };

    let shell = Shell::load(&state, &session).await;
    AccountTemplate {
        shell,
        name: user.name,
        email: user.email.to_string(),
        is_admin: user.role.is_admin(),
        status: query.status,
        error: query.error.as_deref().map(auth_error_message),
    }
    .into_response()
}

/// Handle profile update form submission.
#[instrument(skip(state, session, _user, form))]
pub async fn update_account(
    State(state): State<AppState>,
    session: Session,
    RequireUser(_user): RequireUser,
    Form(form): Form<ProfileForm>,
) -> Response {
    if form.name.trim().is_empty() || form.email.trim().is_empty() {
        return Redirect::to("/account?error=missing").into_response();
    }

    let service = AuthService::new(state.backend(), &session);
    match service
        .update_profile(form.name.trim(), form.email.trim())
        .await
    {
        Ok(_) => Redirect::to("/account?status=saved").into_response(),
        Err(AuthError::NotAuthenticated) => Redirect::to("/auth/login").into_response(),
        Err(e) => {
            tracing::error!("Failed to update profile: {e}");
            Redirect::to("/account?error=server").into_response()
        }
    }
}
