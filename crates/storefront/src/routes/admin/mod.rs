//! Admin console routes.
//!
//! Everything under `/admin` except the login page is gated by the
//! [`RequireAdmin`] extractor: a request without a full admin session (user
//! record + token + admin role) is redirected to `/admin/login`.

pub mod appearance;
pub mod dashboard;
pub mod products;
pub mod settings;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Build the admin console router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
        .route(
            "/products",
            get(products::index).post(products::create),
        )
        .route("/products/new", get(products::new_form))
        .route("/products/{id}/edit", get(products::edit_form))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/delete", post(products::delete))
        .route("/appearance", get(appearance::page).post(appearance::save))
        .route("/settings", get(settings::page).post(settings::save))
}

// =============================================================================
// Admin Login
// =============================================================================

/// Admin login form data.
#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct AdminMessageQuery {
    pub error: Option<String>,
    pub status: Option<String>,
}

/// Admin login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub error: Option<String>,
}

fn login_error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_string(),
        "denied" => "This account does not have admin access.".to_string(),
        "missing" => "Please fill in every field.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Display the admin login page.
#[instrument(skip(_state))]
pub async fn login_page(
    State(_state): State<AppState>,
    Query(query): Query<AdminMessageQuery>,
) -> impl IntoResponse {
    AdminLoginTemplate {
        error: query.error.as_deref().map(login_error_message),
    }
}

/// Handle admin login form submission.
///
/// The account must authenticate *and* carry the admin role; an account
/// that exists but is not an admin gets "denied" and no session is written.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AdminLoginForm>,
) -> Response {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Redirect::to("/admin/login?error=missing").into_response();
    }

    let service = AuthService::new(state.backend(), &session);
    match service.login_admin(form.email.trim(), &form.password).await {
        Ok(user) => {
            set_sentry_user(&user.id, Some(user.email.as_str()));
            Redirect::to("/admin").into_response()
        }
        Err(AuthError::AccessDenied) => {
            Redirect::to("/admin/login?error=denied").into_response()
        }
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            Redirect::to("/admin/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Admin login failed: {e}");
            Redirect::to("/admin/login?error=server").into_response()
        }
    }
}

/// Handle admin logout.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Redirect {
    let service = AuthService::new(state.backend(), &session);
    service.logout().await;
    clear_sentry_user();
    Redirect::to("/admin/login")
}
