//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

use super::Shell;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub shell: Shell,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub shell: Shell,
}

/// Display the about page.
#[instrument(skip(state, session))]
pub async fn about(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let shell = Shell::load(&state, &session).await;
    AboutTemplate { shell }
}

/// Display the contact page.
#[instrument(skip(state, session))]
pub async fn contact(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let shell = Shell::load(&state, &session).await;
    ContactTemplate { shell }
}
