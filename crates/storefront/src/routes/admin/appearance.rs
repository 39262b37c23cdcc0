//! Admin appearance editor.
//!
//! Edits the hero section and the color palette. The form posts a partial
//! configuration document; the backend merges it and returns the canonical
//! result, which replaces the cached copy wholesale.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::RequireAdmin;
use crate::models::session_keys;
use crate::state::AppState;

use super::AdminMessageQuery;

/// Appearance form data.
#[derive(Debug, Deserialize)]
pub struct AppearanceForm {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_button_text: String,
    pub hero_button_link: String,
    pub color_primary: String,
    pub color_secondary: String,
    pub color_accent: String,
    pub color_text: String,
    pub color_background: String,
}

/// Appearance page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/appearance.html")]
pub struct AppearanceTemplate {
    pub user_name: String,
    pub current_path: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_button_text: String,
    pub hero_button_link: String,
    pub color_primary: String,
    pub color_secondary: String,
    pub color_accent: String,
    pub color_text: String,
    pub color_background: String,
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Display the appearance editor, pre-filled from the live configuration.
#[instrument(skip(state, admin))]
pub async fn page(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Query(query): Query<AdminMessageQuery>,
) -> impl IntoResponse {
    let site = state.site().load().await;

    AppearanceTemplate {
        user_name: admin.0.name,
        current_path: "/admin/appearance".to_string(),
        hero_title: site.hero_section.title,
        hero_subtitle: site.hero_section.subtitle,
        hero_button_text: site.hero_section.button_text,
        hero_button_link: site.hero_section.button_link,
        color_primary: site.colors.primary,
        color_secondary: site.colors.secondary,
        color_accent: site.colors.accent,
        color_text: site.colors.text,
        color_background: site.colors.background,
        status: query.status.map(|_| "Appearance saved.".to_string()),
        error: query
            .error
            .map(|_| "The changes could not be saved. Please try again.".to_string()),
    }
}

/// Save the appearance settings.
#[instrument(skip(state, session, _admin, form))]
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<AppearanceForm>,
) -> Response {
    let Ok(Some(token)) = session.get::<String>(session_keys::TOKEN).await else {
        return Redirect::to("/admin/login").into_response();
    };

    let partial = json!({
        "heroSection": {
            "title": form.hero_title,
            "subtitle": form.hero_subtitle,
            "buttonText": form.hero_button_text,
            "buttonLink": form.hero_button_link,
        },
        "colors": {
            "primary": form.color_primary,
            "secondary": form.color_secondary,
            "accent": form.color_accent,
            "text": form.color_text,
            "background": form.color_background,
        },
    });

    match state.site().save(&partial, &token).await {
        Ok(_) => Redirect::to("/admin/appearance?status=saved").into_response(),
        Err(e) => {
            tracing::error!("Failed to save appearance: {e}");
            Redirect::to("/admin/appearance?error=save").into_response()
        }
    }
}
