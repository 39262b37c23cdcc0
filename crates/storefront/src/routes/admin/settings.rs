//! Admin site settings editor.
//!
//! Edits the site identity: name, logo, about section, and social links.
//! Same partial-update contract as the appearance editor.

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

/// Settings form data.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub site_name: String,
    pub logo_url: String,
    pub logo_alt: String,
    pub about_title: String,
    pub about_content: String,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/settings.html")]
pub struct SettingsTemplate {
    pub user_name: String,
    pub current_path: String,
    pub site_name: String,
    pub logo_url: String,
    pub logo_alt: String,
    pub about_title: String,
    pub about_content: String,
    pub instagram: String,
    pub facebook: String,
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Display the settings editor, pre-filled from the live configuration.
#[instrument(skip(state, admin))]
pub async fn page(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Query(query): Query<AdminMessageQuery>,
) -> impl IntoResponse {
    let site = state.site().load().await;

    SettingsTemplate {
        user_name: admin.0.name,
        current_path: "/admin/settings".to_string(),
        site_name: site.site_name,
        logo_url: site.logo.url,
        logo_alt: site.logo.alt,
        about_title: site.about_section.title,
        about_content: site.about_section.content,
        instagram: site.social.instagram.unwrap_or_default(),
        facebook: site.social.facebook.unwrap_or_default(),
        status: query.status.map(|_| "Settings saved.".to_string()),
        error: query
            .error
            .map(|_| "The changes could not be saved. Please try again.".to_string()),
    }
}

/// Save the site settings.
#[instrument(skip(state, session, _admin, form))]
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<SettingsForm>,
) -> Response {
    if form.site_name.trim().is_empty() {
        return Redirect::to("/admin/settings?error=missing").into_response();
    }

    let Ok(Some(token)) = session.get::<String>(session_keys::TOKEN).await else {
        return Redirect::to("/admin/login").into_response();
    };

    let social = json!({
        "instagram": form.instagram.filter(|s| !s.trim().is_empty()),
        "facebook": form.facebook.filter(|s| !s.trim().is_empty()),
    });

    let partial = json!({
        "siteName": form.site_name.trim(),
        "logo": {
            "url": form.logo_url,
            "alt": form.logo_alt,
        },
        "aboutSection": {
            "title": form.about_title,
            "content": form.about_content,
        },
        "social": social,
    });

    match state.site().save(&partial, &token).await {
        Ok(_) => Redirect::to("/admin/settings?status=saved").into_response(),
        Err(e) => {
            tracing::error!("Failed to save settings: {e}");
            Redirect::to("/admin/settings?error=save").into_response()
        }
    }
}
