//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::commerce::{Product, ProductQuery};
use crate::middleware::RequireAdmin;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Product row display data for admin tables.
#[derive(Clone)]
pub struct AdminProductRow {
    pub id: String,
    pub title: String,
    pub price: String,
    pub product_type: String,
}

impl From<&Product> for AdminProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: format!("${:.2}", product.price),
            product_type: product.product_type.clone(),
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub user_name: String,
    pub current_path: String,
    pub product_count: usize,
    pub collection_count: usize,
    pub recent: Vec<AdminProductRow>,
}

/// How many products the dashboard lists.
const RECENT_COUNT: usize = 5;

/// Display the dashboard.
///
/// On top of the session gate, the stored token is re-validated against the
/// backend on entry: a session whose remote role no longer carries admin is
/// treated as invalid and sent back to the login page, stale keys and all.
#[instrument(skip(state, session, admin))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    admin: RequireAdmin,
) -> Response {
    let auth = AuthService::new(state.backend(), &session);
    let user = match auth.profile_admin().await {
        Ok(user) => user,
        Err(AuthError::AccessDenied | AuthError::NotAuthenticated) => {
            return Redirect::to("/admin/login").into_response();
        }
        Err(e) => {
            // Backend hiccup: fall back to the session record
            tracing::warn!("Failed to re-validate admin profile: {e}");
            admin.0
        }
    };

    let (product_count, recent) = match state
        .backend()
        .get_products(&ProductQuery::default())
        .await
    {
        Ok(page) => (
            page.products.len(),
            page.products
                .iter()
                .take(RECENT_COUNT)
                .map(AdminProductRow::from)
                .collect(),
        ),
        Err(e) => {
            tracing::warn!("Failed to fetch products for dashboard: {e}");
            (0, Vec::new())
        }
    };

    let collection_count = match state.backend().get_collections().await {
        Ok(collections) => collections.len(),
        Err(e) => {
            tracing::warn!("Failed to fetch collections for dashboard: {e}");
            0
        }
    };

    DashboardTemplate {
        user_name: user.name,
        current_path: "/admin".to_string(),
        product_count,
        collection_count,
        recent,
    }
    .into_response()
}
