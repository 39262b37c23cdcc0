//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::commerce::{Product, ProductQuery};
use crate::filters;
use crate::state::AppState;

use super::Shell;

/// How many products the home page features.
const FEATURED_COUNT: usize = 4;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: format!("${:.2}", product.price),
            image_url: product.image_url.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: Shell,
    pub featured: Vec<ProductCardView>,
}

/// Display the home page: hero, featured products, about section.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let shell = Shell::load(&state, &session).await;

    // A catalog hiccup should not take down the home page
    let featured = match state.backend().get_products(&ProductQuery::default()).await {
        Ok(page) => page
            .products
            .iter()
            .take(FEATURED_COUNT)
            .map(ProductCardView::from)
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to fetch featured products: {e}");
            Vec::new()
        }
    };

    HomeTemplate { shell, featured }
}
