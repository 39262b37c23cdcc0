//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use nonna_rues_core::ProductId;

use crate::commerce::{BackendError, Product, ProductQuery};
use crate::filters;
use crate::state::AppState;

use super::Shell;
use super::home::ProductCardView;

/// Variant display data for templates.
#[derive(Clone)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub available: bool,
}

/// Product detail display data for templates.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub vendor: String,
    pub price: String,
    pub image_url: Option<String>,
    pub variants: Vec<VariantView>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            vendor: product.vendor.clone(),
            price: format!("${:.2}", product.price),
            image_url: product.image_url.clone(),
            variants: product
                .variants
                .iter()
                .map(|v| VariantView {
                    id: v.id.to_string(),
                    title: v.title.clone(),
                    price: format!("${:.2}", v.price),
                    available: v.available_for_sale,
                })
                .collect(),
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub shell: Shell,
    pub products: Vec<ProductCardView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub search: Option<String>,
    pub load_failed: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub shell: Shell,
    pub product: ProductDetailView,
}

/// Display the product listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let shell = Shell::load(&state, &session).await;
    let current_page = query.page.unwrap_or(1).max(1);

    let request = ProductQuery {
        page: Some(current_page),
        search: query.search.clone(),
    };

    let (products, total_pages, load_failed) = match state.backend().get_products(&request).await {
        Ok(page) => (
            page.products.iter().map(ProductCardView::from).collect(),
            page.total_pages,
            false,
        ),
        Err(e) => {
            tracing::warn!("Failed to fetch products: {e}");
            (Vec::new(), 1, true)
        }
    };

    ProductsIndexTemplate {
        shell,
        products,
        current_page,
        total_pages,
        search: query.search,
        load_failed,
    }
}

/// Display the product detail page.
#[instrument(skip(state, session), fields(id = %id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    let product_id = ProductId::new(id);

    let result = state.backend().get_product(&product_id).await;
    match result {
        Ok(product) => {
            let shell = Shell::load(&state, &session).await;
            ProductShowTemplate {
                shell,
                product: ProductDetailView::from(&product),
            }
            .into_response()
        }
        Err(BackendError::NotFound(_)) => super::not_found(State(state), session).await,
        Err(e) => crate::error::AppError::Backend(e).into_response(),
    }
}
