//! Admin product management.
//!
//! Create/update/delete go straight to the backend API with the admin's
//! bearer token; the catalog cache is invalidated by the client on every
//! write so the listing below never shows stale rows.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use nonna_rues_core::ProductId;

use crate::commerce::{BackendError, ProductInput, ProductQuery};
use crate::middleware::RequireAdmin;
use crate::models::session_keys;
use crate::state::AppState;

use super::AdminMessageQuery;
use super::dashboard::AdminProductRow;

/// Product form data (create and edit share it).
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub title: String,
    pub description: Option<String>,
    pub price: String,
    pub product_type: Option<String>,
    pub vendor: Option<String>,
    pub image_url: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct AdminProductsTemplate {
    pub user_name: String,
    pub current_path: String,
    pub products: Vec<AdminProductRow>,
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Product form page template (new and edit).
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/form.html")]
pub struct AdminProductFormTemplate {
    pub user_name: String,
    pub current_path: String,
    pub heading: String,
    pub action: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub product_type: String,
    pub vendor: String,
    pub image_url: String,
}

fn status_message(code: &str) -> String {
    match code {
        "created" => "Product created.".to_string(),
        "updated" => "Product updated.".to_string(),
        "deleted" => "Product deleted.".to_string(),
        _ => "Saved.".to_string(),
    }
}

fn error_message(code: &str) -> String {
    match code {
        "price" => "Please enter a valid price.".to_string(),
        "missing" => "A title is required.".to_string(),
        "gone" => "That product no longer exists.".to_string(),
        _ => "The product could not be saved. Please try again.".to_string(),
    }
}

/// Read the admin's bearer token out of the session.
async fn session_token(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::TOKEN)
        .await
        .ok()
        .flatten()
}

fn parse_form(form: &ProductForm) -> Result<ProductInput, Redirect> {
    if form.title.trim().is_empty() {
        return Err(Redirect::to("/admin/products?error=missing"));
    }

    let price = form
        .price
        .trim()
        .parse::<Decimal>()
        .map_err(|_| Redirect::to("/admin/products?error=price"))?;

    Ok(ProductInput {
        title: form.title.trim().to_string(),
        description: form.description.clone().unwrap_or_default(),
        price,
        product_type: form.product_type.clone().unwrap_or_default(),
        vendor: form.vendor.clone().unwrap_or_default(),
        image_url: form
            .image_url
            .clone()
            .filter(|url| !url.trim().is_empty()),
    })
}

/// Display the product management listing.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Query(query): Query<AdminMessageQuery>,
) -> impl IntoResponse {
    let products = match state
        .backend()
        .get_products(&ProductQuery::default())
        .await
    {
        Ok(page) => page.products.iter().map(AdminProductRow::from).collect(),
        Err(e) => {
            tracing::warn!("Failed to fetch products for admin listing: {e}");
            Vec::new()
        }
    };

    AdminProductsTemplate {
        user_name: admin.0.name,
        current_path: "/admin/products".to_string(),
        products,
        status: query.status.as_deref().map(status_message),
        error: query.error.as_deref().map(error_message),
    }
}

/// Display the new-product form.
#[instrument(skip(admin))]
pub async fn new_form(admin: RequireAdmin) -> impl IntoResponse {
    AdminProductFormTemplate {
        user_name: admin.0.name,
        current_path: "/admin/products".to_string(),
        heading: "New product".to_string(),
        action: "/admin/products".to_string(),
        title: String::new(),
        description: String::new(),
        price: String::new(),
        product_type: String::new(),
        vendor: String::new(),
        image_url: String::new(),
    }
}

/// Handle product creation.
#[instrument(skip(state, session, _admin, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Response {
    let input = match parse_form(&form) {
        Ok(input) => input,
        Err(redirect) => return redirect.into_response(),
    };
    let Some(token) = session_token(&session).await else {
        return Redirect::to("/admin/login").into_response();
    };

    match state.backend().create_product(&input, &token).await {
        Ok(_) => Redirect::to("/admin/products?status=created").into_response(),
        Err(e) => {
            tracing::error!("Failed to create product: {e}");
            Redirect::to("/admin/products?error=save").into_response()
        }
    }
}

/// Display the edit-product form.
#[instrument(skip(state, admin), fields(id = %id))]
pub async fn edit_form(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<String>,
) -> Response {
    let product_id = ProductId::new(id);

    match state.backend().get_product(&product_id).await {
        Ok(product) => AdminProductFormTemplate {
            user_name: admin.0.name,
            current_path: "/admin/products".to_string(),
            heading: format!("Edit {}", product.title),
            action: format!("/admin/products/{}", product.id),
            title: product.title.clone(),
            description: product.description.clone(),
            price: format!("{:.2}", product.price),
            product_type: product.product_type.clone(),
            vendor: product.vendor.clone(),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
        .into_response(),
        Err(BackendError::NotFound(_)) => {
            Redirect::to("/admin/products?error=gone").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch product for editing: {e}");
            Redirect::to("/admin/products?error=save").into_response()
        }
    }
}

/// Handle product update.
#[instrument(skip(state, session, _admin, form), fields(id = %id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Response {
    let product_id = ProductId::new(id);
    let input = match parse_form(&form) {
        Ok(input) => input,
        Err(redirect) => return redirect.into_response(),
    };
    let Some(token) = session_token(&session).await else {
        return Redirect::to("/admin/login").into_response();
    };

    match state
        .backend()
        .update_product(&product_id, &input, &token)
        .await
    {
        Ok(_) => Redirect::to("/admin/products?status=updated").into_response(),
        Err(BackendError::NotFound(_)) => {
            Redirect::to("/admin/products?error=gone").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update product: {e}");
            Redirect::to("/admin/products?error=save").into_response()
        }
    }
}

/// Handle product deletion.
#[instrument(skip(state, session, _admin), fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Response {
    let product_id = ProductId::new(id);
    let Some(token) = session_token(&session).await else {
        return Redirect::to("/admin/login").into_response();
    };

    match state.backend().delete_product(&product_id, &token).await {
        Ok(()) => Redirect::to("/admin/products?status=deleted").into_response(),
        Err(BackendError::NotFound(_)) => {
            Redirect::to("/admin/products?error=gone").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete product: {e}");
            Redirect::to("/admin/products?error=save").into_response()
        }
    }
}
