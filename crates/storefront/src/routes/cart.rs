//! Cart route handlers.
//!
//! Every mutation is a classic form POST that redirects back to the cart
//! page; failures come back as a short error code in the query string and
//! render as a transient notification. The heavy lifting lives in
//! [`CartService`], which mirrors each mutation to the hosted checkout
//! before touching local state.

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

use nonna_rues_core::{LineId, ProductId, VariantId};

use crate::commerce::BackendError;
use crate::filters;
use crate::models::{CartLine, CartState};
use crate::services::{AddLineRequest, CartError, CartService};
use crate::state::AppState;

use super::Shell;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub line_id: String,
    pub product_id: String,
    pub title: String,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            line_id: line.line_id.to_string(),
            product_id: line.product_id.to_string(),
            title: line.title.clone(),
            unit_price: format!("${:.2}", line.unit_price),
            line_total: format!("${:.2}", line.line_total()),
            image_url: line.image_url.clone(),
            quantity: line.quantity,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&CartState> for CartView {
    fn from(cart: &CartState) -> Self {
        Self {
            items: cart.lines.iter().map(CartItemView::from).collect(),
            subtotal: format!("${:.2}", cart.subtotal()),
            item_count: cart.total_quantity(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub variant_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// Query parameters for the cart page notification banner.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub error: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub shell: Shell,
    pub cart: CartView,
    pub error: Option<String>,
}

/// Map an error code from the query string to a visitor-facing message.
fn error_message(code: &str) -> String {
    match code {
        "checkout" => "Checkout is temporarily unavailable. Please try again.".to_string(),
        "missing" => "That item is no longer in your cart.".to_string(),
        "notfound" => "That product could not be found.".to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}

/// Map a cart failure to the redirect carrying its error code.
fn cart_error_redirect(e: &CartError) -> Redirect {
    match e {
        CartError::Unavailable(_) => Redirect::to("/cart?error=checkout"),
        CartError::LineNotFound(_) => Redirect::to("/cart?error=missing"),
        CartError::Session(_) => Redirect::to("/cart?error=internal"),
    }
}

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CartQuery>,
) -> Response {
    let shell = Shell::load(&state, &session).await;
    let service = CartService::new(state.checkout(), &session);

    let cart = match service.current().await {
        Ok(cart) => CartView::from(&cart),
        Err(e) => {
            tracing::error!("Failed to load cart: {e}");
            CartView::from(&CartState::default())
        }
    };

    CartShowTemplate {
        shell,
        cart,
        error: query.error.as_deref().map(error_message),
    }
    .into_response()
}

/// Add an item to the cart.
///
/// The variant's title, price, and image are resolved from the catalog so
/// the form only has to name the product, the variant, and a quantity.
#[instrument(skip(state, session, form))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);
    let variant_id = VariantId::new(form.variant_id);
    let quantity = form.quantity.unwrap_or(1);

    let product = match state.backend().get_product(&product_id).await {
        Ok(product) => product,
        Err(BackendError::NotFound(_)) => {
            return Redirect::to("/cart?error=notfound").into_response();
        }
        Err(e) => {
            tracing::error!("Failed to fetch product for add-to-cart: {e}");
            return Redirect::to("/cart?error=internal").into_response();
        }
    };

    let Some(variant) = product.variant(&variant_id) else {
        return Redirect::to("/cart?error=notfound").into_response();
    };

    let title = if variant.title == "Default Title" {
        product.title.clone()
    } else {
        format!("{} ({})", product.title, variant.title)
    };

    let request = AddLineRequest {
        product_id,
        variant_id,
        title,
        unit_price: variant.price,
        image_url: product.image_url.clone(),
        quantity,
    };

    let service = CartService::new(state.checkout(), &session);
    match service.add_line(request).await {
        Ok(_) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            cart_error_redirect(&e).into_response()
        }
    }
}

/// Update a cart line's quantity.
#[instrument(skip(state, session, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let line_id = LineId::new(form.line_id);
    let service = CartService::new(state.checkout(), &session);

    match service.set_quantity(&line_id, form.quantity).await {
        Ok(_) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::error!("Failed to update cart: {e}");
            cart_error_redirect(&e).into_response()
        }
    }
}

/// Remove a line from the cart.
#[instrument(skip(state, session, form))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let line_id = LineId::new(form.line_id);
    let service = CartService::new(state.checkout(), &session);

    match service.remove_line(&line_id).await {
        Ok(_) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::error!("Failed to remove from cart: {e}");
            cart_error_redirect(&e).into_response()
        }
    }
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let service = CartService::new(state.checkout(), &session);

    match service.clear().await {
        Ok(_) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::error!("Failed to clear cart: {e}");
            cart_error_redirect(&e).into_response()
        }
    }
}

/// Redirect to the hosted checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let service = CartService::new(state.checkout(), &session);

    match service.checkout_url().await {
        Ok(Some(url)) => Redirect::to(&url).into_response(),
        Ok(None) => Redirect::to("/cart").into_response(),
        Err(e) => {
            tracing::error!("Failed to resolve checkout URL: {e}");
            Redirect::to("/cart?error=checkout").into_response()
        }
    }
}
