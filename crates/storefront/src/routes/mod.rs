//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart
//! POST /cart/update            - Update quantity
//! POST /cart/remove            - Remove line
//! POST /cart/clear             - Empty the cart
//! GET  /checkout               - Redirect to the hosted checkout
//!
//! # Pages
//! GET  /about                  - About page
//! GET  /contact                - Contact page
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! GET  /account                - Profile (requires login)
//! POST /account                - Update profile
//!
//! # Admin console (requires admin session, except /admin/login)
//! GET  /admin                  - Dashboard
//! GET  /admin/login            - Admin login page
//! POST /admin/login            - Admin login action
//! POST /admin/logout           - Admin logout
//! GET  /admin/products         - Product management
//! GET  /admin/products/new     - New product form
//! POST /admin/products         - Create product
//! GET  /admin/products/{id}/edit - Edit product form
//! POST /admin/products/{id}    - Update product
//! POST /admin/products/{id}/delete - Delete product
//! GET  /admin/appearance       - Appearance editor
//! POST /admin/appearance       - Save appearance
//! GET  /admin/settings         - Site settings editor
//! POST /admin/settings         - Save site settings
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod home;
pub mod pages;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::Session;

use crate::filters;
use crate::models::{SiteConfig, session_keys};
use crate::services::CartService;
use crate::state::AppState;

/// Data every public page hands to the base layout: site configuration,
/// cart badge count, and whether somebody is signed in.
pub struct Shell {
    pub site: SiteConfig,
    pub cart_count: u32,
    pub signed_in: bool,
}

impl Shell {
    /// Assemble the layout data for the current request.
    pub async fn load(state: &AppState, session: &Session) -> Self {
        let site = state.site().load().await;

        let cart_count = CartService::new(state.checkout(), session)
            .current()
            .await
            .map(|cart| cart.total_quantity())
            .unwrap_or(0);

        let signed_in = matches!(
            session.get::<String>(session_keys::TOKEN).await,
            Ok(Some(token)) if !token.is_empty()
        );

        Self {
            site,
            cart_count,
            signed_in,
        }
    }
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub shell: Shell,
}

/// Render the 404 page.
pub async fn not_found(State(state): State<AppState>, session: Session) -> Response {
    let shell = Shell::load(&state, &session).await;
    (StatusCode::NOT_FOUND, NotFoundTemplate { shell }).into_response()
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Create the auth routes router.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout redirect
        .route("/checkout", get(cart::checkout))
        // Static pages
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        // Auth routes
        .nest("/auth", auth_routes())
        .route("/account", get(auth::account).post(auth::update_account))
        // Admin console
        .nest("/admin", admin::routes())
}

/// Build the full application router, including the session layer.
///
/// `main` adds the Sentry layers on top; tests drive this router directly.
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer = crate::middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(state)
}
