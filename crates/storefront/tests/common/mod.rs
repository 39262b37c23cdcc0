//! Shared test harness.
//!
//! Spins up an in-process stub of the two external collaborators (the
//! commerce backend API and the hosted checkout API) on an ephemeral port,
//! then builds the real application router pointed at it. Requests are
//! driven through `tower::ServiceExt::oneshot` with manual cookie threading
//! for session continuity.

#![allow(clippy::unwrap_used)]
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, Response, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceExt;

use nonna_rues_storefront::config::{BackendConfig, CheckoutConfig, StorefrontConfig};
use nonna_rues_storefront::routes;
use nonna_rues_storefront::state::AppState;

/// Well-known stub accounts.
pub const ADMIN_EMAIL: &str = "admin@nonnaandrues.com";
pub const ADMIN_PASSWORD: &str = "penny-lane-1948";
pub const CUSTOMER_EMAIL: &str = "rue@example.com";
pub const CUSTOMER_PASSWORD: &str = "magnolia-petals";

/// Observable state of the stub APIs.
#[derive(Default)]
pub struct Stub {
    /// How many checkouts the stub has created.
    pub checkouts_created: AtomicU32,
}

/// The application under test plus its stub collaborators.
pub struct TestApp {
    pub router: Router,
    pub stub: Arc<Stub>,
}

impl TestApp {
    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Spawn the stub server and build the application router against it.
pub async fn spawn_app() -> TestApp {
    let stub = Arc::new(Stub::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let stub_router = stub_router(stub.clone());
    tokio::spawn(async move {
        axum::serve(listener, stub_router).await.unwrap();
    });

    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("kJ8#mP2$vX9@qL4&nR7*wS3^zT6!yU1%"),
        backend: BackendConfig {
            api_url: format!("http://{addr}/api"),
        },
        checkout: CheckoutConfig {
            api_url: format!("http://{addr}/checkout-api"),
            access_token: SecretString::from("kQ4@wZ8#rN2$tM6&"),
        },
        sentry_dsn: None,
    };

    let state = AppState::new(config).unwrap();
    TestApp {
        router: routes::app(state),
        stub,
    }
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Build a GET request, optionally with a session cookie.
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a form POST request, optionally with a session cookie.
pub fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Extract the session cookie from a response, if one was set.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Read the full response body as a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// =============================================================================
// Stub Collaborators
// =============================================================================

fn stub_router(stub: Arc<Stub>) -> Router {
    Router::new()
        // Backend API
        .route("/api/shopify/products", get(list_products))
        .route("/api/shopify/products/{id}", get(get_product))
        .route("/api/shopify/collections", get(list_collections))
        .route("/api/users/login", post(login))
        .route("/api/users/profile", get(profile))
        .route("/api/cms/config", get(site_config))
        // Hosted checkout API
        .route("/checkout-api/checkouts", post(create_checkout))
        .route("/checkout-api/checkouts/{id}", get(fetch_checkout))
        .route(
            "/checkout-api/checkouts/{id}/line-items",
            post(mutate_checkout).put(mutate_checkout),
        )
        .route(
            "/checkout-api/checkouts/{id}/line-items/remove",
            post(mutate_checkout),
        )
        .with_state(stub)
}

fn vase() -> Value {
    json!({
        "id": "p-1",
        "title": "Hand-Painted Vase",
        "description": "A one-of-a-kind vase with Southern charm.",
        "productType": "Decor",
        "vendor": "Nonna",
        "price": "24.50",
        "variants": [
            { "id": "v-1", "title": "Small", "price": "24.50" },
            { "id": "v-2", "title": "Large", "price": "32.00" }
        ]
    })
}

async fn list_products() -> Json<Value> {
    Json(json!({ "products": [vase()], "page": 1, "totalPages": 1 }))
}

async fn get_product(Path(id): Path<String>) -> axum::response::Response {
    if id == "p-1" {
        Json(json!({ "product": vase() })).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "no such product" })),
        )
            .into_response()
    }
}

async fn list_collections() -> Json<Value> {
    Json(json!({
        "collections": [
            { "id": "c-1", "title": "Vintage Finds", "description": "" }
        ]
    }))
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

fn admin_user() -> Value {
    json!({ "id": "u-admin", "name": "Admin User", "email": ADMIN_EMAIL, "role": "admin" })
}

fn customer_user() -> Value {
    json!({ "id": "u-rue", "name": "Rue", "email": CUSTOMER_EMAIL, "role": "customer" })
}

async fn login(Json(body): Json<LoginBody>) -> axum::response::Response {
    if body.email == ADMIN_EMAIL && body.password == ADMIN_PASSWORD {
        return Json(json!({ "user": admin_user(), "token": "tok-admin" })).into_response();
    }
    if body.email == CUSTOMER_EMAIL && body.password == CUSTOMER_PASSWORD {
        return Json(json!({ "user": customer_user(), "token": "tok-customer" })).into_response();
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid email or password" })),
    )
        .into_response()
}

async fn profile(headers: HeaderMap) -> axum::response::Response {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match bearer {
        "Bearer tok-admin" => Json(json!({ "user": admin_user() })).into_response(),
        "Bearer tok-customer" => Json(json!({ "user": customer_user() })).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid token" })),
        )
            .into_response(),
    }
}

async fn site_config() -> Json<Value> {
    Json(json!({ "config": { "siteName": "Nonna & Rue's Unique Finds" } }))
}

fn checkout_body() -> Json<Value> {
    Json(json!({
        "id": "chk-1",
        "webUrl": "https://pay.example/chk-1",
        "lineItems": []
    }))
}

async fn create_checkout(State(stub): State<Arc<Stub>>) -> Json<Value> {
    stub.checkouts_created.fetch_add(1, Ordering::SeqCst);
    checkout_body()
}

async fn fetch_checkout(Path(_id): Path<String>) -> Json<Value> {
    checkout_body()
}

async fn mutate_checkout(Path(_id): Path<String>) -> Json<Value> {
    checkout_body()
}
