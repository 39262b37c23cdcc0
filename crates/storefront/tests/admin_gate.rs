//! Admin subtree gating through the real router.
//!
//! The invariant under test: a session counts as admin only when the user
//! record, the token, and the admin role are all present. Anything less is
//! redirected to the admin login page.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::StatusCode;

use common::{
    ADMIN_EMAIL, ADMIN_PASSWORD, CUSTOMER_EMAIL, CUSTOMER_PASSWORD, body_string, form_post,
    get_request, location, session_cookie, spawn_app,
};

#[tokio::test]
async fn anonymous_visitor_is_redirected_to_admin_login() {
    let app = spawn_app().await;

    let response = app.send(get_request("/admin", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");
}

#[tokio::test]
async fn admin_login_grants_access_to_the_dashboard() {
    let app = spawn_app().await;

    let body = format!("email={ADMIN_EMAIL}&password={ADMIN_PASSWORD}");
    let response = app.send(form_post("/admin/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
    let cookie = session_cookie(&response).expect("session cookie after admin login");

    let dashboard = app.send(get_request("/admin", Some(&cookie))).await;
    assert_eq!(dashboard.status(), StatusCode::OK);
    let body = body_string(dashboard).await;
    assert!(body.contains("Dashboard"));
    assert!(body.contains("Admin User"));
}

#[tokio::test]
async fn customer_login_is_denied_admin_access() {
    let app = spawn_app().await;

    // The account authenticates fine, but lacks the admin role
    let body = format!("email={CUSTOMER_EMAIL}&password={CUSTOMER_PASSWORD}");
    let response = app.send(form_post("/admin/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login?error=denied");

    // No admin session was written; the subtree still redirects away
    let cookie = session_cookie(&response);
    let dashboard = app
        .send(get_request("/admin", cookie.as_deref()))
        .await;
    assert_eq!(dashboard.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&dashboard), "/admin/login");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = spawn_app().await;

    let body = format!("email={ADMIN_EMAIL}&password=not-the-password");
    let response = app.send(form_post("/admin/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login?error=credentials");
}

#[tokio::test]
async fn customer_session_can_use_the_storefront_but_not_the_admin() {
    let app = spawn_app().await;

    let body = format!("email={CUSTOMER_EMAIL}&password={CUSTOMER_PASSWORD}");
    let response = app.send(form_post("/auth/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/account");
    let cookie = session_cookie(&response).expect("session cookie after login");

    // The account page re-validates the token and renders
    let account = app.send(get_request("/account", Some(&cookie))).await;
    assert_eq!(account.status(), StatusCode::OK);
    let body = body_string(account).await;
    assert!(body.contains(CUSTOMER_EMAIL));

    // The admin subtree stays closed for this session
    let admin = app.send(get_request("/admin", Some(&cookie))).await;
    assert_eq!(admin.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&admin), "/admin/login");
}

#[tokio::test]
async fn admin_product_pages_are_gated_too() {
    let app = spawn_app().await;

    for path in [
        "/admin/products",
        "/admin/products/new",
        "/admin/appearance",
        "/admin/settings",
    ] {
        let response = app.send(get_request(path, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/admin/login", "{path}");
    }
}

#[tokio::test]
async fn logout_closes_the_admin_session() {
    let app = spawn_app().await;

    let body = format!("email={ADMIN_EMAIL}&password={ADMIN_PASSWORD}");
    let response = app.send(form_post("/admin/login", &body, None)).await;
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .send(form_post("/admin/logout", "", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/login");

    let dashboard = app.send(get_request("/admin", Some(&cookie))).await;
    assert_eq!(dashboard.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&dashboard), "/admin/login");
}
