//! End-to-end cart behavior through the real router.
//!
//! Exercises the documented cart semantics: lazy checkout creation, merge on
//! add, the zero-quantity no-op, idempotent removal, and the checkout
//! redirect.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::atomic::Ordering;

use axum::http::StatusCode;

use common::{body_string, form_post, get_request, location, session_cookie, spawn_app};

#[tokio::test]
async fn add_to_cart_merges_quantities_into_one_line() {
    let app = spawn_app().await;

    // First add: variant v-1, quantity 2, into an empty cart
    let response = app
        .send(form_post("/cart/add", "product_id=p-1&variant_id=v-1&quantity=2", None))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
    let cookie = session_cookie(&response).expect("session cookie after first add");

    // A checkout reference was created lazily, exactly once
    assert_eq!(app.stub.checkouts_created.load(Ordering::SeqCst), 1);

    let cart_page = app.send(get_request("/cart", Some(&cookie))).await;
    assert_eq!(cart_page.status(), StatusCode::OK);
    let body = body_string(cart_page).await;
    assert!(body.contains("value=\"2\""), "expected quantity 2 in:\n{body}");
    assert_eq!(body.matches("data-line-id").count(), 1);

    // Second add of the same variant merges, it does not create a second line
    let response = app
        .send(form_post(
            "/cart/add",
            "product_id=p-1&variant_id=v-1&quantity=3",
            Some(&cookie),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_string(app.send(get_request("/cart", Some(&cookie))).await).await;
    assert!(body.contains("value=\"5\""), "expected merged quantity 5 in:\n{body}");
    assert_eq!(body.matches("data-line-id").count(), 1);

    // The checkout reference was reused, not recreated
    assert_eq!(app.stub.checkouts_created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn different_variants_get_their_own_lines() {
    let app = spawn_app().await;

    let response = app
        .send(form_post("/cart/add", "product_id=p-1&variant_id=v-1&quantity=1", None))
        .await;
    let cookie = session_cookie(&response).unwrap();

    app.send(form_post(
        "/cart/add",
        "product_id=p-1&variant_id=v-2&quantity=1",
        Some(&cookie),
    ))
    .await;

    let body = body_string(app.send(get_request("/cart", Some(&cookie))).await).await;
    assert_eq!(body.matches("data-line-id").count(), 2);
}

#[tokio::test]
async fn zero_quantity_update_is_a_no_op() {
    let app = spawn_app().await;

    let response = app
        .send(form_post("/cart/add", "product_id=p-1&variant_id=v-1&quantity=4", None))
        .await;
    let cookie = session_cookie(&response).unwrap();

    // Quantity 0 must not remove or zero the line
    let response = app
        .send(form_post(
            "/cart/update",
            "line_id=p-1%2Fv-1&quantity=0",
            Some(&cookie),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");

    let body = body_string(app.send(get_request("/cart", Some(&cookie))).await).await;
    assert!(body.contains("value=\"4\""), "expected quantity 4 in:\n{body}");
}

#[tokio::test]
async fn update_replaces_quantity() {
    let app = spawn_app().await;

    let response = app
        .send(form_post("/cart/add", "product_id=p-1&variant_id=v-1&quantity=2", None))
        .await;
    let cookie = session_cookie(&response).unwrap();

    app.send(form_post(
        "/cart/update",
        "line_id=p-1%2Fv-1&quantity=7",
        Some(&cookie),
    ))
    .await;

    let body = body_string(app.send(get_request("/cart", Some(&cookie))).await).await;
    assert!(body.contains("value=\"7\""), "expected quantity 7 in:\n{body}");
}

#[tokio::test]
async fn remove_is_idempotent() {
    let app = spawn_app().await;

    let response = app
        .send(form_post("/cart/add", "product_id=p-1&variant_id=v-1&quantity=2", None))
        .await;
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .send(form_post("/cart/remove", "line_id=p-1%2Fv-1", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");

    let body = body_string(app.send(get_request("/cart", Some(&cookie))).await).await;
    assert!(body.contains("Your cart is empty"));

    // Removing the same line again neither errors nor changes anything
    let response = app
        .send(form_post("/cart/remove", "line_id=p-1%2Fv-1", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");

    let body = body_string(app.send(get_request("/cart", Some(&cookie))).await).await;
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn checkout_redirects_to_the_hosted_payment_url() {
    let app = spawn_app().await;

    let response = app
        .send(form_post("/cart/add", "product_id=p-1&variant_id=v-1&quantity=1", None))
        .await;
    let cookie = session_cookie(&response).unwrap();

    let response = app.send(get_request("/checkout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "https://pay.example/chk-1");
}

#[tokio::test]
async fn checkout_without_a_cart_goes_back_to_the_cart_page() {
    let app = spawn_app().await;

    let response = app.send(get_request("/checkout", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
}

#[tokio::test]
async fn unknown_variant_does_not_touch_the_cart() {
    let app = spawn_app().await;

    let response = app
        .send(form_post("/cart/add", "product_id=p-1&variant_id=v-9&quantity=1", None))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart?error=notfound");

    // No checkout was created for a rejected add
    assert_eq!(app.stub.checkouts_created.load(Ordering::SeqCst), 0);
}
