//! Integration tests for the session cart endpoints.
//!
//! The cart lives server-side, keyed by a session cookie; these tests
//! capture the cookie from the first mutation and replay it, exactly as
//! a browser would.

use axum::http::StatusCode;
use serde_json::{Value, json};

mod common;
use common::*;

fn margherita(quantity: u32) -> Value {
    json!({
        "id": "margherita",
        "name": "Margherita",
        "description": "Tomato, mozzarella, basil",
        "unitPrice": "11.50",
        "quantity": quantity
    })
}

fn caesar() -> Value {
    json!({
        "id": "caesar",
        "name": "Caesar",
        "unitPrice": "12.99",
        "quantity": 1
    })
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_empty_cart_on_first_visit() {
    let t = bare_app();

    let response = get(&t.app, "/cart").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["itemCount"], 0);
}

#[tokio::test]
async fn test_add_item_persists_across_requests() {
    let t = bare_app();

    let response = post_json(&t.app, "/cart/items", &margherita(2)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("mutation sets a session cookie");

    let body = body_json(response).await;
    assert_eq!(body["itemCount"], 2);
    assert_eq!(body["items"][0]["id"], "margherita");
    assert_eq!(body["items"][0]["unitPrice"], "11.50");

    // Same session sees the cart; a fresh one does not
    let replay = body_json(get_with(&t.app, "/cart", &[("cookie", &cookie)]).await).await;
    assert_eq!(replay["itemCount"], 2);

    let fresh = body_json(get(&t.app, "/cart").await).await;
    assert_eq!(fresh["itemCount"], 0);
}

#[tokio::test]
async fn test_re_adding_an_item_merges_quantities() {
    let t = bare_app();

    let response = post_json(&t.app, "/cart/items", &margherita(1)).await;
    let cookie = session_cookie(&response).expect("session cookie");

    let body = body_json(
        post_json_with(&t.app, "/cart/items", &margherita(2), &[("cookie", &cookie)]).await,
    )
    .await;

    assert_eq!(body["items"].as_array().expect("items").len(), 1);
    assert_eq!(body["items"][0]["quantity"], 3);
    assert_eq!(body["itemCount"], 3);
}

#[tokio::test]
async fn test_set_quantity_overwrites() {
    let t = bare_app();

    let response = post_json(&t.app, "/cart/items", &margherita(2)).await;
    let cookie = session_cookie(&response).expect("session cookie");

    let body = body_json(
        request(
            &t.app,
            "PATCH",
            "/cart/items/margherita",
            Some(&json!({"quantity": 5})),
            &[("cookie", &cookie)],
        )
        .await,
    )
    .await;

    assert_eq!(body["items"][0]["quantity"], 5);
    assert_eq!(body["itemCount"], 5);
}

#[tokio::test]
async fn test_set_quantity_zero_removes_entry() {
    let t = bare_app();

    let response = post_json(&t.app, "/cart/items", &margherita(2)).await;
    let cookie = session_cookie(&response).expect("session cookie");
    post_json_with(&t.app, "/cart/items", &caesar(), &[("cookie", &cookie)]).await;

    let body = body_json(
        request(
            &t.app,
            "PATCH",
            "/cart/items/margherita",
            Some(&json!({"quantity": 0})),
            &[("cookie", &cookie)],
        )
        .await,
    )
    .await;

    assert_eq!(body["items"].as_array().expect("items").len(), 1);
    assert_eq!(body["items"][0]["id"], "caesar");
}

#[tokio::test]
async fn test_set_quantity_on_unknown_id_is_a_no_op() {
    let t = bare_app();

    let response = post_json(&t.app, "/cart/items", &margherita(2)).await;
    let cookie = session_cookie(&response).expect("session cookie");

    let response = request(
        &t.app,
        "PATCH",
        "/cart/items/tiramisu",
        Some(&json!({"quantity": 4})),
        &[("cookie", &cookie)],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["itemCount"], 2, "existing entries are untouched");
}

#[tokio::test]
async fn test_remove_item() {
    let t = bare_app();

    let response = post_json(&t.app, "/cart/items", &margherita(2)).await;
    let cookie = session_cookie(&response).expect("session cookie");
    post_json_with(&t.app, "/cart/items", &caesar(), &[("cookie", &cookie)]).await;

    let body = body_json(
        request(
            &t.app,
            "DELETE",
            "/cart/items/margherita",
            None,
            &[("cookie", &cookie)],
        )
        .await,
    )
    .await;

    assert_eq!(body["items"].as_array().expect("items").len(), 1);
    assert_eq!(body["items"][0]["id"], "caesar");
}

#[tokio::test]
async fn test_clear_cart() {
    let t = bare_app();

    let response = post_json(&t.app, "/cart/items", &margherita(2)).await;
    let cookie = session_cookie(&response).expect("session cookie");

    let body = body_json(request(&t.app, "DELETE", "/cart", None, &[("cookie", &cookie)]).await)
        .await;
    assert_eq!(body["items"], json!([]));

    // Still empty for the same session afterwards
    let replay = body_json(get_with(&t.app, "/cart", &[("cookie", &cookie)]).await).await;
    assert_eq!(replay["itemCount"], 0);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_add_item_with_zero_quantity_is_rejected() {
    let t = bare_app();

    let response = post_json(&t.app, "/cart/items", &margherita(0)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .expect("error message")
            .contains("items[].quantity"),
        "error should name the offending field"
    );
}

#[tokio::test]
async fn test_add_item_with_negative_price_is_rejected() {
    let t = bare_app();

    let item = json!({
        "id": "margherita",
        "name": "Margherita",
        "unitPrice": "-1.00",
        "quantity": 1
    });
    let response = post_json(&t.app, "/cart/items", &item).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .expect("error message")
            .contains("items[].unitPrice"),
        "error should name the offending field"
    );
}

#[tokio::test]
async fn test_rejected_item_does_not_touch_the_cart() {
    let t = bare_app();

    let response = post_json(&t.app, "/cart/items", &margherita(1)).await;
    let cookie = session_cookie(&response).expect("session cookie");

    let rejected = post_json_with(
        &t.app,
        "/cart/items",
        &margherita(0),
        &[("cookie", &cookie)],
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let body = body_json(get_with(&t.app, "/cart", &[("cookie", &cookie)]).await).await;
    assert_eq!(body["itemCount"], 1, "cart keeps its pre-rejection state");
}
