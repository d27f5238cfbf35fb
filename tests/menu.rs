mod common;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use common::{money, spawn_app};

#[tokio::test]
async fn test_menu_crud() {
    let app = spawn_app().await;

    // Step 1: add and read back
    let latte = app.add_item("Latte", "Hot Drinks", "4.50").await;
    let (status, item) = app
        .get_json(&format!("/api/admin/menu/{latte}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["name"], "Latte");
    assert_eq!(money(&item["price"]), Decimal::new(450, 2));

    // Step 2: update every field
    let response = app
        .client
        .put(app.url(&format!("/api/admin/menu/{latte}")))
        .json(&json!({
            "name": "Oat Latte",
            "category": "Hot Drinks",
            "price": "4.75"
        }))
        .send()
        .await
        .expect("Failed to send update request");
    assert_eq!(response.status(), StatusCode::OK);

    let (_, menu) = app.get_json("/api/menu", None).await;
    assert_eq!(menu[0]["name"], "Oat Latte");
    assert_eq!(money(&menu[0]["price"]), Decimal::new(475, 2));

    // Step 3: delete, then delete again
    for expected in [true, false] {
        let response = app
            .client
            .delete(app.url(&format!("/api/admin/menu/{latte}")))
            .send()
            .await
            .expect("Failed to send delete request");
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.json::<Value>().await.unwrap();
        assert_eq!(body["removed"], expected);
    }

    let (status, _) = app
        .get_json(&format!("/api/admin/menu/{latte}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, menu) = app.get_json("/api/menu", None).await;
    assert!(menu.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_menu_rejects_bad_prices() {
    let app = spawn_app().await;

    for price in ["-1.00", "2.345"] {
        let response = app
            .client
            .post(app.url("/api/admin/menu"))
            .json(&json!({ "name": "Tea", "category": "Hot Drinks", "price": price }))
            .send()
            .await
            .expect("Failed to send add item request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{price}");
    }

    let response = app
        .client
        .put(app.url("/api/admin/menu/42"))
        .json(&json!({ "name": "Tea", "category": "Hot Drinks", "price": "2.00" }))
        .send()
        .await
        .expect("Failed to send update request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviews_drive_rating_labels() {
    let app = spawn_app().await;
    let scone = app.add_item("Scone", "Bakery", "3.00").await;
    let tea = app.add_item("Tea", "Hot Drinks", "2.00").await;
    let (_, token) = app.customer("Asha", "asha@example.com").await;

    // Step 1: out-of-range rating is refused
    let response = app
        .client
        .post(app.url("/api/reviews"))
        .bearer_auth(&token)
        .json(&json!({ "item_id": scone, "rating": 6, "review": "Too good" }))
        .send()
        .await
        .expect("Failed to send review request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Step 2: two valid reviews
    for (rating, text) in [(4, "Nice and crumbly"), (5, "Best in town")] {
        let response = app
            .client
            .post(app.url("/api/reviews"))
            .bearer_auth(&token)
            .json(&json!({ "item_id": scone, "rating": rating, "review": text }))
            .send()
            .await
            .expect("Failed to send review request");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Step 3: listing carries the averages
    let (_, menu) = app.get_json("/api/menu", None).await;
    let scone_row = &menu[0];
    assert_eq!(scone_row["id"], scone);
    assert_eq!(scone_row["rating_label"], "4.5");
    assert_eq!(scone_row["review_count"], 2);
    let tea_row = &menu[1];
    assert_eq!(tea_row["id"], tea);
    assert_eq!(tea_row["rating_label"], "No ratings yet");
    assert!(tea_row["average_rating"].is_null());

    let (_, plain) = app.get_json("/api/menu?ratings=false", None).await;
    assert_eq!(plain[0]["rating_label"], "No ratings yet");

    // Step 4: reviews per item, newest first
    let (status, reviews) = app
        .get_json(&format!("/api/menu/{scone}/reviews"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = reviews
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["review"].as_str().unwrap())
        .collect();
    assert_eq!(texts, ["Best in town", "Nice and crumbly"]);

    let (status, _) = app.get_json("/api/menu/999/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_needs_session_and_known_item() {
    let app = spawn_app().await;
    let (_, token) = app.customer("Mei", "mei@example.com").await;

    let response = app
        .client
        .post(app.url("/api/reviews"))
        .json(&json!({ "item_id": 1, "rating": 3, "review": "ok" }))
        .send()
        .await
        .expect("Failed to send review request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .client
        .post(app.url("/api/reviews"))
        .bearer_auth(&token)
        .json(&json!({ "item_id": 77, "rating": 3, "review": "ok" }))
        .send()
        .await
        .expect("Failed to send review request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_menu_input_is_a_json_error() {
    let app = spawn_app().await;

    let (status, body) = app.get_json("/api/admin/menu/latte", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app.get_json("/api/menu?ratings=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let response = app
        .client
        .post(app.url("/api/admin/menu"))
        .json(&json!({ "name": "Tea", "category": "Hot Drinks", "price": "cheap" }))
        .send()
        .await
        .expect("Failed to send add item request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>().await.unwrap();
    assert!(body["error"].is_string());
}
