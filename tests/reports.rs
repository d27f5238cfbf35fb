mod common;

use reqwest::StatusCode;
use rust_decimal::Decimal;

use common::{money, spawn_app};

#[tokio::test]
async fn test_reports_on_empty_store() {
    let app = spawn_app().await;

    for path in ["/api/admin/reports/daily", "/api/admin/reports/monthly"] {
        let (status, series) = app.get_json(path, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(series.as_array().unwrap().is_empty());
    }

    let (status, dashboard) = app.get_json("/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["orders"], 0);
    assert_eq!(money(&dashboard["total_revenue"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_sales_reports_and_dashboard() {
    let app = spawn_app().await;
    let coffee = app.add_item("Coffee", "Hot Drinks", "3.00").await;
    let muffin = app.add_item("Muffin", "Bakery", "2.25").await;
    let (_, token) = app.customer("Asha", "asha@example.com").await;

    // Two orders today: 6.00 and 4.50
    app.put_cart(&token, coffee, 2).await;
    assert_eq!(app.place_order(&token).await.status(), StatusCode::CREATED);
    app.put_cart(&token, muffin, 2).await;
    assert_eq!(app.place_order(&token).await.status(), StatusCode::CREATED);

    for path in [
        "/api/admin/reports/daily",
        "/api/admin/reports/daily?order=desc",
        "/api/admin/reports/monthly?order=asc",
    ] {
        let (status, series) = app.get_json(path, None).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        let buckets = series.as_array().unwrap();
        assert_eq!(buckets.len(), 1, "{path}");
        assert_eq!(money(&buckets[0]["total_sales"]), Decimal::new(1050, 2));
    }

    let (_, dashboard) = app.get_json("/api/dashboard", None).await;
    assert_eq!(dashboard["customers"], 1);
    assert_eq!(dashboard["menu_items"], 2);
    assert_eq!(dashboard["orders"], 2);
    assert_eq!(money(&dashboard["total_revenue"]), Decimal::new(1050, 2));
    assert_eq!(dashboard["top_items"][0]["name"], "Coffee");
}

#[tokio::test]
async fn test_unknown_sort_order_is_rejected() {
    let app = spawn_app().await;
    let response = app
        .client
        .get(app.url("/api/admin/reports/daily?order=sideways"))
        .send()
        .await
        .expect("Failed to send report request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse error JSON");
    assert!(body["error"].as_str().unwrap().contains("query string"));
}
