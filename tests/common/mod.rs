#![allow(dead_code)]

use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tempfile::TempDir;

use cafe_central::{app, connect};

/// A server on an ephemeral port backed by its own SQLite file.
pub struct TestApp {
    pub base: String,
    pub client: Client,
    _dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("cafe.db").display()
    );
    let db = connect(&url).await.expect("Failed to open database");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(db))
            .await
            .expect("Server stopped unexpectedly");
    });

    TestApp {
        base: format!("http://{addr}"),
        client: Client::new(),
        _dir: dir,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn register(&self, name: &str, email: &str) -> i32 {
        let response = self
            .client
            .post(self.url("/register"))
            .json(&json!({
                "name": name,
                "phone": "555-0101",
                "email": email
            }))
            .send()
            .await
            .expect("Failed to send register request");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response
            .json::<Value>()
            .await
            .expect("Failed to parse register response JSON");
        body["customer_id"].as_i64().expect("customer_id missing") as i32
    }

    pub async fn login(&self, customer_id: i32) -> String {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "customer_id": customer_id }))
            .send()
            .await
            .expect("Failed to send login request");
        assert_eq!(response.status(), StatusCode::OK);

        let body = response
            .json::<Value>()
            .await
            .expect("Failed to parse login response JSON");
        body["token"]
            .as_str()
            .expect("Token not found in login response")
            .to_owned()
    }

    /// Registers and logs in a fresh customer, returning id and token.
    pub async fn customer(&self, name: &str, email: &str) -> (i32, String) {
        let id = self.register(name, email).await;
        let token = self.login(id).await;
        (id, token)
    }

    pub async fn add_item(&self, name: &str, category: &str, price: &str) -> i32 {
        let response = self
            .client
            .post(self.url("/api/admin/menu"))
            .json(&json!({
                "name": name,
                "category": category,
                "price": price
            }))
            .send()
            .await
            .expect("Failed to send add item request");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response
            .json::<Value>()
            .await
            .expect("Failed to parse add item response JSON");
        body["id"].as_i64().expect("id missing") as i32
    }

    pub async fn put_cart(&self, token: &str, item_id: i32, quantity: u32) -> reqwest::Response {
        self.client
            .put(self.url(&format!("/api/cart/{item_id}")))
            .bearer_auth(token)
            .json(&json!({ "quantity": quantity }))
            .send()
            .await
            .expect("Failed to send cart request")
    }

    pub async fn place_order(&self, token: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/orders"))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to send order request")
    }

    pub async fn get_json(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.expect("Failed to send GET request");
        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .expect("Failed to parse response JSON");
        (status, body)
    }
}

/// Money fields travel as decimal strings.
pub fn money(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("money should be a string")
        .parse()
        .expect("money should parse as a decimal")
}
