use axum::{
    extract::Extension,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::error::CafeError;
use crate::middleware::{
    logging::to_response,
    session::{session_middleware, CurrentSession, SessionStore},
};
use super::extract::JsonBody;
use crate::services::customers;

//Routers
pub fn customer_routes() -> Router {
    Router::new()
        .route("/", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn session_customer_routes(sessions: SessionStore) -> Router {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/logout", post(logout))
        .layer(middleware::from_fn_with_state(sessions, session_middleware))
}

pub fn admin_customer_routes() -> Router {
    Router::new().route("/customers", get(get_customers))
}

//Routes
async fn health() -> Response {
    to_response(Json(json!({ "status": "ok" })), Ok(()))
}

async fn register(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    JsonBody(payload): JsonBody<RegisterCustomer>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return CafeError::from(errors).into_response();
    }

    match customers::register(&db, &payload.name, &payload.phone, &payload.email).await {
        Ok(customer_id) => to_response(
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": format!("Registered successfully! Your Customer ID is {customer_id}"),
                    "customer_id": customer_id
                })),
            ),
            Ok(()),
        ),
        Err(err) => err.into_response(),
    }
}

/// Login is a bare identity claim: knowing an id is enough to open a session.
async fn login(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(sessions): Extension<SessionStore>,
    JsonBody(payload): JsonBody<Login>,
) -> Response {
    match customers::find_by_id(&db, payload.customer_id).await {
        Ok(Some(customer)) => {
            let token = sessions.open(customer.id).await;
            to_response(
                (
                    StatusCode::OK,
                    Json(json!({
                        "message": format!("Welcome back, {}!", customer.name),
                        "token": token.to_string(),
                        "customer": customer
                    })),
                ),
                Ok(()),
            )
        }
        Ok(None) => CafeError::not_found("Customer", payload.customer_id).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn logout(
    Extension(sessions): Extension<SessionStore>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    sessions.close(&session.token).await;
    to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": "Logged out"
            })),
        ),
        Ok(()),
    )
}

async fn get_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    let customer_id = session.handle.lock().await.customer_id;
    match customers::find_by_id(&db, customer_id).await {
        Ok(Some(customer)) => to_response((StatusCode::OK, Json(customer)), Ok(())),
        Ok(None) => CafeError::not_found("Customer", customer_id).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_customers(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match customers::list_customers(&db).await {
        Ok(customers) => to_response((StatusCode::OK, Json(customers)), Ok(())),
        Err(err) => err.into_response(),
    }
}

//Structs
#[derive(Deserialize, Debug, Validate)]
struct RegisterCustomer {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(regex(path = *PHONE_REGEX))]
    phone: String,
    #[validate(email)]
    email: String,
}

#[derive(Deserialize)]
struct Login {
    customer_id: i32,
}

//utils
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{3,18}[0-9]$").expect("valid phone pattern"));
