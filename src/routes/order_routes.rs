use axum::{
    extract::Extension,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::middleware::{
    logging::to_response,
    session::{session_middleware, CurrentSession, SessionStore},
};
use super::extract::PathParam;
use crate::services::orders;

//ROUTERS
pub fn order_routes(sessions: SessionStore) -> Router {
    Router::new()
        .route("/orders", get(get_history).post(place_order))
        .route("/orders/:id/reorder", post(reorder))
        .layer(middleware::from_fn_with_state(sessions, session_middleware))
}

pub fn admin_order_routes() -> Router {
    Router::new().route("/orders", get(get_orders))
}

//Routes
async fn get_history(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    let customer_id = session.handle.lock().await.customer_id;
    match orders::order_history(&db, customer_id).await {
        Ok(history) => to_response((StatusCode::OK, Json(history)), Ok(())),
        Err(err) => err.into_response(),
    }
}

/// The session stays locked for the whole placement, so a double submit
/// cannot commit the same cart twice.
async fn place_order(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<CurrentSession>,
    payload: Option<Json<OrderPayload>>,
) -> Response {
    let upi_number = payload.and_then(|Json(p)| p.upi_number);
    let mut session = session.handle.lock().await;
    let customer_id = session.customer_id;
    match orders::place_order(&db, customer_id, &mut session.cart, upi_number).await {
        Ok(order_id) => to_response(
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": format!("Order placed successfully! Your Order ID is {order_id}"),
                    "order_id": order_id
                })),
            ),
            Ok(()),
        ),
        Err(err) => err.into_response(),
    }
}

async fn reorder(
    PathParam(id): PathParam<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<CurrentSession>,
    payload: Option<Json<OrderPayload>>,
) -> Response {
    let upi_number = payload.and_then(|Json(p)| p.upi_number);
    let customer_id = session.handle.lock().await.customer_id;
    match orders::reorder(&db, customer_id, id, upi_number).await {
        Ok(order_id) => to_response(
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": format!("Reordered order {id} as order {order_id}"),
                    "order_id": order_id
                })),
            ),
            Ok(()),
        ),
        Err(err) => err.into_response(),
    }
}

async fn get_orders(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match orders::list_orders(&db).await {
        Ok(all) => to_response((StatusCode::OK, Json(all)), Ok(())),
        Err(err) => err.into_response(),
    }
}

//Structs
#[derive(Deserialize, Default)]
struct OrderPayload {
    upi_number: Option<String>,
}
