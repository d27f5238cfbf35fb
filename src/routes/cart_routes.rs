use axum::{
    extract::Extension,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cart::{Cart, CartLine, CartState};
use crate::middleware::{
    logging::to_response,
    session::{session_middleware, CurrentSession, SessionStore},
};
use super::extract::{JsonBody, PathParam};
use crate::services::orders;

//ROUTERS
pub fn cart_routes(sessions: SessionStore) -> Router {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/:item_id", put(put_entry))
        .layer(middleware::from_fn_with_state(sessions, session_middleware))
}

//Routes
async fn get_cart(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<CurrentSession>,
) -> Response {
    let mut session = session.handle.lock().await;
    match orders::refresh_cart(&db, &mut session.cart).await {
        Ok(()) => to_response((StatusCode::OK, Json(CartView::new(&session.cart))), Ok(())),
        Err(err) => err.into_response(),
    }
}

/// Sets the quantity for one item; zero takes it out of the cart.
async fn put_entry(
    PathParam(item_id): PathParam<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<CurrentSession>,
    JsonBody(payload): JsonBody<PutCart>,
) -> Response {
    let mut session = session.handle.lock().await;
    match orders::update_cart(&db, &mut session.cart, item_id, payload.quantity).await {
        Ok(()) => to_response((StatusCode::OK, Json(CartView::new(&session.cart))), Ok(())),
        Err(err) => err.into_response(),
    }
}

async fn clear_cart(Extension(session): Extension<CurrentSession>) -> Response {
    let mut session = session.handle.lock().await;
    session.cart.clear();
    to_response((StatusCode::OK, Json(CartView::new(&session.cart))), Ok(()))
}

//Structs
#[derive(Deserialize)]
struct PutCart {
    quantity: u32,
}

#[derive(Serialize)]
struct CartView {
    state: CartState,
    lines: Vec<CartLine>,
    total: Decimal,
}

impl CartView {
    fn new(cart: &Cart) -> CartView {
        CartView {
            state: cart.state(),
            lines: cart.lines().to_vec(),
            total: cart.total(),
        }
    }
}
