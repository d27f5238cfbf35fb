pub mod cart_routes;
pub mod customer_routes;
mod extract;
pub mod menu_routes;
pub mod order_routes;
pub mod report_routes;
pub mod review_routes;

use axum::{middleware, Extension, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::middleware::{logging::logging_middleware, session::SessionStore};

use {
    cart_routes::cart_routes,
    customer_routes::{admin_customer_routes, customer_routes, session_customer_routes},
    menu_routes::{admin_menu_routes, menu_routes},
    order_routes::{admin_order_routes, order_routes},
    report_routes::{dashboard_routes, report_routes},
    review_routes::review_routes,
};

pub fn api_router(db: Arc<DatabaseConnection>, sessions: SessionStore) -> Router {
    let api = Router::new()
        .merge(menu_routes())
        .merge(dashboard_routes())
        .merge(session_customer_routes(sessions.clone()))
        .merge(cart_routes(sessions.clone()))
        .merge(order_routes(sessions.clone()))
        .merge(review_routes(sessions.clone()));

    let admin = Router::new()
        .merge(admin_customer_routes())
        .merge(admin_menu_routes())
        .merge(admin_order_routes())
        .merge(report_routes());

    Router::new()
        .merge(customer_routes())
        .nest("/api", api)
        .nest("/api/admin", admin)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(sessions))
        .layer(Extension(db))
}
