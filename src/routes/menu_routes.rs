use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::extract::{JsonBody, PathParam, QueryParams};
use crate::middleware::logging::to_response;
use crate::services::{catalog, reviews};

//Routers
pub fn menu_routes() -> Router {
    Router::new()
        .route("/menu", get(get_menu))
        .route("/menu/:id/reviews", get(get_reviews))
}

pub fn admin_menu_routes() -> Router {
    Router::new()
        .route("/menu", post(create_item).get(get_menu))
        .route(
            "/menu/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

//Routes
async fn get_menu(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    QueryParams(query): QueryParams<MenuQuery>,
) -> Response {
    match catalog::list_items(&db, query.ratings.unwrap_or(true)).await {
        Ok(items) => to_response((StatusCode::OK, Json(items)), Ok(())),
        Err(err) => err.into_response(),
    }
}

async fn get_reviews(
    PathParam(id): PathParam<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match reviews::list_reviews(&db, id).await {
        Ok(reviews) => to_response((StatusCode::OK, Json(reviews)), Ok(())),
        Err(err) => err.into_response(),
    }
}

async fn create_item(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    JsonBody(payload): JsonBody<MenuItemPayload>,
) -> Response {
    match catalog::add_item(&db, &payload.name, &payload.category, payload.price).await {
        Ok(id) => to_response(
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": format!("Added '{}' to the menu!", payload.name.trim()),
                    "id": id
                })),
            ),
            Ok(()),
        ),
        Err(err) => err.into_response(),
    }
}

async fn get_item(
    PathParam(id): PathParam<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match catalog::get_item(&db, id).await {
        Ok(item) => to_response((StatusCode::OK, Json(item)), Ok(())),
        Err(err) => err.into_response(),
    }
}

async fn update_item(
    PathParam(id): PathParam<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    JsonBody(payload): JsonBody<MenuItemPayload>,
) -> Response {
    match catalog::update_item(&db, id, &payload.name, &payload.category, payload.price).await {
        Ok(item) => to_response((StatusCode::OK, Json(item)), Ok(())),
        Err(err) => err.into_response(),
    }
}

async fn delete_item(
    PathParam(id): PathParam<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match catalog::remove_item(&db, id).await {
        Ok(removed) => to_response(
            (
                StatusCode::OK,
                Json(json!({
                    "message": format!("Item with ID {id} removed."),
                    "removed": removed
                })),
            ),
            Ok(()),
        ),
        Err(err) => err.into_response(),
    }
}

//Structs
#[derive(Deserialize)]
struct MenuQuery {
    ratings: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct MenuItemPayload {
    name: String,
    category: String,
    price: Decimal,
}
