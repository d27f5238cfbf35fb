use axum::{
    extract::Extension,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::post,
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
use super::extract::JsonBody;
use crate::services::reviews;

//ROUTERS
pub fn review_routes(sessions: SessionStore) -> Router {
    Router::new()
        .route("/reviews", post(post_review))
        .layer(middleware::from_fn_with_state(sessions, session_middleware))
}

//Routes
async fn post_review(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<CurrentSession>,
    JsonBody(payload): JsonBody<ReviewPayload>,
) -> Response {
    let customer_id = session.handle.lock().await.customer_id;
    match reviews::add_review(
        &db,
        customer_id,
        payload.item_id,
        payload.rating,
        &payload.review,
    )
    .await
    {
        Ok(review_id) => to_response(
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Thank you for your feedback!",
                    "review_id": review_id
                })),
            ),
            Ok(()),
        ),
        Err(err) => err.into_response(),
    }
}

//Structs
#[derive(Deserialize)]
struct ReviewPayload {
    item_id: i32,
    rating: i32,
    review: String,
}
