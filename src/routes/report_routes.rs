use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;

use super::extract::QueryParams;
use crate::middleware::logging::to_response;
use crate::services::reports::{self, SortOrder};

//Routers
pub fn report_routes() -> Router {
    Router::new()
        .route("/reports/daily", get(get_daily))
        .route("/reports/monthly", get(get_monthly))
}

pub fn dashboard_routes() -> Router {
    Router::new().route("/dashboard", get(get_dashboard))
}

//Routes
async fn get_daily(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    QueryParams(query): QueryParams<ReportQuery>,
) -> Response {
    match reports::daily_sales(&db, query.order).await {
        Ok(series) => to_response((StatusCode::OK, Json(series)), Ok(())),
        Err(err) => err.into_response(),
    }
}

async fn get_monthly(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    QueryParams(query): QueryParams<ReportQuery>,
) -> Response {
    match reports::monthly_sales(&db, query.order).await {
        Ok(series) => to_response((StatusCode::OK, Json(series)), Ok(())),
        Err(err) => err.into_response(),
    }
}

async fn get_dashboard(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match reports::dashboard(&db).await {
        Ok(summary) => to_response((StatusCode::OK, Json(summary)), Ok(())),
        Err(err) => err.into_response(),
    }
}

//Structs
#[derive(Deserialize)]
struct ReportQuery {
    #[serde(default)]
    order: SortOrder,
}
