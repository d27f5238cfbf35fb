pub mod cart;
pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;

use axum::Router;
use sea_orm::{Database, DatabaseConnection, DbErr};
use std::sync::Arc;

use crate::middleware::session::SessionStore;

/// Opens the store and makes sure every table exists.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    entities::setup_schema(&db).await?;
    Ok(db)
}

pub fn app(db: DatabaseConnection) -> Router {
    routes::api_router(Arc::new(db), SessionStore::new())
}
