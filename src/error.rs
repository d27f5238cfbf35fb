use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

use crate::middleware::logging::{to_response, ApiError};

/// Failures an operation can surface to the person who triggered it.
#[derive(Error, Debug)]
pub enum CafeError {
    #[error("{0}")]
    Validation(String),
    #[error("A customer with email {0} is already registered")]
    DuplicateEmail(String),
    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("Cart is empty, add at least one item before ordering")]
    EmptyCart,
    #[error("Missing or unknown session")]
    NoSession,
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

pub type CafeResult<T> = Result<T, CafeError>;

impl CafeError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        CafeError::NotFound { entity, id }
    }

    /// Maps an insert failure on `customers` to `DuplicateEmail` when the
    /// store reports a unique violation.
    pub fn from_registration(err: DbErr, email: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                CafeError::DuplicateEmail(email.to_owned())
            }
            _ => CafeError::Db(err),
        }
    }

    /// A row deleted between read and update surfaces as not found.
    pub fn from_update(err: DbErr, entity: &'static str, id: i32) -> Self {
        match err {
            DbErr::RecordNotUpdated => CafeError::not_found(entity, id),
            other => CafeError::Db(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CafeError::Validation(_) | CafeError::EmptyCart => StatusCode::BAD_REQUEST,
            CafeError::DuplicateEmail(_) => StatusCode::CONFLICT,
            CafeError::NotFound { .. } => StatusCode::NOT_FOUND,
            CafeError::NoSession => StatusCode::UNAUTHORIZED,
            CafeError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Store details stay out of the body but reach the request log.
impl IntoResponse for CafeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            CafeError::Db(_) => "Internal server error".to_owned(),
            other => other.to_string(),
        };
        to_response(
            (status, Json(json!({ "error": message }))),
            Err(ApiError::from(&self)),
        )
    }
}

impl From<validator::ValidationErrors> for CafeError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CafeError::Validation(errors.to_string())
    }
}
