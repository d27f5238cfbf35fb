use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::CafeError;

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed = start.elapsed();
    match response.extensions().get::<Result<(), ApiError>>() {
        Some(Ok(_)) => info!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            "Processed request"
        ),
        Some(Err(value)) if value.is_server_fault() => error!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            value = %value,
            "Failed to process request"
        ),
        Some(Err(value)) => warn!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            value = %value,
            "Rejected request"
        ),
        None => info!(
            method = %method,
            uri = %uri,
            status = %status,
            elapsed = ?elapsed,
            "Processed request without outcome record"
        ),
    }

    response
}

/// Outcome record a handler attaches to its response for the request log.
#[derive(Clone, Debug)]
pub enum ApiError {
    Validation(String),
    DuplicateEmail(String),
    NotFound(String),
    EmptyCart,
    NoSession,
    DbError(String),
}

impl ApiError {
    fn is_server_fault(&self) -> bool {
        matches!(self, ApiError::DbError(_))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(value) => write!(f, "Failed to validate: {value}"),
            ApiError::DuplicateEmail(value) => write!(f, "Duplicate email: {value}"),
            ApiError::NotFound(value) => write!(f, "Not found: {value}"),
            ApiError::EmptyCart => write!(f, "Empty cart"),
            ApiError::NoSession => write!(f, "No session"),
            ApiError::DbError(value) => write!(f, "Database error: {value}"),
        }
    }
}

impl From<&CafeError> for ApiError {
    fn from(err: &CafeError) -> Self {
        match err {
            CafeError::Validation(value) => ApiError::Validation(value.clone()),
            CafeError::DuplicateEmail(value) => ApiError::DuplicateEmail(value.clone()),
            CafeError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CafeError::EmptyCart => ApiError::EmptyCart,
            CafeError::NoSession => ApiError::NoSession,
            CafeError::Db(value) => ApiError::DbError(value.to_string()),
        }
    }
}

pub fn to_response<T: IntoResponse>(
    response: T,               //The response that we are sending + StatusCode
    ext: Result<(), ApiError>, //The extension, that we want to give logging middleware
) -> Response {
    let mut response = response.into_response();

    response.extensions_mut().insert(ext);

    response
}
