use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Service-specific error types
///
/// Errors the HTTP layer reports itself. Failed subgraph queries are not
/// errors; they are returned as query outcomes.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A subgraph request failed in a way the client could not describe
    #[error("Subgraph request failed: {0}")]
    Subgraph(String),

    /// The request body did not describe a valid chain selection
    #[error("Invalid chain selection: {0}")]
    InvalidChain(String),
}

/// Structured error response for the API
#[derive(Serialize)]
struct ErrorResponse {
    /// Human-readable error message
    error: String,

    /// Machine-readable error code
    error_code: String,

    /// Optional detailed error information
    details: Option<String>,
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        let (error_code, details) = match self {
            ServiceError::Subgraph(details) => ("SUBGRAPH_ERROR", details.clone()),
            ServiceError::InvalidChain(details) => ("INVALID_CHAIN", details.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details: Some(details),
        })
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            ServiceError::Subgraph(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::InvalidChain(_) => StatusCode::BAD_REQUEST,
        }
    }
}
