//! Defines the app level error type and its conversion to JSON failure responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::ApiResponse;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount supplied for a transaction could not be coerced to a number.
    ///
    /// Amounts may arrive as JSON numbers or as numeric strings (HTML form
    /// clients send the latter); anything else is rejected before any write.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The date supplied for a transaction did not parse as `YYYY-MM-DD`.
    ///
    /// The transaction's month bucket is derived from the first seven
    /// characters of the date, so malformed dates must be rejected up front.
    #[error("\"{0}\" is not a valid date in the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A budget limit below zero was supplied to the set-limits operation.
    #[error("the limit {limit} for category \"{category}\" is negative")]
    NegativeLimit {
        /// The category the negative limit was supplied for.
        category: String,
        /// The offending limit.
        limit: f64,
    },

    /// A required field was missing from the request body.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// The referenced transaction does not exist in the database.
    #[error("the transaction could not be found")]
    TransactionNotFound,

    /// A budget document could not be serialized to or from its JSON column.
    ///
    /// The error string should only be logged for debugging on the server;
    /// clients receive a generic internal-error message.
    #[error("could not serialize budget as JSON: {0}")]
    BudgetSerialization(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::BudgetSerialization(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            Error::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "Invalid amount value".to_owned()),
            Error::InvalidDate(ref date) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid date \"{date}\", expected YYYY-MM-DD"),
            ),
            Error::NegativeLimit { .. } => (
                StatusCode::BAD_REQUEST,
                "Budget limits cannot be negative".to_owned(),
            ),
            Error::MissingField(_) => (
                StatusCode::BAD_REQUEST,
                "Month and budget limits are required".to_owned(),
            ),
            Error::TransactionNotFound => {
                (StatusCode::NOT_FOUND, "Transaction not found".to_owned())
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_owned(),
                )
            }
        };

        (status_code, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
