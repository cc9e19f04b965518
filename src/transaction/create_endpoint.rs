//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    budget::CategoryBudget,
    transaction::{
        Transaction,
        core::{NewTransaction, create_transaction},
        form::AmountField,
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionForm {
    /// The amount spent, as a number or numeric string.
    pub amount: AmountField,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
    /// When the transaction happened, as `YYYY-MM-DD`.
    pub date: String,
    /// The category the spend is budgeted under.
    pub category: String,
}

/// The response body for a created transaction: the record itself plus the
/// budget entry its amount was credited to.
#[derive(Debug, Serialize)]
pub struct CreateTransactionResponse {
    /// Always `true`.
    pub success: bool,
    /// A human-readable confirmation.
    pub message: String,
    /// The created transaction.
    pub data: Transaction,
    /// The budget entry for the transaction's category after crediting.
    #[serde(rename = "updatedBudget")]
    pub updated_budget: CategoryBudget,
}

/// A route handler for creating a new transaction.
///
/// Credits the amount to the owning month's budget, creating the month
/// document and category entry (with a zero limit) as needed.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(form): Json<CreateTransactionForm>,
) -> impl IntoResponse {
    // Validation happens before any write.
    let amount = match form.amount.to_f64() {
        Ok(amount) => amount,
        Err(error) => return error.into_response(),
    };

    let new = NewTransaction {
        amount,
        description: form.description,
        date: form.date,
        category: form.category,
    };

    let connection = state.db_connection.lock().unwrap();

    match create_transaction(new, &connection) {
        Ok((transaction, entry)) => (
            StatusCode::CREATED,
            Json(CreateTransactionResponse {
                success: true,
                message: "Transaction added successfully".to_owned(),
                data: transaction,
                updated_budget: entry,
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_response()
        }
    }
}
