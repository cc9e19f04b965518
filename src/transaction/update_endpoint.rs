//! Defines the endpoint for applying a partial update to a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    response::ApiResponse,
    transaction::{
        core::{TransactionUpdate, update_transaction},
        form::AmountField,
    },
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for updating a transaction. Any subset of fields may be
/// supplied; omitted fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionForm {
    /// A new amount, as a number or numeric string.
    pub amount: Option<AmountField>,
    /// A new description.
    pub description: Option<String>,
    /// A new date, as `YYYY-MM-DD`.
    pub date: Option<String>,
    /// A new category.
    pub category: Option<String>,
}

/// A route handler for updating a transaction.
///
/// When the amount or category changes, the owning month's budget is
/// reconciled: the old amount is debited from the old category and the new
/// amount credited to the new one. Responds with the full transaction list,
/// sorted by date descending, so clients can replace their local copy
/// wholesale.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    Path(id): Path<i64>,
    Json(form): Json<UpdateTransactionForm>,
) -> impl IntoResponse {
    let amount = match form.amount.as_ref().map(AmountField::to_f64).transpose() {
        Ok(amount) => amount,
        Err(error) => return error.into_response(),
    };

    let changes = TransactionUpdate {
        amount,
        description: form.description,
        date: form.date,
        category: form.category,
    };

    let connection = state.db_connection.lock().unwrap();

    match update_transaction(id, changes, &connection) {
        Ok(transactions) => Json(ApiResponse::ok(
            "Transaction updated successfully",
            transactions,
        ))
        .into_response(),
        Err(error) => {
            tracing::error!("could not update transaction {id}: {error}");
            error.into_response()
        }
    }
}
