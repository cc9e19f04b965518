//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{AppState, response::ApiResponse, transaction::core::delete_transaction};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// The transaction's amount is debited from its month's budget before the
/// row is removed.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match delete_transaction(id, &connection) {
        Ok(()) => Json(ApiResponse::confirmation(
            "Transaction deleted successfully",
        ))
        .into_response(),
        Err(error) => {
            tracing::error!("could not delete transaction {id}: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        budget::load_budget,
        db::initialize,
        transaction::core::{NewTransaction, create_transaction},
    };

    use super::{DeleteTransactionState, delete_transaction_endpoint};

    fn get_test_state() -> DeleteTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_transaction_and_debits_budget() {
        let state = get_test_state();
        let id = {
            let connection = state.db_connection.lock().unwrap();
            let (transaction, _) = create_transaction(
                NewTransaction {
                    amount: 50.0,
                    description: "lunch".to_owned(),
                    date: "2025-03-05".to_owned(),
                    category: "Meal".to_owned(),
                },
                &connection,
            )
            .unwrap();
            transaction.id
        };

        let response = delete_transaction_endpoint(State(state.clone()), Path(id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        let budget = load_budget("2025-03", &connection).unwrap().unwrap();
        assert_eq!(budget.budgets["Meal"].spent, 0.0);
    }

    #[tokio::test]
    async fn deleting_unknown_transaction_is_not_found() {
        let state = get_test_state();

        let response = delete_transaction_endpoint(State(state), Path(999))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
