//! Defines the endpoint for listing all transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, budget::resync_all, response::ApiResponse, transaction::core::list_transactions,
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing all transactions, sorted by date descending.
///
/// Listing first resyncs every month's budget from the transaction table, so
/// the spend totals clients read next are consistent with the list they just
/// received.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    let result = resync_all(&connection).and_then(|()| list_transactions(&connection));

    match result {
        Ok(transactions) => Json(ApiResponse::ok(
            "Transactions fetched successfully!",
            transactions,
        ))
        .into_response(),
        Err(error) => {
            tracing::error!("could not list transactions: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        budget::{apply_delta, load_budget},
        db::initialize,
        transaction::core::{NewTransaction, create_transaction},
    };

    use super::{ListTransactionsState, list_transactions_endpoint};

    fn get_test_state() -> ListTransactionsState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        ListTransactionsState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn listing_resyncs_budgets() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                NewTransaction {
                    amount: 50.0,
                    description: "lunch".to_owned(),
                    date: "2025-03-05".to_owned(),
                    category: "Meal".to_owned(),
                },
                &connection,
            )
            .unwrap();
            // Seed drift that the listing's resync must overwrite.
            apply_delta("2025-03", "Meal", 999.0, &connection).unwrap();
        }

        let response = list_transactions_endpoint(State(state.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let connection = state.db_connection.lock().unwrap();
        let budget = load_budget("2025-03", &connection).unwrap().unwrap();
        assert_eq!(budget.budgets["Meal"].spent, 50.0);
    }

    #[tokio::test]
    async fn empty_list_is_ok() {
        let state = get_test_state();

        let response = list_transactions_endpoint(State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
