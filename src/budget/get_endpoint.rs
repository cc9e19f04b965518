//! Defines the endpoint for fetching a month's budget.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{AppState, budget::reconcile_budget, response::ApiResponse};

/// The state needed to fetch a budget.
#[derive(Debug, Clone)]
pub struct GetBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for fetching the budget for `month`.
///
/// The read is self-healing: every category's `spent` is recomputed from the
/// month's transactions and persisted before the document is returned. An
/// unseen month yields an empty document.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_budget_endpoint(
    State(state): State<GetBudgetState>,
    Path(month): Path<String>,
) -> impl IntoResponse {
    let connection = state.db_connection.lock().unwrap();

    match reconcile_budget(&month, &connection) {
        Ok(budget) => {
            Json(ApiResponse::ok("Budget fetched successfully", budget)).into_response()
        }
        Err(error) => {
            tracing::error!("could not fetch budget for {month}: {error}");
            error.into_response()
        }
    }
}
