//! Defines the endpoint for setting a month's budget limits.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, budget::set_limits, response::ApiResponse};

/// The state needed to set budget limits.
#[derive(Debug, Clone)]
pub struct SetBudgetLimitsState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SetBudgetLimitsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for setting budget limits.
///
/// Both fields are optional so their absence surfaces as the envelope's
/// validation failure rather than a body-deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SetBudgetLimitsForm {
    /// The month bucket to set limits for, in `YYYY-MM` form.
    pub month: Option<String>,
    /// The limit to set per category. Categories not mentioned are left
    /// untouched.
    pub budgets: Option<BTreeMap<String, f64>>,
}

/// A route handler for setting the limits of a month's budget.
///
/// Spend totals are never altered by this endpoint; calling it twice with the
/// same limits yields the same state.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn set_budget_limits_endpoint(
    State(state): State<SetBudgetLimitsState>,
    Json(form): Json<SetBudgetLimitsForm>,
) -> impl IntoResponse {
    let Some(month) = form.month else {
        return Error::MissingField("month").into_response();
    };
    let Some(limits) = form.budgets else {
        return Error::MissingField("budgets").into_response();
    };

    let connection = state.db_connection.lock().unwrap();

    match set_limits(&month, &limits, &connection) {
        Ok(budget) => Json(ApiResponse::ok("Budget limits updated successfully", budget))
            .into_response(),
        Err(error @ Error::NegativeLimit { .. }) => error.into_response(),
        Err(error) => {
            tracing::error!("could not set budget limits for {month}: {error}");
            error.into_response()
        }
    }
}
