//! Ledgerly is a personal-finance tracking backend.
//!
//! It records spending transactions, aggregates them into monthly
//! per-category budgets, and serves a JSON REST API for both. Each budget
//! stores a caller-set `limit` and a derived `spent` total per category;
//! every transaction mutation applies a compensating update to its month's
//! budget, and the read paths recompute `spent` from the transactions
//! themselves to heal any drift.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod budget;
mod db;
mod endpoints;
mod error;
mod month;
mod response;
mod routing;
mod state;
mod transaction;

pub use budget::{Budget, CategoryBudget};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use response::ApiResponse;
pub use routing::build_router;
pub use state::AppState;
pub use transaction::Transaction;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
