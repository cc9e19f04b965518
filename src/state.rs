//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

/// The state of the REST server.
///
/// Endpoints take the slice of state they need via `FromRef` sub-states
/// defined next to each handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection shared by all endpoints.
    ///
    /// Handlers hold this lock for their entire read-modify-write so that
    /// budget updates touching the same month cannot interleave and lose a
    /// delta.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] wrapping `db_connection`.
    pub fn new(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self { db_connection }
    }
}
