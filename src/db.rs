//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

/// Create the database tables if they do not exist.
///
/// The `budget` table stores one document per month: the category map is a
/// JSON TEXT column so categories can be added at runtime without schema
/// changes.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            month TEXT NOT NULL
        )",
        (),
    )?;

    transaction.execute(
        "CREATE INDEX IF NOT EXISTS transaction_month_idx ON \"transaction\" (month)",
        (),
    )?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            month TEXT PRIMARY KEY,
            budgets TEXT NOT NULL
        )",
        (),
    )?;

    transaction.commit()
}
