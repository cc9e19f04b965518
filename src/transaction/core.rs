//! Defines the core data model and database queries for transactions.
//!
//! Every mutation here carries a compensating write against the owning
//! month's budget document so the derived spend totals track the transaction
//! table. Callers must hold the connection lock for the whole call; the
//! transaction write and the budget write are separate statements.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    budget::{CategoryBudget, apply_delta, deduct_spend, reassign_spend},
    month::derive_month,
};

// ============================================================================
// MODELS
// ============================================================================

/// A single spending record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: i64,
    /// The amount of money spent. Signed; the system does not enforce a
    /// non-negative value.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened, as `YYYY-MM-DD`.
    pub date: String,
    /// The free-form category label the spend is budgeted under.
    pub category: String,
    /// The month bucket the transaction belongs to: always the `YYYY-MM`
    /// prefix of `date`.
    pub month: String,
}

/// The fields needed to create a [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money spent.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened, as `YYYY-MM-DD`.
    pub date: String,
    /// The category the spend is budgeted under.
    pub category: String,
}

/// A partial update to a [Transaction]. `None` fields keep their stored
/// values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    /// A new amount, if the caller supplied one.
    pub amount: Option<f64>,
    /// A new description, if the caller supplied one.
    pub description: Option<String>,
    /// A new date, if the caller supplied one.
    pub date: Option<String>,
    /// A new category, if the caller supplied one.
    pub category: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction and credit its amount to the owning month's
/// budget, creating the month document and category entry as needed.
///
/// Returns the created transaction along with the resulting budget entry for
/// its category.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidDate] if the date does not parse as `YYYY-MM-DD`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new: NewTransaction,
    connection: &Connection,
) -> Result<(Transaction, CategoryBudget), Error> {
    let month = derive_month(&new.date)?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, description, date, category, month)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, description, date, category, month",
        )?
        .query_row(
            (
                new.amount,
                &new.description,
                &new.date,
                &new.category,
                &month,
            ),
            map_transaction_row,
        )?;

    let budget = apply_delta(&month, &new.category, new.amount, connection)?;
    let entry = budget
        .budgets
        .get(&new.category)
        .copied()
        .unwrap_or_default();

    Ok((transaction, entry))
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a stored
///   transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: i64, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, amount, description, date, category, month
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Apply a partial update to a transaction and reconcile the owning month's
/// budget when the amount or category changed.
///
/// The reconciliation runs against the *original* transaction's month: the
/// old amount is debited from the old category and the new amount credited
/// to the new one. When the update changes `date`, the stored month is
/// re-derived so `month == date[0..7]` keeps holding, but spend is not moved
/// to the new month here; the reconciliation reads heal both months on their
/// next pass.
///
/// Returns the full transaction list, sorted by date descending.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a stored
///   transaction,
/// - [Error::InvalidDate] if an updated date does not parse as `YYYY-MM-DD`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: i64,
    changes: TransactionUpdate,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let original = get_transaction(id, connection)?;

    let amount = changes.amount.unwrap_or(original.amount);
    let description = changes
        .description
        .unwrap_or_else(|| original.description.clone());
    let category = changes
        .category
        .unwrap_or_else(|| original.category.clone());
    let (date, month) = match changes.date {
        Some(date) => {
            let month = derive_month(&date)?;
            (date, month)
        }
        None => (original.date.clone(), original.month.clone()),
    };

    connection.execute(
        "UPDATE \"transaction\"
         SET amount = ?1, description = ?2, date = ?3, category = ?4, month = ?5
         WHERE id = ?6",
        (amount, &description, &date, &category, &month, id),
    )?;

    if amount != original.amount || category != original.category {
        reassign_spend(
            &original.month,
            &original.category,
            original.amount,
            &category,
            amount,
            connection,
        )?;
    }

    list_transactions(connection)
}

/// Delete a transaction, first debiting its amount from the owning month's
/// budget (a no-op when that budget or category entry no longer exists).
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a stored
///   transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: i64, connection: &Connection) -> Result<(), Error> {
    let transaction = get_transaction(id, connection)?;

    deduct_spend(
        &transaction.month,
        &transaction.category,
        transaction.amount,
        connection,
    )?;

    connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    Ok(())
}

/// List all transactions, sorted by date descending.
///
/// `YYYY-MM-DD` strings compare lexicographically in chronological order, so
/// the sort happens in SQL.
pub fn list_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let mut statement = connection.prepare(
        "SELECT id, amount, description, date, category, month
         FROM \"transaction\"
         ORDER BY date DESC, id DESC",
    )?;
    let transactions = statement
        .query_map((), map_transaction_row)?
        .collect::<Result<_, _>>()?;

    Ok(transactions)
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        category: row.get(4)?,
        month: row.get(5)?,
    })
}
