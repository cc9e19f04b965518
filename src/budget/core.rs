//! Defines the budget document model and the aggregation queries that keep
//! each month's `spent` totals in step with the transaction table.
//!
//! A budget is stored as one row per month whose category map lives in a JSON
//! TEXT column, so the set of categories is open-ended. `spent` is derived
//! state: the incremental paths ([apply_delta], [reassign_spend],
//! [deduct_spend]) adjust it as transactions change, and the reconciliation
//! paths ([reconcile_budget], [resync_all]) recompute it from scratch to heal
//! any drift.

use std::collections::BTreeMap;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The limit and running spend for one category in one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    /// The caller-set spending limit. Defaults to zero for categories that
    /// were discovered from transactions rather than set explicitly.
    pub limit: f64,
    /// The derived sum of transaction amounts for this (month, category).
    ///
    /// May go negative: an over-correction is left visible as drift for the
    /// reconciliation paths to eliminate rather than being floored away.
    pub spent: f64,
}

/// A month's budget document: a mapping from category name to limit and spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The month bucket this document covers, in `YYYY-MM` form.
    pub month: String,
    /// Per-category limits and spend. A `BTreeMap` keeps the JSON output in
    /// a stable order.
    pub budgets: BTreeMap<String, CategoryBudget>,
}

impl Budget {
    /// Create an empty budget document for `month`.
    pub fn new(month: &str) -> Self {
        Self {
            month: month.to_owned(),
            budgets: BTreeMap::new(),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Load the budget document for `month`, if one exists.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetSerialization] if the stored JSON column is corrupt,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn load_budget(month: &str, connection: &Connection) -> Result<Option<Budget>, Error> {
    let column: Option<String> = connection
        .query_row("SELECT budgets FROM budget WHERE month = ?1", [month], |row| {
            row.get(0)
        })
        .optional()?;

    match column {
        Some(json) => Ok(Some(Budget {
            month: month.to_owned(),
            budgets: serde_json::from_str(&json)?,
        })),
        None => Ok(None),
    }
}

/// Insert or overwrite the budget document for `budget.month`.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetSerialization] if the category map cannot be serialized,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn save_budget(budget: &Budget, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO budget (month, budgets) VALUES (?1, ?2)
         ON CONFLICT (month) DO UPDATE SET budgets = excluded.budgets",
        (&budget.month, serde_json::to_string(&budget.budgets)?),
    )?;

    Ok(())
}

/// Add `delta` to the spend recorded against (`month`, `category`).
///
/// Creates the month document and/or the category entry (with a zero limit)
/// if they do not exist yet. Negative deltas are applied as-is, even when
/// they drive `spent` below zero.
///
/// Callers must hold the connection lock for their whole read-modify-write;
/// the load, mutation, and save here are three separate steps with no
/// compare-and-swap guard.
pub fn apply_delta(
    month: &str,
    category: &str,
    delta: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    let mut budget = load_budget(month, connection)?.unwrap_or_else(|| Budget::new(month));

    budget.budgets.entry(category.to_owned()).or_default().spent += delta;
    save_budget(&budget, connection)?;

    Ok(budget)
}

/// Move a transaction's contribution from (`old_category`, `old_amount`) to
/// (`new_category`, `new_amount`) within `month`'s budget.
///
/// Used when a transaction edit changes its amount or category. Follows the
/// original month of the transaction: a no-op when that month has no budget
/// document. The old category is only debited if it still has an entry; the
/// new category entry is created if needed.
pub fn reassign_spend(
    month: &str,
    old_category: &str,
    old_amount: f64,
    new_category: &str,
    new_amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(mut budget) = load_budget(month, connection)? else {
        return Ok(());
    };

    if let Some(entry) = budget.budgets.get_mut(old_category) {
        entry.spent -= old_amount;
    }
    budget
        .budgets
        .entry(new_category.to_owned())
        .or_default()
        .spent += new_amount;

    save_budget(&budget, connection)
}

/// Subtract a deleted transaction's `amount` from its (`month`, `category`)
/// spend. A no-op when the budget document or category entry no longer
/// exists.
pub fn deduct_spend(
    month: &str,
    category: &str,
    amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(mut budget) = load_budget(month, connection)? else {
        return Ok(());
    };
    let Some(entry) = budget.budgets.get_mut(category) else {
        return Ok(());
    };

    entry.spent -= amount;

    save_budget(&budget, connection)
}

/// Overwrite the limits for the supplied categories in `month`'s budget.
///
/// Existing categories keep their `spent`; categories not yet in the document
/// are inserted with `spent = 0`. Categories not mentioned in `limits` are
/// left untouched, so the call is idempotent.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeLimit] if any supplied limit is below zero (checked
///   before any write),
/// - or [Error::SqlError] if there is an SQL error.
pub fn set_limits(
    month: &str,
    limits: &BTreeMap<String, f64>,
    connection: &Connection,
) -> Result<Budget, Error> {
    if let Some((category, limit)) = limits.iter().find(|(_, limit)| **limit < 0.0) {
        return Err(Error::NegativeLimit {
            category: category.clone(),
            limit: *limit,
        });
    }

    let mut budget = load_budget(month, connection)?.unwrap_or_else(|| Budget::new(month));

    for (category, limit) in limits {
        budget.budgets.entry(category.clone()).or_default().limit = *limit;
    }

    save_budget(&budget, connection)?;

    Ok(budget)
}

/// Recompute every `spent` total for `month` from the transaction table,
/// persist the result, and return it.
///
/// Covers every category that has a budget entry or at least one transaction
/// this month: budget-only categories are reset to zero spend, transaction-
/// only categories are inserted with a zero limit. An unseen month yields
/// (and persists) an empty document, the zero-valued default shape.
///
/// This is the self-healing read path: any drift the incremental updates
/// accumulated is gone after this call, at the cost of the read being
/// O(transactions in month) and writing state.
pub fn reconcile_budget(month: &str, connection: &Connection) -> Result<Budget, Error> {
    let mut statement = connection.prepare(
        "SELECT category, SUM(amount) FROM \"transaction\"
         WHERE month = ?1
         GROUP BY category",
    )?;
    let spent_by_category: Vec<(String, f64)> = statement
        .query_map([month], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<_, _>>()?;

    let mut budget = load_budget(month, connection)?.unwrap_or_else(|| Budget::new(month));

    for entry in budget.budgets.values_mut() {
        entry.spent = 0.0;
    }
    for (category, spent) in spent_by_category {
        budget.budgets.entry(category).or_default().spent = spent;
    }

    save_budget(&budget, connection)?;

    Ok(budget)
}

/// Recompute spend totals for every month that has transactions.
///
/// One aggregate scan buckets all transactions by (month, category); each
/// affected month's document is then rewritten, creating documents and
/// category entries as needed. Categories with no transactions in the scan
/// keep their prior `spent` and stay stale until [reconcile_budget] touches
/// their month. That narrower overwrite is deliberate: this path backs the
/// transaction listing, which should not zero out months it has no data for.
pub fn resync_all(connection: &Connection) -> Result<(), Error> {
    let mut statement = connection.prepare(
        "SELECT month, category, SUM(amount) FROM \"transaction\"
         GROUP BY month, category",
    )?;
    let rows: Vec<(String, String, f64)> = statement
        .query_map((), |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<_, _>>()?;

    let mut by_month: BTreeMap<String, Vec<(String, f64)>> = BTreeMap::new();
    for (month, category, spent) in rows {
        by_month.entry(month).or_default().push((category, spent));
    }

    for (month, categories) in by_month {
        let mut budget = load_budget(&month, connection)?.unwrap_or_else(|| Budget::new(&month));

        for (category, spent) in categories {
            budget.budgets.entry(category).or_default().spent = spent;
        }

        save_budget(&budget, connection)?;
    }

    Ok(())
}
