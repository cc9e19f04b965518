//! The API endpoint URIs.

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{id}";
/// The route to set budget limits.
pub const BUDGETS: &str = "/api/budgets";
/// The route to fetch (and reconcile) a month's budget.
pub const BUDGET: &str = "/api/budgets/{month}";
