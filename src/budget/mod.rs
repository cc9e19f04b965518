//! The budget aggregator: monthly per-category limits and derived spend
//! totals, plus the endpoints for setting limits and fetching a month.

mod core;
mod get_endpoint;
mod set_limits_endpoint;

pub use self::core::{
    Budget, CategoryBudget, apply_delta, deduct_spend, load_budget, reassign_spend,
    reconcile_budget, resync_all, save_budget, set_limits,
};
pub use get_endpoint::get_budget_endpoint;
pub use set_limits_endpoint::set_budget_limits_endpoint;
