//! Balance Aggregation Engine
//!
//! Derives net balances between one viewpoint user and every counterparty
//! from expense and settlement history. Pure and permutation-invariant:
//! feeding it the same snapshots in any order yields the same output, so
//! the surrounding cache layer recomputes it on every invalidation.

mod aggregator;

// Re-export public API
pub use aggregator::{compute_totals, compute_user_balances, BalanceTotals, UserBalance};
