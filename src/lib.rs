//! WhoOwes Ledger Core - Rust Engine
//!
//! Deterministic expense-sharing ledger: splits, balances, debt
//! simplification, and peer-confirmed settlements.
//!
//! # Architecture
//!
//! - **core**: Fixed-point money helpers
//! - **models**: Domain types (User, Expense, Settlement)
//! - **split**: Split calculation engine (equal, custom, percentage, item-based)
//! - **balance**: Per-counterparty balance aggregation
//! - **simplify**: Group-wide greedy debt simplification
//! - **store**: In-memory ledger store (stand-in for the real data layer)
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents); no cent is ever created or lost
//! 2. Every engine function is pure and deterministic: same inputs,
//!    byte-identical outputs, safe to recompute on every refresh
//! 3. Timestamps are always passed in by the caller, never read from a clock

// Module declarations
pub mod balance;
pub mod core;
pub mod models;
pub mod simplify;
pub mod split;
pub mod store;

// Re-exports for convenience
pub use balance::{compute_totals, compute_user_balances, BalanceTotals, UserBalance};
pub use models::{
    expense::{Expense, ExpenseCategory, ExpenseError, ExpenseItem, ExpenseSplit, SplitType},
    settlement::{Settlement, SettlementError, SettlementStatus},
    user::User,
};
pub use simplify::{debts_for_user, simplify_debts, DebtSimplification};
pub use split::{
    calculate_split, CustomAssignment, PercentageAssignment, SplitInput, SplitParticipant,
    SplitResult,
};
pub use store::{CreateSettlement, LedgerStore, StoreError};
