//! Domain models for the expense ledger

pub mod expense;
pub mod settlement;
pub mod user;

// Re-exports
pub use expense::{Expense, ExpenseCategory, ExpenseError, ExpenseItem, ExpenseSplit, SplitType};
pub use settlement::{Settlement, SettlementError, SettlementStatus};
pub use user::User;
