//! In-memory ledger store
//!
//! Stand-in for the real data layer. Owns the user roster, expense list,
//! and settlement history behind a narrow interface: reads hand out owned
//! snapshots so the pure engines never iterate a collection a concurrent
//! writer could be mutating, and every mutation goes through a named
//! command that enforces the entity's own rules.
//!
//! Timestamps are supplied by the caller on every mutating command, so the
//! store itself stays deterministic and replayable in tests.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::models::expense::{Expense, ExpenseError};
use crate::models::settlement::{Settlement, SettlementError};
use crate::models::user::User;

/// Errors surfaced by store commands
///
/// Entity-level conditions pass through unchanged so callers can show the
/// named reason verbatim.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("expense {0} not found")]
    ExpenseNotFound(String),

    #[error("settlement {0} not found")]
    SettlementNotFound(String),

    #[error(transparent)]
    Expense(#[from] ExpenseError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

/// Payload for initiating a settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSettlement {
    pub to_user_id: String,

    /// Amount claimed paid (i64 cents)
    pub amount: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The complete ledger: users, expenses, and settlements
///
/// # Example
/// ```
/// use whoowes_core_rs::{CreateSettlement, LedgerStore, User};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let alice = User::new("Alice", "alice@example.com", now);
/// let bob = User::new("Bob", "bob@example.com", now);
/// let (alice_id, bob_id) = (alice.id.clone(), bob.id.clone());
///
/// let mut store = LedgerStore::new(vec![alice, bob]);
/// let id = store
///     .create_settlement(
///         &alice_id,
///         CreateSettlement {
///             to_user_id: bob_id.clone(),
///             amount: 2500,
///             group_id: None,
///             note: None,
///         },
///         now,
///     )
///     .unwrap()
///     .id()
///     .to_string();
///
/// store.confirm_settlement(&id, &bob_id, now).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    users: Vec<User>,
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
}

impl LedgerStore {
    /// Create a store seeded with a user roster
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            expenses: Vec::new(),
            settlements: Vec::new(),
        }
    }

    // ── Users ──

    pub fn add_user(&mut self, user: User) {
        debug!("store: add user {}", user.id);
        self.users.push(user);
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Owned roster snapshot for the engines
    pub fn users_snapshot(&self) -> Vec<User> {
        self.users.clone()
    }

    /// Roster keyed by id, the shape the debt simplifier wants
    pub fn user_map(&self) -> HashMap<String, User> {
        self.users
            .iter()
            .map(|u| (u.id.clone(), u.clone()))
            .collect()
    }

    // ── Expenses ──

    /// Record a new expense; its payer must be on the roster
    pub fn add_expense(&mut self, expense: Expense) -> Result<&Expense, StoreError> {
        if self.user(expense.paid_by()).is_none() {
            return Err(StoreError::UserNotFound(expense.paid_by().to_string()));
        }
        debug!(
            "store: add expense {} ({} cents, paid by {})",
            expense.id(),
            expense.amount(),
            expense.paid_by()
        );
        let idx = self.expenses.len();
        self.expenses.push(expense);
        Ok(&self.expenses[idx])
    }

    pub fn expense(&self, id: &str) -> Result<&Expense, StoreError> {
        self.expenses
            .iter()
            .find(|e| e.id() == id)
            .ok_or_else(|| StoreError::ExpenseNotFound(id.to_string()))
    }

    /// Owned snapshot of every expense, for the engines
    pub fn expenses(&self) -> Vec<Expense> {
        self.expenses.clone()
    }

    /// Expenses involving one user, optionally filtered to a group,
    /// newest first
    pub fn expenses_for_user(&self, user_id: &str, group_id: Option<&str>) -> Vec<Expense> {
        let mut result: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.involves(user_id))
            .filter(|e| group_id.is_none() || e.group_id() == group_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        result
    }

    /// Flip one split's `paid` flag (explicit mark-paid action)
    pub fn mark_split_paid(
        &mut self,
        expense_id: &str,
        user_id: &str,
    ) -> Result<&Expense, StoreError> {
        let expense = self
            .expenses
            .iter_mut()
            .find(|e| e.id() == expense_id)
            .ok_or_else(|| StoreError::ExpenseNotFound(expense_id.to_string()))?;
        expense.mark_split_paid(user_id)?;
        debug!("store: split of {user_id} on expense {expense_id} marked paid");
        Ok(&*expense)
    }

    pub fn remove_expense(&mut self, expense_id: &str) -> Result<(), StoreError> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id() != expense_id);
        if self.expenses.len() == before {
            return Err(StoreError::ExpenseNotFound(expense_id.to_string()));
        }
        debug!("store: removed expense {expense_id}");
        Ok(())
    }

    // ── Settlements ──

    /// Initiate a settlement: `from_user_id` claims to have paid
    /// `payload.to_user_id`
    pub fn create_settlement(
        &mut self,
        from_user_id: &str,
        payload: CreateSettlement,
        at: DateTime<Utc>,
    ) -> Result<&Settlement, StoreError> {
        if self.user(from_user_id).is_none() {
            return Err(StoreError::UserNotFound(from_user_id.to_string()));
        }
        if self.user(&payload.to_user_id).is_none() {
            return Err(StoreError::UserNotFound(payload.to_user_id.clone()));
        }

        let mut settlement =
            Settlement::new(from_user_id, payload.to_user_id, payload.amount, at)?;
        if let Some(group_id) = payload.group_id {
            settlement = settlement.with_group(group_id);
        }
        if let Some(note) = payload.note {
            settlement = settlement.with_note(note);
        }

        debug!(
            "store: settlement {} initiated ({} cents, {} -> {})",
            settlement.id(),
            settlement.amount(),
            settlement.from_user_id(),
            settlement.to_user_id()
        );
        let idx = self.settlements.len();
        self.settlements.push(settlement);
        Ok(&self.settlements[idx])
    }

    pub fn settlement(&self, id: &str) -> Result<&Settlement, StoreError> {
        self.settlements
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| StoreError::SettlementNotFound(id.to_string()))
    }

    /// Owned snapshot of the full settlement history, for the engines
    pub fn settlements(&self) -> Vec<Settlement> {
        self.settlements.clone()
    }

    /// Settlements a user is party to, newest first
    pub fn settlements_for_user(&self, user_id: &str) -> Vec<Settlement> {
        let mut result: Vec<Settlement> = self
            .settlements
            .iter()
            .filter(|s| s.involves(user_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.initiated_at().cmp(&a.initiated_at()));
        result
    }

    /// Pending settlements awaiting this user's confirm/reject
    pub fn pending_settlements_for(&self, user_id: &str) -> Vec<Settlement> {
        self.settlements
            .iter()
            .filter(|s| s.to_user_id() == user_id && s.is_pending())
            .cloned()
            .collect()
    }

    /// Confirm a pending settlement (recipient only)
    pub fn confirm_settlement(
        &mut self,
        id: &str,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<&Settlement, StoreError> {
        let settlement = self
            .settlements
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| StoreError::SettlementNotFound(id.to_string()))?;
        settlement.confirm(actor, at)?;
        debug!("store: settlement {id} confirmed by {actor}");
        Ok(&*settlement)
    }

    /// Reject a pending settlement (recipient only); retained as history
    pub fn reject_settlement(
        &mut self,
        id: &str,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<&Settlement, StoreError> {
        let settlement = self
            .settlements
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| StoreError::SettlementNotFound(id.to_string()))?;
        settlement.reject(actor, at)?;
        debug!("store: settlement {id} rejected by {actor}");
        Ok(&*settlement)
    }

    /// Cancel a pending settlement (initiator only); the record is removed
    pub fn cancel_settlement(&mut self, id: &str, actor: &str) -> Result<(), StoreError> {
        let settlement = self
            .settlements
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| StoreError::SettlementNotFound(id.to_string()))?;
        settlement.authorize_cancel(actor)?;
        self.settlements.retain(|s| s.id() != id);
        debug!("store: settlement {id} cancelled by {actor}");
        Ok(())
    }
}
