//! Per-counterparty balance aggregation
//!
//! The walk is: every unpaid split touching the viewpoint user moves that
//! counterparty's running net; then every *confirmed* settlement moves it
//! back. Pending and rejected settlements have zero effect — only a
//! confirmed transfer is real money moved.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::expense::Expense;
use crate::models::settlement::Settlement;
use crate::models::user::User;

/// Net position between the viewpoint user and one counterparty
///
/// `net_balance = owed - owes`; positive means the counterparty owes the
/// viewpoint user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBalance {
    pub user_id: String,

    /// Denormalized display copy of the counterparty
    pub user: User,

    /// What the viewpoint user owes this counterparty (i64 cents, >= 0)
    pub owes: i64,

    /// What this counterparty owes the viewpoint user (i64 cents, >= 0)
    pub owed: i64,

    pub net_balance: i64,
}

/// Column sums over a set of balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTotals {
    pub total_owed: i64,
    pub total_owes: i64,
    pub net_balance: i64,
}

/// Compute the viewpoint user's balance against every counterparty
///
/// # Arguments
/// * `expenses` - Snapshot of all expenses involving the viewpoint user
/// * `settlements` - Snapshot of settlement history (all statuses)
/// * `viewpoint_user_id` - Whose dashboard this is
/// * `all_users` - Roster for display copies; unknown ids get a placeholder
///
/// Counterparties whose net is exactly zero are dropped (fully settled).
/// Output is ordered by counterparty id, so recomputation is idempotent
/// down to the byte.
///
/// # Example
/// ```
/// use whoowes_core_rs::{compute_user_balances, Expense, ExpenseSplit, User};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let alice = User::new("Alice", "alice@example.com", now);
/// let bob = User::new("Bob", "bob@example.com", now);
///
/// // Bob paid $10.00; Alice owes all of it.
/// let expense = Expense::new(
///     "Taxi",
///     1000,
///     &bob.id,
///     vec![ExpenseSplit {
///         user_id: alice.id.clone(),
///         user: alice.clone(),
///         amount: 1000,
///         percentage: None,
///         paid: false,
///     }],
///     now,
/// )
/// .unwrap();
///
/// let balances = compute_user_balances(
///     &[expense],
///     &[],
///     &bob.id,
///     &[alice.clone(), bob.clone()],
/// );
/// assert_eq!(balances.len(), 1);
/// assert_eq!(balances[0].user_id, alice.id);
/// assert_eq!(balances[0].net_balance, 1000);
/// ```
pub fn compute_user_balances(
    expenses: &[Expense],
    settlements: &[Settlement],
    viewpoint_user_id: &str,
    all_users: &[User],
) -> Vec<UserBalance> {
    let roster: HashMap<&str, &User> = all_users.iter().map(|u| (u.id.as_str(), u)).collect();

    // Running net per counterparty. BTreeMap so output order is a function
    // of the data, not of hash seeds.
    let mut net: BTreeMap<&str, i64> = BTreeMap::new();

    for expense in expenses {
        let paid_by = expense.paid_by();
        for split in expense.splits() {
            if split.paid {
                continue; // already settled, contributes nothing further
            }
            let owed_by = split.user_id.as_str();

            if paid_by == viewpoint_user_id && owed_by != viewpoint_user_id {
                // They owe me their share.
                *net.entry(owed_by).or_insert(0) += split.amount;
            } else if owed_by == viewpoint_user_id && paid_by != viewpoint_user_id {
                // I owe them my share.
                *net.entry(paid_by).or_insert(0) -= split.amount;
            }
            // Splits between two other people don't touch this viewpoint.
        }
    }

    for settlement in settlements {
        if !settlement.is_confirmed() {
            continue;
        }
        if settlement.from_user_id() == viewpoint_user_id {
            // I paid them back: my debt to them shrinks.
            *net.entry(settlement.to_user_id()).or_insert(0) += settlement.amount();
        } else if settlement.to_user_id() == viewpoint_user_id {
            // They paid me back: their debt to me shrinks.
            *net.entry(settlement.from_user_id()).or_insert(0) -= settlement.amount();
        }
    }

    net.into_iter()
        .filter(|(_, n)| *n != 0)
        .map(|(user_id, n)| UserBalance {
            user: roster
                .get(user_id)
                .map(|u| (*u).clone())
                .unwrap_or_else(|| User::unknown(user_id)),
            user_id: user_id.to_string(),
            owes: (-n).max(0),
            owed: n.max(0),
            net_balance: n,
        })
        .collect()
}

/// Sum the `owed` and `owes` columns across all counterparties
pub fn compute_totals(balances: &[UserBalance]) -> BalanceTotals {
    let total_owed: i64 = balances.iter().map(|b| b.owed).sum();
    let total_owes: i64 = balances.iter().map(|b| b.owes).sum();
    BalanceTotals {
        total_owed,
        total_owes,
        net_balance: total_owed - total_owes,
    }
}
