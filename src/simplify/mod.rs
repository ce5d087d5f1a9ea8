//! Debt Simplification Algorithm
//!
//! Reduces a group's tangle of debts to a small set of suggested payments
//! by greedy largest-creditor/largest-debtor pairing. Group-wide, not
//! viewpoint-relative, and deliberately blind to settlements: it shows the
//! ideal settling plan for the expense history as recorded, independent of
//! side payments. Greedy pairing is not guaranteed to hit the theoretical
//! minimum transaction count in every topology, but it is deterministic
//! and emits at most `creditors + debtors - 1` edges.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::expense::Expense;
use crate::models::user::User;

/// Net positions within one cent of zero count as settled.
const DUST_CENTS: i64 = 1;

/// One suggested payment: `from` pays `to`
///
/// Produced, never persisted; recomputed from scratch on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtSimplification {
    /// Debtor user id
    pub from: String,

    /// Creditor user id
    pub to: String,

    /// Suggested payment (i64 cents)
    pub amount: i64,

    pub from_user: User,

    pub to_user: User,
}

/// Compute a near-minimal payment plan for the whole group
///
/// For every expense the payer is credited the full amount and each split
/// owner debited their share; the resulting net positions are then paired
/// off greedily, largest creditor against largest debtor. Ties are broken
/// by user id, so the plan is fully deterministic.
///
/// # Example
/// ```
/// use whoowes_core_rs::{simplify_debts, Expense, ExpenseSplit, User};
/// use chrono::Utc;
/// use std::collections::HashMap;
///
/// let now = Utc::now();
/// let alice = User::new("Alice", "alice@example.com", now);
/// let bob = User::new("Bob", "bob@example.com", now);
///
/// // Bob fronted $20.00 for Alice.
/// let expense = Expense::new(
///     "Tickets",
///     2000,
///     &bob.id,
///     vec![ExpenseSplit {
///         user_id: alice.id.clone(),
///         user: alice.clone(),
///         amount: 2000,
///         percentage: None,
///         paid: false,
///     }],
///     now,
/// )
/// .unwrap();
///
/// let users: HashMap<String, User> = [
///     (alice.id.clone(), alice.clone()),
///     (bob.id.clone(), bob.clone()),
/// ]
/// .into();
///
/// let plan = simplify_debts(&[expense], &users);
/// assert_eq!(plan.len(), 1);
/// assert_eq!(plan[0].from, alice.id);
/// assert_eq!(plan[0].to, bob.id);
/// assert_eq!(plan[0].amount, 2000);
/// ```
pub fn simplify_debts(
    expenses: &[Expense],
    user_map: &HashMap<String, User>,
) -> Vec<DebtSimplification> {
    // Net position per user over the entire expense set. BTreeMap keeps
    // iteration in id order regardless of insertion order.
    let mut net: BTreeMap<&str, i64> = BTreeMap::new();

    for expense in expenses {
        *net.entry(expense.paid_by()).or_insert(0) += expense.amount();
        for split in expense.splits() {
            *net.entry(split.user_id.as_str()).or_insert(0) -= split.amount;
        }
    }

    // Partition; debtors are stored as positive magnitudes.
    let mut creditors: Vec<(&str, i64)> = Vec::new();
    let mut debtors: Vec<(&str, i64)> = Vec::new();
    for (user_id, amount) in &net {
        if *amount > DUST_CENTS {
            creditors.push((*user_id, *amount));
        } else if *amount < -DUST_CENTS {
            debtors.push((*user_id, -*amount));
        }
    }

    // Largest first; ties by user id so equal magnitudes still order
    // deterministically.
    creditors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    debtors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let mut result = Vec::new();
    let mut ci = 0;
    let mut di = 0;

    while ci < creditors.len() && di < debtors.len() {
        let amount = creditors[ci].1.min(debtors[di].1);

        if amount >= DUST_CENTS {
            result.push(DebtSimplification {
                from: debtors[di].0.to_string(),
                to: creditors[ci].0.to_string(),
                amount,
                from_user: display_user(user_map, debtors[di].0),
                to_user: display_user(user_map, creditors[ci].0),
            });
        }

        creditors[ci].1 -= amount;
        debtors[di].1 -= amount;

        // Whoever hit zero carries nothing forward; the other side keeps
        // its remainder for the next pairing.
        if creditors[ci].1 < DUST_CENTS {
            ci += 1;
        }
        if debtors[di].1 < DUST_CENTS {
            di += 1;
        }
    }

    result
}

/// Filter a payment plan down to the edges touching one user
pub fn debts_for_user(debts: &[DebtSimplification], user_id: &str) -> Vec<DebtSimplification> {
    debts
        .iter()
        .filter(|d| d.from == user_id || d.to == user_id)
        .cloned()
        .collect()
}

fn display_user(user_map: &HashMap<String, User>, user_id: &str) -> User {
    user_map
        .get(user_id)
        .cloned()
        .unwrap_or_else(|| User::unknown(user_id))
}
