//! The four split policies
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::money::{distribute_evenly, format_cents, percentage_of};
use crate::models::expense::{ExpenseItem, ExpenseSplit};
use crate::models::user::User;

/// A participant in a draft expense: the id plus a display copy of the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitParticipant {
    pub user_id: String,
    pub user: User,
}

impl SplitParticipant {
    pub fn new(user: User) -> Self {
        Self {
            user_id: user.id.clone(),
            user,
        }
    }
}

/// A caller-proposed amount for the custom policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAssignment {
    pub user_id: String,
    pub user: User,
    /// Proposed share (i64 cents)
    pub amount: i64,
}

/// A caller-proposed percentage for the percentage policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentageAssignment {
    pub user_id: String,
    pub user: User,
    pub percentage: f64,
}

/// Split policy plus its policy-specific payload
///
/// An explicit sum type so adding a fifth policy is a compile-time-checked
/// exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplitInput {
    /// Divide the total evenly; remainder cents go to the last participant
    Equal {
        total: i64,
        participants: Vec<SplitParticipant>,
        paid_by: String,
    },

    /// Caller supplies every share; must sum to the total within one cent
    Custom {
        total: i64,
        assignments: Vec<CustomAssignment>,
        paid_by: String,
    },

    /// Caller supplies percentages; must sum to 100 within 0.01
    Percentage {
        total: i64,
        assignments: Vec<PercentageAssignment>,
        paid_by: String,
    },

    /// Divide each item among its assignees, then spread the tax/fee gap
    /// evenly across everyone
    ItemBased {
        total: i64,
        items: Vec<ExpenseItem>,
        participants: Vec<SplitParticipant>,
        paid_by: String,
    },
}

/// Outcome of a split calculation
///
/// Invalid input is a value, not an error: callers (expense forms) render
/// the reason inline and re-prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitResult {
    pub splits: Vec<ExpenseSplit>,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SplitResult {
    fn valid(splits: Vec<ExpenseSplit>) -> Self {
        Self {
            splits,
            is_valid: true,
            error: None,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            splits: Vec::new(),
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

/// Main split calculation entry point
///
/// Dispatches on the policy tag. Never panics and never returns `Err`;
/// see [`SplitResult`].
///
/// # Example
/// ```
/// use whoowes_core_rs::{calculate_split, SplitInput, SplitParticipant, User};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let alice = User::new("Alice", "alice@example.com", now);
/// let bob = User::new("Bob", "bob@example.com", now);
/// let paid_by = alice.id.clone();
///
/// let result = calculate_split(&SplitInput::Equal {
///     total: 10_000, // $100.00
///     participants: vec![
///         SplitParticipant::new(alice),
///         SplitParticipant::new(bob),
///     ],
///     paid_by,
/// });
///
/// assert!(result.is_valid);
/// assert_eq!(result.splits.iter().map(|s| s.amount).sum::<i64>(), 10_000);
/// ```
pub fn calculate_split(input: &SplitInput) -> SplitResult {
    match input {
        SplitInput::Equal {
            total,
            participants,
            paid_by,
        } => equal_split(*total, participants, paid_by),
        SplitInput::Custom {
            total,
            assignments,
            paid_by,
        } => custom_split(*total, assignments, paid_by),
        SplitInput::Percentage {
            total,
            assignments,
            paid_by,
        } => percentage_split(*total, assignments, paid_by),
        SplitInput::ItemBased {
            total,
            items,
            participants,
            paid_by,
        } => item_based_split(*total, items, participants, paid_by),
    }
}

fn make_split(
    user_id: &str,
    user: &User,
    amount: i64,
    percentage: Option<f64>,
    paid_by: &str,
) -> ExpenseSplit {
    ExpenseSplit {
        user_id: user_id.to_string(),
        user: user.clone(),
        amount,
        percentage,
        paid: user_id == paid_by,
    }
}

fn equal_split(total: i64, participants: &[SplitParticipant], paid_by: &str) -> SplitResult {
    if participants.is_empty() {
        return SplitResult::invalid("No participants selected");
    }

    let amounts = distribute_evenly(total, participants.len());
    let splits = participants
        .iter()
        .zip(amounts)
        .map(|(p, amount)| make_split(&p.user_id, &p.user, amount, None, paid_by))
        .collect();

    SplitResult::valid(splits)
}

fn custom_split(total: i64, assignments: &[CustomAssignment], paid_by: &str) -> SplitResult {
    if assignments.is_empty() {
        return SplitResult::invalid("No participants selected");
    }

    let sum: i64 = assignments.iter().map(|a| a.amount).sum();
    let diff = total - sum;
    if diff.abs() > 1 {
        return SplitResult::invalid(format!(
            "Custom amounts ({}) must equal total ({})",
            format_cents(sum),
            format_cents(total),
        ));
    }

    let mut splits: Vec<ExpenseSplit> = assignments
        .iter()
        .map(|a| make_split(&a.user_id, &a.user, a.amount, None, paid_by))
        .collect();

    // A one-cent gap is caller-side rounding noise; fold it into the last
    // share so the result still conserves exactly.
    if diff != 0 {
        if let Some(last) = splits.last_mut() {
            last.amount += diff;
        }
    }

    SplitResult::valid(splits)
}

fn percentage_split(
    total: i64,
    assignments: &[PercentageAssignment],
    paid_by: &str,
) -> SplitResult {
    if assignments.is_empty() {
        return SplitResult::invalid("No participants selected");
    }

    let total_pct: f64 = assignments.iter().map(|a| a.percentage).sum();
    // Tolerance is two decimal places: 100.004 snaps to 100.00 and passes,
    // 99.99 and 100.01 do not. Checked in basis points so float noise in
    // the sum cannot tip a boundary case either way.
    if (total_pct * 100.0).round() as i64 != 10_000 {
        return SplitResult::invalid(format!(
            "Percentages must sum to 100% (currently {total_pct:.1}%)"
        ));
    }

    let floored: Vec<i64> = assignments
        .iter()
        .map(|a| percentage_of(a.percentage, total))
        .collect();
    let remainder = total - floored.iter().sum::<i64>();

    let last = assignments.len() - 1;
    let splits = assignments
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let amount = floored[i] + if i == last { remainder } else { 0 };
            make_split(&a.user_id, &a.user, amount, Some(a.percentage), paid_by)
        })
        .collect();

    SplitResult::valid(splits)
}

fn item_based_split(
    total: i64,
    items: &[ExpenseItem],
    participants: &[SplitParticipant],
    paid_by: &str,
) -> SplitResult {
    if participants.is_empty() {
        return SplitResult::invalid("No participants selected");
    }

    let index: HashMap<&str, usize> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| (p.user_id.as_str(), i))
        .collect();
    let mut owed = vec![0i64; participants.len()];

    let mut assigned_total = 0i64;
    for item in items {
        let subtotal = item.subtotal();
        assigned_total += subtotal;

        // An item with no (known) assignees belongs to everyone.
        let targets: Vec<usize> = {
            let assigned: Vec<usize> = item
                .assigned_to
                .iter()
                .filter_map(|id| index.get(id.as_str()).copied())
                .collect();
            if assigned.is_empty() {
                (0..participants.len()).collect()
            } else {
                assigned
            }
        };

        for (target, share) in targets.iter().zip(distribute_evenly(subtotal, targets.len())) {
            owed[*target] += share;
        }
    }

    // Whatever the items don't account for (tax, tip, fees, discounts) is
    // everyone's problem equally.
    let gap = total - assigned_total;
    if gap != 0 {
        for (i, share) in distribute_evenly(gap, participants.len())
            .into_iter()
            .enumerate()
        {
            owed[i] += share;
        }
    }

    let splits = participants
        .iter()
        .zip(owed)
        .map(|(p, amount)| make_split(&p.user_id, &p.user, amount, None, paid_by))
        .collect();

    SplitResult::valid(splits)
}
