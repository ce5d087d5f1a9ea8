//! Tests for the balance aggregation engine
//!
//! CRITICAL: All money values are i64 (cents)

use chrono::Utc;
use whoowes_core_rs::{
    compute_totals, compute_user_balances, Expense, ExpenseSplit, Settlement, User,
};

fn user(id: &str) -> User {
    let mut user = User::new(id.to_uppercase(), format!("{id}@example.com"), Utc::now());
    user.id = id.to_string();
    user
}

fn split(owner: &User, amount: i64, paid: bool) -> ExpenseSplit {
    ExpenseSplit {
        user_id: owner.id.clone(),
        user: owner.clone(),
        amount,
        percentage: None,
        paid,
    }
}

/// B paid `amount`; A owes all of it (unpaid split).
fn one_sided_expense(payer: &User, debtor: &User, amount: i64) -> Expense {
    Expense::new(
        "Expense",
        amount,
        &payer.id,
        vec![split(debtor, amount, false)],
        Utc::now(),
    )
    .unwrap()
}

#[test]
fn test_unpaid_split_shows_up_as_counterparty_debt() {
    let (a, b) = (user("alice"), user("bob"));
    let expenses = vec![one_sided_expense(&b, &a, 1000)];
    let users = vec![a.clone(), b.clone()];

    // From B's viewpoint, A owes $10.00.
    let balances = compute_user_balances(&expenses, &[], &b.id, &users);
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].user_id, a.id);
    assert_eq!(balances[0].net_balance, 1000);
    assert_eq!(balances[0].owed, 1000);
    assert_eq!(balances[0].owes, 0);

    // From A's viewpoint, the mirror: they owe B $10.00.
    let balances = compute_user_balances(&expenses, &[], &a.id, &users);
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].user_id, b.id);
    assert_eq!(balances[0].net_balance, -1000);
    assert_eq!(balances[0].owes, 1000);
}

#[test]
fn test_confirmed_settlement_clears_the_debt() {
    let now = Utc::now();
    let (a, b) = (user("alice"), user("bob"));
    let expenses = vec![one_sided_expense(&b, &a, 1000)];
    let users = vec![a.clone(), b.clone()];

    let mut settlement = Settlement::new(&a.id, &b.id, 1000, now).unwrap();
    settlement.confirm(&b.id, now).unwrap();

    // Fully settled counterparties are dropped from the output entirely.
    let balances = compute_user_balances(&expenses, &[settlement], &b.id, &users);
    assert!(balances.is_empty());
}

#[test]
fn test_pending_and_rejected_settlements_have_no_effect() {
    let now = Utc::now();
    let (a, b) = (user("alice"), user("bob"));
    let expenses = vec![one_sided_expense(&b, &a, 1000)];
    let users = vec![a.clone(), b.clone()];

    let pending = Settlement::new(&a.id, &b.id, 1000, now).unwrap();
    let mut rejected = Settlement::new(&a.id, &b.id, 1000, now).unwrap();
    rejected.reject(&b.id, now).unwrap();

    let balances = compute_user_balances(&expenses, &[pending, rejected], &b.id, &users);
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].net_balance, 1000); // unchanged at $10.00
}

#[test]
fn test_paid_splits_contribute_nothing() {
    let (a, b) = (user("alice"), user("bob"));
    let expense = Expense::new(
        "Dinner",
        3000,
        &b.id,
        vec![split(&b, 1500, true), split(&a, 1500, true)], // A already marked paid
        Utc::now(),
    )
    .unwrap();

    let balances = compute_user_balances(&[expense], &[], &b.id, &[a, b.clone()]);
    assert!(balances.is_empty());
}

#[test]
fn test_payers_own_split_never_counts_against_themselves() {
    let (a, b) = (user("alice"), user("bob"));
    let expense = Expense::new(
        "Dinner",
        3000,
        &b.id,
        vec![split(&b, 1500, false), split(&a, 1500, false)],
        Utc::now(),
    )
    .unwrap();

    // B's own (unpaid) split is skipped; only A's share counts.
    let balances = compute_user_balances(&[expense], &[], &b.id, &[a.clone(), b.clone()]);
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].user_id, a.id);
    assert_eq!(balances[0].net_balance, 1500);
}

#[test]
fn test_third_party_splits_are_ignored() {
    let (a, b, c) = (user("alice"), user("bob"), user("carol"));
    // B paid for A and C; from A's viewpoint only their own share matters.
    let expense = Expense::new(
        "Taxi",
        2000,
        &b.id,
        vec![split(&a, 900, false), split(&c, 1100, false)],
        Utc::now(),
    )
    .unwrap();

    let balances = compute_user_balances(
        &[expense],
        &[],
        &a.id,
        &[a.clone(), b.clone(), c.clone()],
    );
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].user_id, b.id);
    assert_eq!(balances[0].net_balance, -900);
}

#[test]
fn test_idempotent_recomputation() {
    let now = Utc::now();
    let (a, b, c) = (user("alice"), user("bob"), user("carol"));
    let expenses = vec![
        one_sided_expense(&b, &a, 1234),
        one_sided_expense(&a, &c, 555),
        one_sided_expense(&c, &b, 901),
    ];
    let mut settlement = Settlement::new(&a.id, &b.id, 234, now).unwrap();
    settlement.confirm(&b.id, now).unwrap();
    let settlements = vec![settlement];
    let users = vec![a.clone(), b.clone(), c.clone()];

    let first = compute_user_balances(&expenses, &settlements, &a.id, &users);
    let second = compute_user_balances(&expenses, &settlements, &a.id, &users);
    assert_eq!(first, second); // same ordering, same values
}

#[test]
fn test_balances_aggregate_across_expenses_and_settlements() {
    let now = Utc::now();
    let (a, b) = (user("alice"), user("bob"));
    // A owes B 1000 + 500, then pays back 700 (confirmed).
    let expenses = vec![
        one_sided_expense(&b, &a, 1000),
        one_sided_expense(&b, &a, 500),
    ];
    let mut payback = Settlement::new(&a.id, &b.id, 700, now).unwrap();
    payback.confirm(&b.id, now).unwrap();

    let balances =
        compute_user_balances(&expenses, &[payback], &a.id, &[a.clone(), b.clone()]);
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].net_balance, -800);

    let totals = compute_totals(&balances);
    assert_eq!(totals.total_owes, 800);
    assert_eq!(totals.total_owed, 0);
    assert_eq!(totals.net_balance, -800);
}

#[test]
fn test_unknown_counterparty_gets_a_placeholder() {
    let (a, b) = (user("alice"), user("bob"));
    let expenses = vec![one_sided_expense(&b, &a, 1000)];

    // Roster is missing A entirely.
    let balances = compute_user_balances(&expenses, &[], &b.id, &[b.clone()]);
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].user_id, a.id);
    assert_eq!(balances[0].user.name, "Unknown");
}

#[test]
fn test_totals_of_mixed_balances() {
    let (a, b, c) = (user("alice"), user("bob"), user("carol"));
    let expenses = vec![
        one_sided_expense(&a, &b, 2000), // B owes A $20.00
        one_sided_expense(&c, &a, 450),  // A owes C $4.50
    ];
    let users = vec![a.clone(), b.clone(), c.clone()];

    let balances = compute_user_balances(&expenses, &[], &a.id, &users);
    let totals = compute_totals(&balances);
    assert_eq!(totals.total_owed, 2000);
    assert_eq!(totals.total_owes, 450);
    assert_eq!(totals.net_balance, 1550);
}
