//! Tests for the split calculation engine
//!
//! CRITICAL: All money values are i64 (cents)

use chrono::Utc;
use whoowes_core_rs::{
    calculate_split, CustomAssignment, ExpenseItem, PercentageAssignment, SplitInput,
    SplitParticipant, User,
};

fn participants(n: usize) -> Vec<SplitParticipant> {
    (0..n)
        .map(|i| {
            let mut user = User::new(format!("User {i}"), format!("u{i}@example.com"), Utc::now());
            user.id = format!("user-{i}");
            SplitParticipant::new(user)
        })
        .collect()
}

fn custom(ps: &[SplitParticipant], amounts: &[i64]) -> Vec<CustomAssignment> {
    ps.iter()
        .zip(amounts)
        .map(|(p, amount)| CustomAssignment {
            user_id: p.user_id.clone(),
            user: p.user.clone(),
            amount: *amount,
        })
        .collect()
}

fn percentages(ps: &[SplitParticipant], pcts: &[f64]) -> Vec<PercentageAssignment> {
    ps.iter()
        .zip(pcts)
        .map(|(p, pct)| PercentageAssignment {
            user_id: p.user_id.clone(),
            user: p.user.clone(),
            percentage: *pct,
        })
        .collect()
}

// ==========================================
// Equal split
// ==========================================

#[test]
fn test_equal_split_conserves_and_is_fair() {
    let result = calculate_split(&SplitInput::Equal {
        total: 10_000, // $100.00 across 3
        participants: participants(3),
        paid_by: "user-0".to_string(),
    });

    assert!(result.is_valid);
    let amounts: Vec<i64> = result.splits.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![3333, 3333, 3334]);
    assert_eq!(amounts.iter().sum::<i64>(), 10_000);
    // No two shares differ by more than one cent.
    assert_eq!(amounts.iter().max().unwrap() - amounts.iter().min().unwrap(), 1);
}

#[test]
fn test_equal_split_remainder_goes_to_last_in_supplied_order() {
    // The whole remainder lands on the last participant the caller
    // supplied. This is a behavioral contract, not an accident: it is
    // what makes recomputed splits reproduce byte-for-byte.
    let result = calculate_split(&SplitInput::Equal {
        total: 11,
        participants: participants(3),
        paid_by: "user-0".to_string(),
    });

    assert!(result.is_valid);
    let amounts: Vec<i64> = result.splits.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![3, 3, 5]);
}

#[test]
fn test_equal_split_single_participant_takes_it_all() {
    let result = calculate_split(&SplitInput::Equal {
        total: 9999,
        participants: participants(1),
        paid_by: "user-0".to_string(),
    });
    assert!(result.is_valid);
    assert_eq!(result.splits[0].amount, 9999);
    assert!(result.splits[0].paid); // payer's own share
}

#[test]
fn test_equal_split_rejects_empty_roster() {
    let result = calculate_split(&SplitInput::Equal {
        total: 1000,
        participants: vec![],
        paid_by: "user-0".to_string(),
    });
    assert!(!result.is_valid);
    assert!(result.splits.is_empty());
    assert_eq!(result.error.as_deref(), Some("No participants selected"));
}

#[test]
fn test_payer_flag_set_only_on_payer() {
    let result = calculate_split(&SplitInput::Equal {
        total: 3000,
        participants: participants(3),
        paid_by: "user-2".to_string(),
    });
    let paid: Vec<bool> = result.splits.iter().map(|s| s.paid).collect();
    assert_eq!(paid, vec![false, false, true]);
}

// ==========================================
// Custom split
// ==========================================

#[test]
fn test_custom_split_accepts_exact_sum() {
    let ps = participants(3);
    let result = calculate_split(&SplitInput::Custom {
        total: 6000,
        assignments: custom(&ps, &[1000, 2000, 3000]),
        paid_by: "user-0".to_string(),
    });
    assert!(result.is_valid);
    let amounts: Vec<i64> = result.splits.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![1000, 2000, 3000]);
}

#[test]
fn test_custom_split_folds_one_cent_gap_into_last_share() {
    let ps = participants(2);
    let result = calculate_split(&SplitInput::Custom {
        total: 5000,
        assignments: custom(&ps, &[2500, 2499]), // one cent short
        paid_by: "user-0".to_string(),
    });
    assert!(result.is_valid);
    // Still conserves exactly: the cent lands on the last assignment.
    assert_eq!(result.splits[1].amount, 2500);
    assert_eq!(result.splits.iter().map(|s| s.amount).sum::<i64>(), 5000);
}

#[test]
fn test_custom_split_rejects_two_cent_gap_with_both_sums() {
    let ps = participants(2);
    let result = calculate_split(&SplitInput::Custom {
        total: 5000,
        assignments: custom(&ps, &[2500, 2498]),
        paid_by: "user-0".to_string(),
    });
    assert!(!result.is_valid);
    let message = result.error.unwrap();
    // The message states the computed sum vs the required total.
    assert!(message.contains("49.98"), "message was: {message}");
    assert!(message.contains("50.00"), "message was: {message}");
}

#[test]
fn test_custom_split_rejects_empty_assignments() {
    let result = calculate_split(&SplitInput::Custom {
        total: 5000,
        assignments: vec![],
        paid_by: "user-0".to_string(),
    });
    assert!(!result.is_valid);
}

// ==========================================
// Percentage split
// ==========================================

#[test]
fn test_percentage_validation_boundary() {
    let ps = participants(2);

    let at = |pcts: &[f64]| {
        calculate_split(&SplitInput::Percentage {
            total: 10_000,
            assignments: percentages(&ps, pcts),
            paid_by: "user-0".to_string(),
        })
    };

    assert!(!at(&[50.0, 49.99]).is_valid); // 99.99 rejected
    assert!(!at(&[50.0, 50.01]).is_valid); // 100.01 rejected
    assert!(at(&[50.0, 50.0]).is_valid); // exactly 100.00
    assert!(at(&[50.0, 50.004]).is_valid); // rounds to 100.00 at tolerance
}

#[test]
fn test_percentage_split_remainder_goes_to_last() {
    let ps = participants(3);
    let result = calculate_split(&SplitInput::Percentage {
        total: 10_000,
        assignments: percentages(&ps, &[33.33, 33.33, 33.34]),
        paid_by: "user-0".to_string(),
    });
    assert!(result.is_valid);
    let amounts: Vec<i64> = result.splits.iter().map(|s| s.amount).collect();
    // floor shares are 3333, 3333, 3334 for a sum of 10_000; the last
    // participant absorbs whatever floor division leaves over.
    assert_eq!(amounts.iter().sum::<i64>(), 10_000);
    assert_eq!(amounts[0], 3333);
    assert_eq!(amounts[1], 3333);
    assert_eq!(amounts[2], 3334);
}

#[test]
fn test_percentage_split_records_percentages() {
    let ps = participants(2);
    let result = calculate_split(&SplitInput::Percentage {
        total: 10_000,
        assignments: percentages(&ps, &[25.0, 75.0]),
        paid_by: "user-1".to_string(),
    });
    assert!(result.is_valid);
    assert_eq!(result.splits[0].percentage, Some(25.0));
    assert_eq!(result.splits[0].amount, 2500);
    assert_eq!(result.splits[1].percentage, Some(75.0));
    assert_eq!(result.splits[1].amount, 7500);
}

#[test]
fn test_percentage_error_reports_current_sum() {
    let ps = participants(2);
    let result = calculate_split(&SplitInput::Percentage {
        total: 10_000,
        assignments: percentages(&ps, &[60.0, 50.0]),
        paid_by: "user-0".to_string(),
    });
    assert!(!result.is_valid);
    assert!(result.error.unwrap().contains("110.0%"));
}

// ==========================================
// Item-based split
// ==========================================

#[test]
fn test_item_based_gap_distribution() {
    // Items total $90.00 but the bill (with tax) is $97.20; the $7.20 gap
    // spreads evenly across all three participants.
    let ps = participants(3);
    let items = vec![
        ExpenseItem::new("Starter", 3000, 1, vec!["user-0".to_string()]),
        ExpenseItem::new(
            "Main",
            3000,
            2,
            vec!["user-1".to_string(), "user-2".to_string()],
        ),
    ];

    let result = calculate_split(&SplitInput::ItemBased {
        total: 9720,
        items,
        participants: ps,
        paid_by: "user-0".to_string(),
    });

    assert!(result.is_valid);
    let amounts: Vec<i64> = result.splits.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![3240, 3240, 3240]); // 3000 each + 240 gap share
    assert_eq!(amounts.iter().sum::<i64>(), 9720);
}

#[test]
fn test_unassigned_item_splits_across_everyone() {
    let ps = participants(4);
    let items = vec![ExpenseItem::new("Shared bottle", 2000, 1, vec![])];

    let result = calculate_split(&SplitInput::ItemBased {
        total: 2000,
        items,
        participants: ps,
        paid_by: "user-0".to_string(),
    });

    assert!(result.is_valid);
    let amounts: Vec<i64> = result.splits.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![500, 500, 500, 500]);
}

#[test]
fn test_item_based_negative_gap_is_a_discount() {
    // Items sum to $20.00 but the bill was only $18.00 (a voucher): the
    // overshoot comes back off everyone evenly.
    let ps = participants(2);
    let items = vec![ExpenseItem::new("Combo", 1000, 2, vec![])];

    let result = calculate_split(&SplitInput::ItemBased {
        total: 1800,
        items,
        participants: ps,
        paid_by: "user-0".to_string(),
    });

    assert!(result.is_valid);
    let amounts: Vec<i64> = result.splits.iter().map(|s| s.amount).collect();
    assert_eq!(amounts.iter().sum::<i64>(), 1800);
    assert_eq!(amounts, vec![900, 900]);
}

#[test]
fn test_item_based_rejects_empty_roster() {
    let result = calculate_split(&SplitInput::ItemBased {
        total: 1000,
        items: vec![ExpenseItem::new("Anything", 1000, 1, vec![])],
        participants: vec![],
        paid_by: "user-0".to_string(),
    });
    assert!(!result.is_valid);
}

#[test]
fn test_item_remainder_goes_to_items_last_assignee() {
    // $10.00 across 3 assignees: 333 / 333 / 334, last assignee in the
    // item's own order takes the leftover cent.
    let ps = participants(3);
    let items = vec![ExpenseItem::new(
        "Platter",
        1000,
        1,
        vec![
            "user-0".to_string(),
            "user-1".to_string(),
            "user-2".to_string(),
        ],
    )];

    let result = calculate_split(&SplitInput::ItemBased {
        total: 1000,
        items,
        participants: ps,
        paid_by: "user-0".to_string(),
    });

    let amounts: Vec<i64> = result.splits.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![333, 333, 334]);
}

// ==========================================
// Determinism across policies
// ==========================================

#[test]
fn test_recomputation_is_byte_identical() {
    let ps = participants(5);
    let input = SplitInput::Percentage {
        total: 123_457,
        assignments: percentages(&ps, &[10.0, 20.0, 30.0, 15.0, 25.0]),
        paid_by: "user-3".to_string(),
    };

    let first = calculate_split(&input);
    let second = calculate_split(&input);
    assert_eq!(first, second);
}
