//! Expense model
//!
//! An expense records one payment made on behalf of a group of people:
//! who paid, the total, and a per-participant split of that total.
//!
//! CRITICAL: All money values are i64 (cents), and the splits of a valid
//! expense always sum to the expense amount exactly. The constructor
//! enforces this, so downstream engines never re-check it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::User;

/// Expense category, for display and filtering only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Accommodation,
    Entertainment,
    Utilities,
    Shopping,
    Health,
    #[default]
    Other,
}

/// Which split policy produced an expense's splits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    Equal,
    Custom,
    Percentage,
    ItemBased,
}

impl SplitType {
    /// Display label for pickers and detail screens
    pub fn label(&self) -> &'static str {
        match self {
            SplitType::Equal => "Split Equally",
            SplitType::Custom => "Custom Amounts",
            SplitType::Percentage => "By Percentage",
            SplitType::ItemBased => "By Item",
        }
    }
}

/// One participant's share of an expense
///
/// `paid` is asserted, never computed: it starts true for the payer's own
/// share and is otherwise flipped only by an explicit mark-paid action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSplit {
    pub user_id: String,

    /// Denormalized display copy; may be stale without being an error
    pub user: User,

    /// Share amount (i64 cents)
    pub amount: i64,

    /// Recorded for percentage splits, informational only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,

    pub paid: bool,
}

/// A line item on an item-based expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    /// Unique item identifier (UUID)
    pub id: String,

    pub name: String,

    /// Unit price (i64 cents)
    pub price: i64,

    pub quantity: u32,

    /// User ids this item is assigned to; empty means "everyone"
    pub assigned_to: Vec<String>,
}

impl ExpenseItem {
    pub fn new(
        name: impl Into<String>,
        price: i64,
        quantity: u32,
        assigned_to: Vec<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            quantity,
            assigned_to,
        }
    }

    /// Item subtotal: `price × quantity` (i64 cents)
    pub fn subtotal(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// Errors that can occur when building or mutating an expense
#[derive(Debug, Error, PartialEq)]
pub enum ExpenseError {
    #[error("expense amount must be positive")]
    InvalidAmount,

    #[error("expense must have at least one split")]
    EmptySplits,

    #[error("split amounts sum to {actual} cents but expense total is {expected} cents")]
    SplitSumMismatch { expected: i64, actual: i64 },

    #[error("no split found for user {user_id}")]
    SplitNotFound { user_id: String },
}

/// One shared expense
///
/// Fields are private because the type owns the conservation invariant:
/// `sum(splits[].amount) == amount`, exactly, always.
///
/// # Example
/// ```
/// use whoowes_core_rs::{Expense, ExpenseSplit, User};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let alice = User::new("Alice", "alice@example.com", now);
/// let bob = User::new("Bob", "bob@example.com", now);
///
/// let splits = vec![
///     ExpenseSplit {
///         user_id: alice.id.clone(),
///         user: alice.clone(),
///         amount: 1500,
///         percentage: None,
///         paid: true,
///     },
///     ExpenseSplit {
///         user_id: bob.id.clone(),
///         user: bob.clone(),
///         amount: 1500,
///         percentage: None,
///         paid: false,
///     },
/// ];
///
/// let expense = Expense::new("Dinner", 3000, &alice.id, splits, now).unwrap();
/// assert_eq!(expense.amount(), 3000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique expense identifier (UUID)
    id: String,

    /// Group this expense belongs to, if any
    group_id: Option<String>,

    title: String,

    description: Option<String>,

    /// Total amount paid (i64 cents)
    amount: i64,

    /// ISO 4217 code; amounts are pre-normalized to one currency per expense
    currency: String,

    category: ExpenseCategory,

    /// User id of whoever fronted the money
    paid_by: String,

    split_type: SplitType,

    splits: Vec<ExpenseSplit>,

    /// Present only for item-based splits; consistent with `splits` by
    /// construction (reassigning items means recomputing the splits)
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Vec<ExpenseItem>>,

    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense, enforcing exact cent conservation
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount <= 0`
    /// - `EmptySplits` if no splits are supplied
    /// - `SplitSumMismatch` if the splits do not sum to `amount` exactly
    pub fn new(
        title: impl Into<String>,
        amount: i64,
        paid_by: impl Into<String>,
        splits: Vec<ExpenseSplit>,
        at: DateTime<Utc>,
    ) -> Result<Self, ExpenseError> {
        if amount <= 0 {
            return Err(ExpenseError::InvalidAmount);
        }
        if splits.is_empty() {
            return Err(ExpenseError::EmptySplits);
        }
        let actual: i64 = splits.iter().map(|s| s.amount).sum();
        if actual != amount {
            return Err(ExpenseError::SplitSumMismatch {
                expected: amount,
                actual,
            });
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            group_id: None,
            title: title.into(),
            description: None,
            amount,
            currency: "USD".to_string(),
            category: ExpenseCategory::default(),
            paid_by: paid_by.into(),
            split_type: SplitType::Equal,
            splits,
            items: None,
            created_at: at,
        })
    }

    /// Set the owning group (builder pattern)
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Set a free-form description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the currency code (builder pattern)
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the category (builder pattern)
    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    /// Record which split policy produced the splits (builder pattern)
    pub fn with_split_type(mut self, split_type: SplitType) -> Self {
        self.split_type = split_type;
        self
    }

    /// Attach the line items an item-based split was computed from
    /// (builder pattern)
    pub fn with_items(mut self, items: Vec<ExpenseItem>) -> Self {
        self.items = Some(items);
        self.split_type = SplitType::ItemBased;
        self
    }

    /// Get expense ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get owning group id, if any
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get total amount (i64 cents)
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    /// Get the payer's user id
    pub fn paid_by(&self) -> &str {
        &self.paid_by
    }

    pub fn split_type(&self) -> SplitType {
        self.split_type
    }

    pub fn splits(&self) -> &[ExpenseSplit] {
        &self.splits
    }

    pub fn items(&self) -> Option<&[ExpenseItem]> {
        self.items.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether a user is the payer or owns one of the splits
    pub fn involves(&self, user_id: &str) -> bool {
        self.paid_by == user_id || self.splits.iter().any(|s| s.user_id == user_id)
    }

    /// A user's own share of this expense (0 if they have no split)
    pub fn share_of(&self, user_id: &str) -> i64 {
        self.splits
            .iter()
            .find(|s| s.user_id == user_id)
            .map_or(0, |s| s.amount)
    }

    /// Mark one user's split as paid (explicit assertion, never computed)
    ///
    /// # Errors
    /// - `SplitNotFound` if the user has no split on this expense
    pub fn mark_split_paid(&mut self, user_id: &str) -> Result<(), ExpenseError> {
        let split = self
            .splits
            .iter_mut()
            .find(|s| s.user_id == user_id)
            .ok_or_else(|| ExpenseError::SplitNotFound {
                user_id: user_id.to_string(),
            })?;
        split.paid = true;
        Ok(())
    }
}
