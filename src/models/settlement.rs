//! Settlement model
//!
//! A settlement is a real-world payment one user claims to have made to
//! another, confirmed (or rejected) by the recipient so the two parties can
//! never disagree about whether a debt is settled.
//!
//! # Lifecycle
//!
//! ```text
//! create (payer) ──→ Pending ──confirm (recipient)──→ Confirmed (terminal)
//!                       │──────reject (recipient)───→ Rejected  (terminal)
//!                       └──────cancel (payer)───────→ removed from the store
//! ```
//!
//! No other transitions exist. A second transition on a non-pending
//! settlement fails with "settlement is already {status}", never a silent
//! no-op. Only a *confirmed* settlement ever affects balances.
//!
//! CRITICAL: All money values are i64 (cents)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Settlement status
///
/// Terminal timestamps live inside the variant, so a confirmed-at time
/// cannot exist on a pending settlement by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Initiated by the payer, awaiting the recipient's response
    Pending,

    /// Acknowledged by the recipient; the only status that moves balances
    Confirmed { confirmed_at: DateTime<Utc> },

    /// Declined by the recipient; retained as history, no balance effect
    Rejected { rejected_at: DateTime<Utc> },
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Confirmed { .. } => "confirmed",
            SettlementStatus::Rejected { .. } => "rejected",
        };
        f.write_str(label)
    }
}

/// Errors that can occur during settlement operations
///
/// Callers surface these messages verbatim; silent coercion to a default
/// behavior is not allowed.
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("cannot settle with yourself")]
    SelfSettlement,

    #[error("settlement amount must be positive")]
    InvalidAmount,

    #[error("only the recipient can confirm or reject this settlement")]
    NotRecipient,

    #[error("only the initiator can cancel this settlement")]
    NotInitiator,

    #[error("settlement is already {status}")]
    NotPending { status: String },
}

/// A peer-acknowledged payment between two users
///
/// Owned jointly by the two parties: the payer (`from_user_id`) creates and
/// cancels, the recipient (`to_user_id`) confirms or rejects.
///
/// # Example
/// ```
/// use whoowes_core_rs::Settlement;
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let mut settlement = Settlement::new("alice", "bob", 2500, now).unwrap();
/// assert!(settlement.is_pending());
///
/// settlement.confirm("bob", now).unwrap();
/// assert!(settlement.is_confirmed());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique settlement identifier (UUID)
    id: String,

    /// Payer: who claims to have paid
    from_user_id: String,

    /// Recipient: who must confirm or reject
    to_user_id: String,

    /// Amount paid (i64 cents); a settlement always targets one fixed
    /// amount, never a partial one
    amount: i64,

    /// Group context, if the payment settles group expenses
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<String>,

    /// Free-form note from the payer ("paid you back for dinner")
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,

    status: SettlementStatus,

    initiated_at: DateTime<Utc>,
}

impl Settlement {
    /// Create a new pending settlement
    ///
    /// # Errors
    /// - `SelfSettlement` if payer and recipient are the same user
    /// - `InvalidAmount` if `amount <= 0`
    pub fn new(
        from_user_id: impl Into<String>,
        to_user_id: impl Into<String>,
        amount: i64,
        at: DateTime<Utc>,
    ) -> Result<Self, SettlementError> {
        let from_user_id = from_user_id.into();
        let to_user_id = to_user_id.into();

        if from_user_id == to_user_id {
            return Err(SettlementError::SelfSettlement);
        }
        if amount <= 0 {
            return Err(SettlementError::InvalidAmount);
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            from_user_id,
            to_user_id,
            amount,
            group_id: None,
            note: None,
            status: SettlementStatus::Pending,
            initiated_at: at,
        })
    }

    /// Set the group context (builder pattern)
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Attach a note (builder pattern)
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Get settlement ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the payer's user id
    pub fn from_user_id(&self) -> &str {
        &self.from_user_id
    }

    /// Get the recipient's user id
    pub fn to_user_id(&self) -> &str {
        &self.to_user_id
    }

    /// Get the amount (i64 cents)
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Get current status
    pub fn status(&self) -> &SettlementStatus {
        &self.status
    }

    pub fn initiated_at(&self) -> DateTime<Utc> {
        self.initiated_at
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, SettlementStatus::Pending)
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.status, SettlementStatus::Confirmed { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.status, SettlementStatus::Rejected { .. })
    }

    /// When the recipient confirmed, if they have
    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            SettlementStatus::Confirmed { confirmed_at } => Some(confirmed_at),
            _ => None,
        }
    }

    /// When the recipient rejected, if they have
    pub fn rejected_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            SettlementStatus::Rejected { rejected_at } => Some(rejected_at),
            _ => None,
        }
    }

    /// Whether a user is either party to this settlement
    pub fn involves(&self, user_id: &str) -> bool {
        self.from_user_id == user_id || self.to_user_id == user_id
    }

    /// Confirm a pending settlement (recipient only)
    ///
    /// This is the only transition that ever changes balances: the next
    /// aggregation pass counts confirmed settlements as real money moved.
    ///
    /// # Errors
    /// - `NotRecipient` if `actor` is not the recipient
    /// - `NotPending` if the settlement was already confirmed or rejected
    pub fn confirm(&mut self, actor: &str, at: DateTime<Utc>) -> Result<(), SettlementError> {
        if actor != self.to_user_id {
            return Err(SettlementError::NotRecipient);
        }
        match &self.status {
            SettlementStatus::Pending => {
                self.status = SettlementStatus::Confirmed { confirmed_at: at };
                Ok(())
            }
            other => Err(SettlementError::NotPending {
                status: other.to_string(),
            }),
        }
    }

    /// Reject a pending settlement (recipient only)
    ///
    /// The record is retained as history but never affects balances.
    ///
    /// # Errors
    /// - `NotRecipient` if `actor` is not the recipient
    /// - `NotPending` if the settlement was already confirmed or rejected
    pub fn reject(&mut self, actor: &str, at: DateTime<Utc>) -> Result<(), SettlementError> {
        if actor != self.to_user_id {
            return Err(SettlementError::NotRecipient);
        }
        match &self.status {
            SettlementStatus::Pending => {
                self.status = SettlementStatus::Rejected { rejected_at: at };
                Ok(())
            }
            other => Err(SettlementError::NotPending {
                status: other.to_string(),
            }),
        }
    }

    /// Check that `actor` may cancel this settlement right now
    ///
    /// Cancellation is deletion, so the store performs the removal; the
    /// entity only authorizes it.
    ///
    /// # Errors
    /// - `NotInitiator` if `actor` is not the payer
    /// - `NotPending` if the settlement was already confirmed or rejected
    pub fn authorize_cancel(&self, actor: &str) -> Result<(), SettlementError> {
        if actor != self.from_user_id {
            return Err(SettlementError::NotInitiator);
        }
        match &self.status {
            SettlementStatus::Pending => Ok(()),
            other => Err(SettlementError::NotPending {
                status: other.to_string(),
            }),
        }
    }
}
