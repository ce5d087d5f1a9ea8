//! User model
//!
//! Plain identity record. Other entities carry denormalized copies of the
//! user for display; the `id` is the only field with identity semantics,
//! and a stale copy is a cache miss, not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person participating in expenses and settlements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID)
    pub id: String,

    pub name: String,

    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh UUID
    ///
    /// # Example
    /// ```
    /// use whoowes_core_rs::User;
    /// use chrono::Utc;
    ///
    /// let user = User::new("Alice", "alice@example.com", Utc::now());
    /// assert!(!user.id.is_empty());
    /// ```
    pub fn new(name: impl Into<String>, email: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            phone: None,
            avatar_url: None,
            created_at: at,
        }
    }

    /// Placeholder for an id that is missing from the supplied roster.
    ///
    /// The engines never fail on an unknown counterparty; they surface it
    /// as "Unknown" and let the data layer reconcile.
    pub fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: "Unknown".to_string(),
            email: String::new(),
            phone: None,
            avatar_url: None,
            created_at: DateTime::UNIX_EPOCH,
        }
    }
}
