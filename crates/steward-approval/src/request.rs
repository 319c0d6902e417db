//! Confirmation identifiers and prompts.
//!
//! A [`ConfirmationId`] is the handle an approval channel uses to answer a
//! parked action. It is the only thing standing between a third party and
//! someone else's pending approval, so it is drawn from the OS CSPRNG rather
//! than a counter.

use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Random bytes per identifier (128 bits).
const ID_ENTROPY_BYTES: usize = 16;

/// Unique identifier for a pending confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationId(String);

impl ConfirmationId {
    const PREFIX: &'static str = "c_";

    /// Generate a fresh identifier from the OS random source.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; ID_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(format!("{}{}", Self::PREFIX, hex::encode(bytes)))
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ConfirmationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ConfirmationId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for ConfirmationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an approver is shown for one pending confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPrompt {
    /// Handle to answer with.
    pub id: ConfirmationId,
    /// Action name, e.g. `evaluate`.
    pub action: String,
    /// Category the action was classified into.
    pub category: String,
    /// Human-readable summary.
    pub description: String,
    /// When the confirmation was requested.
    pub requested_at: DateTime<Utc>,
}

impl ConfirmationPrompt {
    /// Create a prompt stamped with the current time.
    #[must_use]
    pub fn new(
        id: ConfirmationId,
        action: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            action: action.into(),
            category: category.into(),
            description: description.into(),
            requested_at: Utc::now(),
        }
    }
}

impl fmt::Display for ConfirmationPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.id, self.description, self.category)
    }
}
