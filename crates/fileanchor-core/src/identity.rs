//! # Identities
//!
//! [`SenderIdentity`] names the ledger account a record is sent from.
//! [`SubmissionId`] correlates the log lines and events of one `submit`
//! call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The caller-supplied account that submits the ledger transaction.
///
/// Opaque at this layer: only emptiness is rejected (see
/// [`SenderIdentity::new`]). Ledger adapters apply their own format rules,
/// e.g. the EVM adapter requires `0x` followed by 40 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenderIdentity(String);

impl SenderIdentity {
    /// Wrap a sender identity. Returns `None` for an empty or
    /// whitespace-only value.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SenderIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a single pipeline submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub:{}", self.0)
    }
}
