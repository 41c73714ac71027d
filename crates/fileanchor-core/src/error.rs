//! # Error Types — Submission Failure Taxonomy
//!
//! Every way a submission can fail maps to exactly one
//! [`SubmissionError`] variant, so callers can tell "never stored" from
//! "stored but not recorded" without parsing messages.
//!
//! ## Design
//!
//! - Variants carry plain data (`String`, `PathBuf`, `io::ErrorKind`) so the
//!   error is `Clone` and can ride inside a [`crate::LifecycleEvent`].
//! - Adapter crates define richer error types with endpoint context and
//!   convert into this taxonomy at the pipeline boundary.
//! - Nothing here is retried automatically at any layer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The non-terminal pipeline state in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Input validation, before any I/O.
    Idle,
    /// Loading the file from local storage.
    Reading,
    /// Uploading to the content-addressed store.
    Storing,
    /// Recording the content address on the ledger.
    Recording,
}

impl Stage {
    /// Stable lowercase name, used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Reading => "reading",
            Self::Storing => "storing",
            Self::Recording => "recording",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The caller supplied an empty path or sender.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The file could not be read.
    #[error("cannot read {}: {reason}", .path.display())]
    FileUnreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Kind reported by the operating system.
        kind: std::io::ErrorKind,
        /// Human-readable reason.
        reason: String,
    },

    /// The content store could not be reached or failed internally.
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),

    /// The content store refused the upload.
    #[error("content store rejected upload: {0}")]
    StoreRejected(String),

    /// The ledger node could not be reached.
    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// The ledger refused or reverted the transaction.
    #[error("ledger rejected transaction: {0}")]
    LedgerRejected(String),

    /// No confirmation arrived within the ledger client's wait bound.
    #[error("{}", timeout_message(.tx_id, .waited_ms))]
    Timeout {
        /// Transaction hash, if the transaction was accepted before the
        /// wait expired.
        tx_id: Option<String>,
        /// How long the client waited, in milliseconds.
        waited_ms: u64,
    },
}

fn timeout_message(tx_id: &Option<String>, waited_ms: &u64) -> String {
    match tx_id {
        Some(tx) => format!("no ledger confirmation for {tx} within {waited_ms}ms"),
        None => format!("no ledger confirmation within {waited_ms}ms"),
    }
}

impl SubmissionError {
    /// Build a [`SubmissionError::FileUnreadable`] from an I/O error.
    pub fn file_unreadable(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::FileUnreadable {
            path: path.into(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }

    /// Whether re-invoking `submit` unchanged could succeed.
    ///
    /// Caller errors and rejections need a change of input first;
    /// unavailability and timeouts may clear on their own.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::LedgerUnavailable(_) | Self::Timeout { .. }
        )
    }

    /// Whether the failure originated in the content store.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::StoreRejected(_))
    }

    /// Whether the failure originated in the ledger.
    pub fn is_ledger_failure(&self) -> bool {
        matches!(
            self,
            Self::LedgerUnavailable(_) | Self::LedgerRejected(_) | Self::Timeout { .. }
        )
    }
}
