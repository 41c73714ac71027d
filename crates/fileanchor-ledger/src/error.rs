//! Ledger client error types.

use fileanchor_core::SubmissionError;

/// Errors from ledger calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The node could not be reached or answered with garbage.
    #[error("ledger node unavailable: {0}")]
    Unavailable(String),
    /// The node refused the transaction, or it reverted.
    #[error("{0}")]
    Rejected(String),
    /// No receipt arrived within the configured wait.
    #[error("no receipt for {tx_id:?} after {waited_ms}ms")]
    Timeout {
        tx_id: Option<String>,
        waited_ms: u64,
    },
}

impl From<LedgerError> for SubmissionError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unavailable(reason) => SubmissionError::LedgerUnavailable(reason),
            LedgerError::Rejected(reason) => SubmissionError::LedgerRejected(reason),
            LedgerError::Timeout { tx_id, waited_ms } => {
                SubmissionError::Timeout { tx_id, waited_ms }
            }
        }
    }
}
