//! Content store client error types.

use fileanchor_core::SubmissionError;

/// Errors from content store calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached, timed out, or failed internally.
    #[error("content store {endpoint} unavailable: {reason}")]
    Unavailable { endpoint: String, reason: String },
    /// The store refused the request (quota, malformed input, bad auth).
    #[error("content store {endpoint} rejected request: {reason}")]
    Rejected { endpoint: String, reason: String },
}

impl StoreError {
    pub(crate) fn unavailable(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn rejected(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for SubmissionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { .. } => SubmissionError::StoreUnavailable(err.to_string()),
            StoreError::Rejected { .. } => SubmissionError::StoreRejected(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_taxonomy() {
        let err: SubmissionError = StoreError::unavailable("add", "connection refused").into();
        assert!(matches!(
            err,
            SubmissionError::StoreUnavailable(ref m) if m.contains("connection refused")
        ));

        let err: SubmissionError = StoreError::rejected("add", "quota exceeded").into();
        assert!(matches!(
            err,
            SubmissionError::StoreRejected(ref m) if m.contains("quota exceeded")
        ));
    }
}
