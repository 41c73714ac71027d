//! Process exit codes.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | recorded |
//! | 1 | configuration or other startup failure |
//! | 2 | invalid input |
//! | 3 | file unreadable |
//! | 4 | content store failure |
//! | 5 | ledger failure |
//! | 6 | ledger confirmation timed out |

use fileanchor_core::SubmissionError;

pub const EXIT_OK: u8 = 0;
pub const EXIT_CONFIG: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 2;
pub const EXIT_FILE_UNREADABLE: u8 = 3;
pub const EXIT_STORE: u8 = 4;
pub const EXIT_LEDGER: u8 = 5;
pub const EXIT_TIMEOUT: u8 = 6;

/// Exit code for a failed submission.
pub fn exit_code(err: &SubmissionError) -> u8 {
    match err {
        SubmissionError::InvalidInput(_) => EXIT_INVALID_INPUT,
        SubmissionError::FileUnreadable { .. } => EXIT_FILE_UNREADABLE,
        SubmissionError::StoreUnavailable(_) | SubmissionError::StoreRejected(_) => EXIT_STORE,
        SubmissionError::LedgerUnavailable(_) | SubmissionError::LedgerRejected(_) => EXIT_LEDGER,
        SubmissionError::Timeout { .. } => EXIT_TIMEOUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_failure_class_has_its_own_code() {
        let cases = [
            (SubmissionError::InvalidInput("empty".into()), EXIT_INVALID_INPUT),
            (
                SubmissionError::file_unreadable(
                    "a.txt",
                    &std::io::Error::from(std::io::ErrorKind::NotFound),
                ),
                EXIT_FILE_UNREADABLE,
            ),
            (SubmissionError::StoreRejected("quota".into()), EXIT_STORE),
            (SubmissionError::StoreUnavailable("down".into()), EXIT_STORE),
            (SubmissionError::LedgerRejected("reverted".into()), EXIT_LEDGER),
            (SubmissionError::LedgerUnavailable("down".into()), EXIT_LEDGER),
            (
                SubmissionError::Timeout {
                    tx_id: None,
                    waited_ms: 1,
                },
                EXIT_TIMEOUT,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(exit_code(&err), code, "{err}");
            assert_ne!(code, EXIT_OK);
            assert_ne!(code, EXIT_CONFIG);
        }
    }
}
