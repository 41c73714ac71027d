//! # Lifecycle Events
//!
//! Notifications describing submission progress. They are independent of
//! the pipeline's return value: observers learn about progress, callers
//! learn the outcome from `submit` itself.

use std::path::PathBuf;

use crate::address::ContentAddress;
use crate::error::{Stage, SubmissionError};
use crate::receipt::LedgerReceipt;

/// Field-less discriminant of [`LifecycleEvent`], used as the
/// subscription key on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The file was read.
    ReadComplete,
    /// The content store returned an address.
    StoreComplete,
    /// The ledger returned a receipt.
    LedgerComplete,
    /// A stage failed.
    Failed,
}

impl EventKind {
    /// Every kind, in pipeline order.
    pub const ALL: [EventKind; 4] = [
        Self::ReadComplete,
        Self::StoreComplete,
        Self::LedgerComplete,
        Self::Failed,
    ];
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ReadComplete => "read-complete",
            Self::StoreComplete => "store-complete",
            Self::LedgerComplete => "ledger-complete",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A single progress notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The file at `path` was read (`size` bytes).
    ReadComplete { path: PathBuf, size: u64 },
    /// The content store accepted the file under `address`.
    StoreComplete { address: ContentAddress },
    /// The ledger recorded the address.
    LedgerComplete { receipt: LedgerReceipt },
    /// The submission failed in `stage`.
    ///
    /// `address` is set when the failure came after a successful store,
    /// so the ledger step can be retried by hand.
    Failed {
        stage: Stage,
        error: SubmissionError,
        address: Option<ContentAddress>,
    },
}

impl LifecycleEvent {
    /// The subscription key for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ReadComplete { .. } => EventKind::ReadComplete,
            Self::StoreComplete { .. } => EventKind::StoreComplete,
            Self::LedgerComplete { .. } => EventKind::LedgerComplete,
            Self::Failed { .. } => EventKind::Failed,
        }
    }
}
