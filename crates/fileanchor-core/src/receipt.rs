//! # Ledger Receipt
//!
//! Confirmation record returned by a ledger once the content address has
//! been submitted. Immutable; owned by whoever called the pipeline.

use serde::{Deserialize, Serialize};

use crate::address::ContentAddress;
use crate::identity::SenderIdentity;

/// Execution outcome reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// The transaction executed and its state change is recorded.
    Success,
    /// The transaction was mined but reverted.
    Reverted,
}

impl TxStatus {
    /// Whether the transaction succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Reverted => f.write_str("reverted"),
        }
    }
}

/// Result of recording a content address on a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    /// Transaction identifier (hash) assigned by the ledger.
    pub tx_id: String,
    /// Execution outcome.
    pub status: TxStatus,
    /// The content address the transaction recorded.
    pub address: ContentAddress,
    /// The account the transaction was sent from.
    pub sender: SenderIdentity,
    /// Block that includes the transaction, if the ledger reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Gas consumed, if the ledger reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
}

impl LedgerReceipt {
    /// A successful receipt without block metadata.
    pub fn success(
        tx_id: impl Into<String>,
        address: ContentAddress,
        sender: SenderIdentity,
    ) -> Self {
        Self {
            tx_id: tx_id.into(),
            status: TxStatus::Success,
            address,
            sender,
            block_number: None,
            gas_used: None,
        }
    }
}
