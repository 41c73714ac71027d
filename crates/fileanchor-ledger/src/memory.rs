//! In-memory ledger.
//!
//! Every submission succeeds with a synthetic transaction id unless a
//! fault was injected. Transaction ids are `0x` followed by the hex
//! Keccak-256 of the address, the sender and a sequence number, so they
//! are unique per submission and stable across runs.

use async_trait::async_trait;
use fileanchor_core::{ContentAddress, LedgerReceipt, SenderIdentity, TxStatus};
use parking_lot::Mutex;

use crate::abi::keccak256;
use crate::client::LedgerClient;
use crate::error::LedgerError;

#[derive(Debug)]
enum Fault {
    Fail(LedgerError),
    Revert,
}

/// A ledger held in process memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    receipts: Mutex<Vec<LedgerReceipt>>,
    fault: Mutex<Option<Fault>>,
    attempts: Mutex<u64>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `submit` fail with `err`. Nothing is recorded.
    pub fn fail_next_with(&self, err: LedgerError) {
        *self.fault.lock() = Some(Fault::Fail(err));
    }

    /// Make the next `submit` return a reverted receipt. The reverted
    /// transaction is recorded, as a chain would.
    pub fn revert_next(&self) {
        *self.fault.lock() = Some(Fault::Revert);
    }

    /// Receipts of all recorded submissions, in submission order.
    pub fn receipts(&self) -> Vec<LedgerReceipt> {
        self.receipts.lock().clone()
    }

    /// Number of `submit` calls received, failed ones included.
    pub fn submit_count(&self) -> u64 {
        *self.attempts.lock()
    }

    /// Whether `address` was recorded by a successful transaction.
    pub fn is_recorded(&self, address: &ContentAddress) -> bool {
        self.receipts
            .lock()
            .iter()
            .any(|r| r.status.is_success() && &r.address == address)
    }
}

fn synthetic_tx_id(address: &ContentAddress, sender: &SenderIdentity, seq: u64) -> String {
    let mut preimage = Vec::with_capacity(address.as_str().len() + sender.as_str().len() + 10);
    preimage.extend_from_slice(address.as_str().as_bytes());
    preimage.push(0);
    preimage.extend_from_slice(sender.as_str().as_bytes());
    preimage.push(0);
    preimage.extend_from_slice(&seq.to_be_bytes());
    format!("0x{}", hex::encode(keccak256(&preimage)))
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn submit(
        &self,
        address: &ContentAddress,
        sender: &SenderIdentity,
    ) -> Result<LedgerReceipt, LedgerError> {
        let seq = {
            let mut attempts = self.attempts.lock();
            *attempts += 1;
            *attempts
        };

        let status = match self.fault.lock().take() {
            Some(Fault::Fail(err)) => return Err(err),
            Some(Fault::Revert) => TxStatus::Reverted,
            None => TxStatus::Success,
        };

        let mut receipts = self.receipts.lock();
        let receipt = LedgerReceipt {
            tx_id: synthetic_tx_id(address, sender, seq),
            status,
            address: address.clone(),
            sender: sender.clone(),
            block_number: Some(receipts.len() as u64 + 1),
            gas_used: None,
        };
        receipts.push(receipt.clone());
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> ContentAddress {
        ContentAddress::new(s).unwrap()
    }

    fn sender() -> SenderIdentity {
        SenderIdentity::new("0xabc").unwrap()
    }

    #[tokio::test]
    async fn records_in_order_with_unique_ids() {
        let ledger = MemoryLedger::new();
        let first = ledger.submit(&addr("Qm1"), &sender()).await.unwrap();
        let second = ledger.submit(&addr("Qm1"), &sender()).await.unwrap();

        assert_ne!(first.tx_id, second.tx_id);
        assert!(first.tx_id.starts_with("0x"));
        assert_eq!(first.tx_id.len(), 66);
        assert_eq!(first.block_number, Some(1));
        assert_eq!(second.block_number, Some(2));
        assert_eq!(ledger.receipts(), vec![first, second]);
        assert!(ledger.is_recorded(&addr("Qm1")));
    }

    #[tokio::test]
    async fn tx_ids_are_deterministic() {
        let a = MemoryLedger::new().submit(&addr("Qm1"), &sender()).await.unwrap();
        let b = MemoryLedger::new().submit(&addr("Qm1"), &sender()).await.unwrap();
        assert_eq!(a.tx_id, b.tx_id);
    }

    #[tokio::test]
    async fn injected_failure_records_nothing() {
        let ledger = MemoryLedger::new();
        ledger.fail_next_with(LedgerError::Rejected("insufficient funds".into()));

        let err = ledger.submit(&addr("Qm1"), &sender()).await.unwrap_err();
        assert_eq!(err, LedgerError::Rejected("insufficient funds".into()));
        assert!(ledger.receipts().is_empty());
        assert_eq!(ledger.submit_count(), 1);

        assert!(ledger.submit(&addr("Qm1"), &sender()).await.is_ok());
    }

    #[tokio::test]
    async fn revert_is_recorded_but_not_counted() {
        let ledger = MemoryLedger::new();
        ledger.revert_next();

        let receipt = ledger.submit(&addr("Qm1"), &sender()).await.unwrap();
        assert_eq!(receipt.status, TxStatus::Reverted);
        assert_eq!(ledger.receipts().len(), 1);
        assert!(!ledger.is_recorded(&addr("Qm1")));
    }
}
