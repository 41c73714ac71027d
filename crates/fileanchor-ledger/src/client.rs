//! The ledger client seam.

use async_trait::async_trait;
use fileanchor_core::{ContentAddress, LedgerReceipt, SenderIdentity};

use crate::error::LedgerError;

/// A client that records content addresses on a ledger.
///
/// ## Contract
///
/// - `submit` returns only after the ledger has produced a receipt, or
///   fails. A receipt may report [`fileanchor_core::TxStatus::Reverted`];
///   callers decide what that means.
/// - Implementations do not retry. Resubmitting after
///   [`LedgerError::Timeout`] may record the address twice.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Record `address` on behalf of `sender`.
    async fn submit(
        &self,
        address: &ContentAddress,
        sender: &SenderIdentity,
    ) -> Result<LedgerReceipt, LedgerError>;
}

#[async_trait]
impl<T> LedgerClient for std::sync::Arc<T>
where
    T: LedgerClient + ?Sized,
{
    async fn submit(
        &self,
        address: &ContentAddress,
        sender: &SenderIdentity,
    ) -> Result<LedgerReceipt, LedgerError> {
        (**self).submit(address, sender).await
    }
}
