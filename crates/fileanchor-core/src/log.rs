//! Console-logging lifecycle observer.

use tracing::{error, info};

use crate::bus::{HandlerError, LifecycleHandler};
use crate::event::LifecycleEvent;

/// Writes one `tracing` record per lifecycle event: `info` for progress,
/// `error` for failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSubscriber;

impl LifecycleHandler for LogSubscriber {
    fn handle(&self, event: &LifecycleEvent) -> Result<(), HandlerError> {
        match event {
            LifecycleEvent::ReadComplete { path, size } => {
                info!(path = %path.display(), size, "file read complete");
            }
            LifecycleEvent::StoreComplete { address } => {
                info!(%address, "file stored in content store");
            }
            LifecycleEvent::LedgerComplete { receipt } => {
                info!(
                    tx_id = %receipt.tx_id,
                    address = %receipt.address,
                    block = ?receipt.block_number,
                    "content address recorded on ledger"
                );
            }
            LifecycleEvent::Failed {
                stage,
                error,
                address,
            } => match address {
                Some(address) => {
                    error!(%stage, %address, %error, "submission failed after store");
                }
                None => error!(%stage, %error, "submission failed"),
            },
        }
        Ok(())
    }
}
