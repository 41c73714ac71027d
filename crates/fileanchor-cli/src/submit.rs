//! Pipeline assembly and result rendering.

use std::sync::Arc;

use anyhow::Context;
use fileanchor_core::{LedgerReceipt, LifecycleBus};
use fileanchor_ledger::EvmLedger;
use fileanchor_pipeline::SubmissionPipeline;
use fileanchor_store::IpfsHttpStore;

use crate::config::AppConfig;

/// The production pipeline: IPFS HTTP API in front of an EVM node.
pub type HttpPipeline = SubmissionPipeline<IpfsHttpStore, EvmLedger>;

/// Build the production pipeline with logging attached to the bus.
pub fn build_pipeline(config: AppConfig) -> anyhow::Result<HttpPipeline> {
    let store = IpfsHttpStore::new(config.store).context("failed to build content store client")?;
    let ledger = EvmLedger::new(config.ledger).context("failed to build ledger client")?;
    let bus = Arc::new(LifecycleBus::with_logging());
    Ok(SubmissionPipeline::new(store, ledger, bus).with_options(config.pipeline))
}

/// What the binary prints to stdout on success: the transaction id, or
/// the whole receipt as pretty JSON.
pub fn render_receipt(receipt: &LedgerReceipt, json: bool) -> anyhow::Result<String> {
    if json {
        serde_json::to_string_pretty(receipt).context("failed to serialize receipt")
    } else {
        Ok(receipt.tx_id.clone())
    }
}
