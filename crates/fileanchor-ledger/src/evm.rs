//! # EVM JSON-RPC Ledger
//!
//! Records content addresses on an EVM-compatible chain by calling the
//! configured contract method (by default `storeHash(string)`).
//!
//! ## How It Works
//!
//! 1. `eth_sendTransaction` with `{from, to, data}`. The node signs for
//!    `from`, so the sender must be an account the node manages or has
//!    unlocked, and it pays the gas.
//! 2. `eth_getTransactionReceipt` is polled every `poll_interval` until a
//!    receipt appears or `receipt_timeout` elapses. Any RPC failure while
//!    polling is logged and polling continues.
//! 3. A receipt with status `0x0` means the contract reverted and is
//!    reported as [`LedgerError::Rejected`].
//!
//! ## Error Mapping
//!
//! | Condition | Error |
//! |-----------|-------|
//! | connection failure, request timeout, non-2xx HTTP, unparseable body | `Unavailable` |
//! | JSON-RPC `error` from `eth_sendTransaction`, invalid sender, reverted receipt | `Rejected` |
//! | no receipt within `receipt_timeout`, whatever the polls returned | `Timeout` (with the hash) |
//!
//! This adapter holds no private keys.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use fileanchor_core::{ContentAddress, LedgerReceipt, SenderIdentity, TxStatus};
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::client::LedgerClient;
use crate::config::{is_valid_eth_address, LedgerConfig};
use crate::error::LedgerError;

/// Ledger client backed by an EVM node's JSON-RPC API.
#[derive(Debug)]
pub struct EvmLedger {
    client: reqwest::Client,
    config: LedgerConfig,
    request_id: AtomicU64,
}

impl EvmLedger {
    /// Create a ledger client from configuration.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        if !is_valid_eth_address(&config.contract_address) {
            return Err(LedgerError::Rejected(format!(
                "invalid contract address: {}",
                config.contract_address
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .map_err(|e| LedgerError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            request_id: AtomicU64::new(1),
        })
    }

    /// Access the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": self.request_id.fetch_add(1, Ordering::Relaxed),
        });

        let resp = self
            .client
            .post(self.config.rpc_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LedgerError::Unavailable(format!("{method}: request timed out"))
                } else {
                    LedgerError::Unavailable(format!("{method}: {e}"))
                }
            })?;

        if !resp.status().is_success() {
            return Err(LedgerError::Unavailable(format!("{method}: HTTP {}", resp.status())));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| {
                LedgerError::Unavailable(format!("{method}: invalid JSON response: {e}"))
            })?;

        if let Some(error) = json.get("error") {
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown RPC error");
            return Err(LedgerError::Rejected(msg.to_string()));
        }

        json.get("result").cloned().ok_or_else(|| {
            LedgerError::Unavailable(format!("{method}: JSON-RPC response missing 'result' field"))
        })
    }

    /// Submit the contract call and return the transaction hash.
    async fn send_transaction(
        &self,
        address: &ContentAddress,
        sender: &SenderIdentity,
    ) -> Result<String, LedgerError> {
        let tx = json!({
            "from": sender.as_str(),
            "to": self.config.contract_address,
            "data": self.config.interface.encode_call_hex(address.as_str()),
        });

        let result = self.rpc_call("eth_sendTransaction", json!([tx])).await?;

        result.as_str().map(str::to_string).ok_or_else(|| {
            LedgerError::Unavailable("eth_sendTransaction returned non-string result".into())
        })
    }

    /// Poll for the receipt of `tx_hash` until it appears or the
    /// configured wait runs out.
    ///
    /// The transaction is already accepted, so no poll failure ends the
    /// wait early: node outages and JSON-RPC errors (rate limits, for
    /// one) are logged and the only failure is a `Timeout` carrying the
    /// hash.
    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<Value, LedgerError> {
        let started = Instant::now();
        let deadline = started + self.config.receipt_timeout;

        loop {
            match self
                .rpc_call("eth_getTransactionReceipt", json!([tx_hash]))
                .await
            {
                Ok(receipt) if !receipt.is_null() => return Ok(receipt),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(tx_id = %tx_hash, error = %e, "receipt poll failed, retrying");
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(LedgerError::Timeout {
                    tx_id: Some(tx_hash.to_string()),
                    waited_ms: now.duration_since(started).as_millis() as u64,
                });
            }
            tokio::time::sleep(self.config.poll_interval.min(deadline - now)).await;
        }
    }
}

#[async_trait]
impl LedgerClient for EvmLedger {
    async fn submit(
        &self,
        address: &ContentAddress,
        sender: &SenderIdentity,
    ) -> Result<LedgerReceipt, LedgerError> {
        if !is_valid_eth_address(sender.as_str()) {
            return Err(LedgerError::Rejected(format!("invalid sender address: {sender}")));
        }

        let tx_hash = self.send_transaction(address, sender).await?;
        tracing::debug!(tx_id = %tx_hash, %address, "transaction accepted, awaiting receipt");

        let raw = self.wait_for_receipt(&tx_hash).await?;
        let receipt = parse_receipt(&raw, tx_hash, address, sender);

        if receipt.status == TxStatus::Reverted {
            return Err(LedgerError::Rejected(format!("transaction {} reverted", receipt.tx_id)));
        }
        Ok(receipt)
    }
}

// Pre-Byzantium receipts carry no `status`; they are treated as success.
fn parse_receipt(
    raw: &Value,
    tx_hash: String,
    address: &ContentAddress,
    sender: &SenderIdentity,
) -> LedgerReceipt {
    let status = match raw.get("status").and_then(Value::as_str) {
        Some(s) if parse_quantity(s) == Some(0) => TxStatus::Reverted,
        _ => TxStatus::Success,
    };
    let tx_id = raw
        .get("transactionHash")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or(tx_hash);

    LedgerReceipt {
        tx_id,
        status,
        address: address.clone(),
        sender: sender.clone(),
        block_number: raw
            .get("blockNumber")
            .and_then(Value::as_str)
            .and_then(parse_quantity),
        gas_used: raw
            .get("gasUsed")
            .and_then(Value::as_str)
            .and_then(parse_quantity),
    }
}

/// Parse a JSON-RPC hex quantity such as `0x1b4`.
fn parse_quantity(s: &str) -> Option<u64> {
    let digits = s.strip_prefix("0x")?;
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
