//! Ledger client configuration.
//!
//! Built from `BLOCKCHAIN_NODE_URL` and the `SMART_CONTRACT_*` variables.
//! The contract address and ABI are checked here so that a bad deployment
//! fails at startup, before any file is read or uploaded.

use std::time::Duration;

use url::Url;

use crate::abi::{is_valid_method_name, AbiError, ContractInterface, DEFAULT_METHOD};

/// Default JSON-RPC endpoint: a local development node.
pub const DEFAULT_NODE_URL: &str = "http://localhost:8545";
/// Default per-request timeout in seconds.
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;
/// Default wait for a transaction receipt in seconds.
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;
/// Default receipt polling interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Configuration for [`crate::EvmLedger`].
///
/// Custom `Debug` implementation prints only the origin of `rpc_url`;
/// hosted node URLs commonly carry an API key in the path.
#[derive(Clone)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint of the node.
    pub rpc_url: Url,
    /// Deployed contract address (`0x` + 40 hex digits).
    pub contract_address: String,
    /// The contract method that stores the hash.
    pub interface: ContractInterface,
    /// Per-request timeout in seconds.
    pub rpc_timeout_secs: u64,
    /// How long to wait for a receipt after the transaction is accepted.
    pub receipt_timeout: Duration,
    /// Delay between receipt polls.
    pub poll_interval: Duration,
}

impl std::fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("rpc_url", &self.rpc_url.origin().ascii_serialization())
            .field("contract_address", &self.contract_address)
            .field("method", &self.interface.method())
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .field("receipt_timeout", &self.receipt_timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl LedgerConfig {
    /// Configuration for `contract_address` behind `rpc_url`, calling
    /// `storeHash(string)` with default timeouts.
    pub fn new(rpc_url: Url, contract_address: impl Into<String>) -> Result<Self, ConfigError> {
        let contract_address = contract_address.into();
        if !is_valid_eth_address(&contract_address) {
            return Err(ConfigError::InvalidContractAddress(contract_address));
        }
        Ok(Self {
            rpc_url,
            contract_address,
            interface: ContractInterface::store_hash(),
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            receipt_timeout: Duration::from_secs(DEFAULT_RECEIPT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        })
    }

    /// Parse the node URL from a string.
    pub fn from_url(raw: &str, contract_address: impl Into<String>) -> Result<Self, ConfigError> {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;
        Self::new(url, contract_address)
    }

    /// Call a different contract method.
    pub fn with_interface(mut self, interface: ContractInterface) -> Self {
        self.interface = interface;
        self
    }

    /// Set the receipt wait and polling interval.
    pub fn with_receipt_polling(mut self, timeout: Duration, interval: Duration) -> Self {
        self.receipt_timeout = timeout;
        self.poll_interval = interval;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `BLOCKCHAIN_NODE_URL` (default: `http://localhost:8545`)
    /// - `SMART_CONTRACT_ADDRESS` (required)
    /// - `SMART_CONTRACT_ABI` (optional; a path to a JSON ABI file, or
    ///   the JSON itself)
    /// - `SMART_CONTRACT_METHOD` (default: `storeHash`; must be a Solidity
    ///   identifier)
    /// - `LEDGER_RPC_TIMEOUT_SECS` (default: 30)
    /// - `LEDGER_RECEIPT_TIMEOUT_SECS` (default: 120)
    /// - `LEDGER_POLL_INTERVAL_MS` (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LedgerConfig::from_env`] with a caller-supplied variable
    /// source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let node_url =
            lookup("BLOCKCHAIN_NODE_URL").unwrap_or_else(|| DEFAULT_NODE_URL.to_string());
        let rpc_url = Url::parse(&node_url)
            .map_err(|e| ConfigError::InvalidUrl("BLOCKCHAIN_NODE_URL".into(), e.to_string()))?;
        if rpc_url.scheme() != "http" && rpc_url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(
                "BLOCKCHAIN_NODE_URL".into(),
                format!("unsupported scheme {:?}", rpc_url.scheme()),
            ));
        }

        let contract_address = lookup("SMART_CONTRACT_ADDRESS")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("SMART_CONTRACT_ADDRESS"))?;

        let method =
            lookup("SMART_CONTRACT_METHOD").unwrap_or_else(|| DEFAULT_METHOD.to_string());
        if !is_valid_method_name(&method) {
            return Err(AbiError::InvalidMethodName(method).into());
        }
        let interface = match lookup("SMART_CONTRACT_ABI") {
            Some(source) => ContractInterface::from_abi_json(&read_abi(&source)?, &method)?,
            None => ContractInterface::for_method(&method),
        };

        let rpc_timeout_secs =
            parse_number(&lookup, "LEDGER_RPC_TIMEOUT_SECS", DEFAULT_RPC_TIMEOUT_SECS)?;
        let receipt_secs =
            parse_number(&lookup, "LEDGER_RECEIPT_TIMEOUT_SECS", DEFAULT_RECEIPT_TIMEOUT_SECS)?;
        let poll_ms = parse_number(&lookup, "LEDGER_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        if poll_ms == 0 {
            return Err(ConfigError::InvalidNumber(
                "LEDGER_POLL_INTERVAL_MS".into(),
                "0".into(),
            ));
        }

        let mut config = Self::new(rpc_url, contract_address)?
            .with_interface(interface)
            .with_receipt_polling(
                Duration::from_secs(receipt_secs),
                Duration::from_millis(poll_ms),
            );
        config.rpc_timeout_secs = rpc_timeout_secs;
        Ok(config)
    }
}

fn parse_number<F>(lookup: &F, var: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw)),
        None => Ok(default),
    }
}

// Inline JSON always starts with `[`; anything else is a path.
fn read_abi(source: &str) -> Result<String, ConfigError> {
    if source.trim_start().starts_with('[') {
        return Ok(source.to_string());
    }
    std::fs::read_to_string(source).map_err(|e| ConfigError::AbiUnreadable {
        path: source.to_string(),
        reason: e.to_string(),
    })
}

/// Whether `addr` is a well-formed Ethereum address (`0x` + 40 hex chars).
pub fn is_valid_eth_address(addr: &str) -> bool {
    addr.len() == 42
        && addr.starts_with("0x")
        && addr[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid contract address {0:?}: expected 0x followed by 40 hex digits")]
    InvalidContractAddress(String),
    #[error("{0} must be a non-negative integer, got {1:?}")]
    InvalidNumber(String, String),
    #[error("cannot read contract ABI from {path}: {reason}")]
    AbiUnreadable { path: String, reason: String },
    #[error(transparent)]
    Abi(#[from] AbiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn valid_eth_addresses() {
        assert!(is_valid_eth_address("0x0000000000000000000000000000000000000000"));
        assert!(is_valid_eth_address(CONTRACT));
    }

    #[test]
    fn invalid_eth_addresses() {
        assert!(!is_valid_eth_address(""));
        assert!(!is_valid_eth_address("0x"));
        assert!(!is_valid_eth_address("0xabc"));
        assert!(!is_valid_eth_address("5FbDB2315678afecb367f032d93F642f64180aa3aa"));
        assert!(!is_valid_eth_address("0xGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG"));
    }

    #[test]
    fn requires_contract_address() {
        let err = LedgerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("SMART_CONTRACT_ADDRESS"));

        let err =
            LedgerConfig::from_lookup(lookup(&[("SMART_CONTRACT_ADDRESS", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("SMART_CONTRACT_ADDRESS"));
    }

    #[test]
    fn rejects_malformed_contract_address() {
        let err =
            LedgerConfig::from_lookup(lookup(&[("SMART_CONTRACT_ADDRESS", "0x123")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidContractAddress("0x123".into()));
    }

    #[test]
    fn defaults() {
        let cfg =
            LedgerConfig::from_lookup(lookup(&[("SMART_CONTRACT_ADDRESS", CONTRACT)])).unwrap();
        assert_eq!(cfg.rpc_url.as_str(), "http://localhost:8545/");
        assert_eq!(cfg.interface, ContractInterface::store_hash());
        assert_eq!(cfg.rpc_timeout_secs, 30);
        assert_eq!(cfg.receipt_timeout, Duration::from_secs(120));
        assert_eq!(cfg.poll_interval, Duration::from_millis(1000));
    }

    #[test]
    fn overrides_timeouts() {
        let cfg = LedgerConfig::from_lookup(lookup(&[
            ("SMART_CONTRACT_ADDRESS", CONTRACT),
            ("BLOCKCHAIN_NODE_URL", "https://rpc.example.org/v3/key"),
            ("LEDGER_RECEIPT_TIMEOUT_SECS", "10"),
            ("LEDGER_POLL_INTERVAL_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(cfg.receipt_timeout, Duration::from_secs(10));
        assert_eq!(cfg.poll_interval, Duration::from_millis(250));

        let debug = format!("{cfg:?}");
        assert!(debug.contains("https://rpc.example.org"));
        assert!(!debug.contains("/v3/key"));
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let err = LedgerConfig::from_lookup(lookup(&[
            ("SMART_CONTRACT_ADDRESS", CONTRACT),
            ("LEDGER_POLL_INTERVAL_MS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber(ref var, _) if var == "LEDGER_POLL_INTERVAL_MS"
        ));
    }

    #[test]
    fn rejects_non_http_node_url() {
        let err = LedgerConfig::from_lookup(lookup(&[
            ("SMART_CONTRACT_ADDRESS", CONTRACT),
            ("BLOCKCHAIN_NODE_URL", "ws://localhost:8546"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(..)));
    }

    #[test]
    fn loads_abi_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let abi = r#"[{"type":"function","name":"recordHash",
            "inputs":[{"name":"h","type":"string"}]}]"#;
        file.write_all(abi.as_bytes()).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cfg = LedgerConfig::from_lookup(lookup(&[
            ("SMART_CONTRACT_ADDRESS", CONTRACT),
            ("SMART_CONTRACT_ABI", &path),
            ("SMART_CONTRACT_METHOD", "recordHash"),
        ]))
        .unwrap();
        assert_eq!(cfg.interface.method(), "recordHash");
    }

    #[test]
    fn abi_without_method_fails_at_startup() {
        let err = LedgerConfig::from_lookup(lookup(&[
            ("SMART_CONTRACT_ADDRESS", CONTRACT),
            ("SMART_CONTRACT_ABI", r#"[{"type":"function","name":"other","inputs":[]}]"#),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Abi(AbiError::MethodNotFound("storeHash".into())));
    }

    #[test]
    fn rejects_malformed_method_name() {
        for method in ["", "store hash", "storeHash(string)", "1store"] {
            let err = LedgerConfig::from_lookup(lookup(&[
                ("SMART_CONTRACT_ADDRESS", CONTRACT),
                ("SMART_CONTRACT_METHOD", method),
            ]))
            .unwrap_err();
            assert_eq!(err, ConfigError::Abi(AbiError::InvalidMethodName(method.into())));
        }
    }

    #[test]
    fn missing_abi_file_is_reported() {
        let err = LedgerConfig::from_lookup(lookup(&[
            ("SMART_CONTRACT_ADDRESS", CONTRACT),
            ("SMART_CONTRACT_ABI", "/nonexistent/contract.abi.json"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::AbiUnreadable { .. }));
    }
}
