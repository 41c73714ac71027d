//! Process configuration, read once from the environment at startup.

use fileanchor_ledger::LedgerConfig;
use fileanchor_pipeline::PipelineOptions;
use fileanchor_store::StoreConfig;

/// Everything the binary needs to build a pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub ledger: LedgerConfig,
    pub pipeline: PipelineOptions,
}

impl AppConfig {
    /// Load all sections from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load all sections from a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            store: StoreConfig::from_lookup(&lookup)?,
            ledger: LedgerConfig::from_lookup(&lookup)?,
            pipeline: PipelineOptions::from_lookup(&lookup)?,
        })
    }
}

/// A configuration section failed to load.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("content store configuration: {0}")]
    Store(#[from] fileanchor_store::ConfigError),
    #[error("ledger configuration: {0}")]
    Ledger(#[from] fileanchor_ledger::ConfigError),
    #[error("pipeline configuration: {0}")]
    Pipeline(#[from] fileanchor_pipeline::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_contract_address_is_a_startup_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Ledger(fileanchor_ledger::ConfigError::MissingVar(
                "SMART_CONTRACT_ADDRESS"
            ))
        ));
        assert!(err.to_string().contains("SMART_CONTRACT_ADDRESS"));
    }

    #[test]
    fn loads_every_section() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("IPFS_HOST", "127.0.0.1"),
            ("IPFS_PROTOCOL", "http"),
            ("SMART_CONTRACT_ADDRESS", "0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            ("FILEANCHOR_VERIFY_STORED", "true"),
        ]))
        .unwrap();
        assert_eq!(cfg.store.api_url.as_str(), "http://127.0.0.1:5001/");
        assert_eq!(cfg.ledger.rpc_url.as_str(), "http://localhost:8545/");
        assert!(cfg.pipeline.verify_stored);
    }

    #[test]
    fn store_errors_are_labelled() {
        let err = AppConfig::from_lookup(lookup(&[
            ("IPFS_PORT", "not-a-port"),
            ("SMART_CONTRACT_ADDRESS", "0x5FbDB2315678afecb367f032d93F642f64180aa3"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Store(_)));
        assert!(err.to_string().starts_with("content store configuration"));
    }
}
