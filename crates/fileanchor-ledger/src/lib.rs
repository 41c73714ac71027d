//! # fileanchor-ledger — Ledger Clients
//!
//! The [`LedgerClient`] trait records a content address on a ledger and
//! returns the ledger's receipt. Implementations:
//!
//! - [`EvmLedger`] calls a contract method on an EVM-compatible chain via
//!   JSON-RPC (`eth_sendTransaction`, then `eth_getTransactionReceipt`
//!   polling). Signing and gas estimation are delegated to the node.
//! - [`MemoryLedger`] records submissions in process memory.
//!
//! [`ContractInterface`] turns the contract's ABI description into
//! calldata for the one-string-argument method that stores the hash.
//!
//! ## Side Effects
//!
//! A successful [`EvmLedger`] submission is an irreversible, fee-incurring
//! write. No client here retries.

pub mod abi;
pub mod client;
pub mod config;
pub mod error;
pub mod evm;
pub mod memory;

pub use abi::{is_valid_method_name, AbiError, ContractInterface};
pub use client::LedgerClient;
pub use config::{is_valid_eth_address, ConfigError, LedgerConfig};
pub use error::LedgerError;
pub use evm::EvmLedger;
pub use memory::MemoryLedger;
