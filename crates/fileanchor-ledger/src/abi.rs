//! # Contract Interface
//!
//! Locates the hash-storing method in a contract's JSON ABI and encodes
//! calls to it.
//!
//! The method must take exactly one `string` argument, e.g.
//!
//! ```solidity
//! function storeHash(string memory hash) public;
//! ```
//!
//! Calldata layout for `f(string)` per the Solidity ABI:
//!
//! | Bytes | Content |
//! |-------|---------|
//! | 0..4 | selector: first 4 bytes of Keccak-256 of the signature |
//! | 4..36 | offset of the string data, always `0x20` |
//! | 36..68 | string length in bytes |
//! | 68.. | UTF-8 bytes, right-padded with zeros to a 32-byte multiple |

use serde::Deserialize;
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Method called when no ABI is configured.
pub const DEFAULT_METHOD: &str = "storeHash";

/// Errors from interpreting a contract ABI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// The ABI is not a JSON array of entries.
    #[error("malformed contract ABI: {0}")]
    Malformed(String),

    /// No function with the requested name.
    #[error("contract ABI has no function named {0:?}")]
    MethodNotFound(String),

    /// The method name is not a Solidity identifier.
    #[error("invalid contract method name {0:?}")]
    InvalidMethodName(String),

    /// The function exists but not with a single `string` parameter.
    #[error(
        "contract function {method:?} must take exactly one string argument, found ({found})"
    )]
    UnsupportedInputs {
        /// Requested method name.
        method: String,
        /// Comma-separated input types of the first overload found.
        found: String,
    },
}

#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
}

#[derive(Debug, Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    ty: String,
}

// Solidity ABI JSON allows `type` to be omitted for functions.
fn function_type() -> String {
    "function".to_string()
}

/// The contract method that records a content address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInterface {
    method: String,
    selector: [u8; 4],
}

impl ContractInterface {
    /// Interface for `storeHash(string)`.
    pub fn store_hash() -> Self {
        Self::for_method(DEFAULT_METHOD)
    }

    /// Interface for `<method>(string)` without consulting an ABI.
    pub fn for_method(method: &str) -> Self {
        let signature = format!("{method}(string)");
        let hash = keccak256(signature.as_bytes());
        Self {
            method: method.to_string(),
            selector: [hash[0], hash[1], hash[2], hash[3]],
        }
    }

    /// Locate `method` in a JSON ABI.
    ///
    /// Overloads are allowed; the one taking a single `string` is chosen.
    pub fn from_abi_json(abi: &str, method: &str) -> Result<Self, AbiError> {
        let entries: Vec<AbiEntry> =
            serde_json::from_str(abi).map_err(|e| AbiError::Malformed(e.to_string()))?;

        let candidates: Vec<&AbiEntry> = entries
            .iter()
            .filter(|e| e.kind == "function" && e.name == method)
            .collect();
        let first = candidates
            .first()
            .ok_or_else(|| AbiError::MethodNotFound(method.to_string()))?;

        let accepts_string = |e: &&AbiEntry| e.inputs.len() == 1 && e.inputs[0].ty == "string";
        if candidates.iter().any(accepts_string) {
            Ok(Self::for_method(method))
        } else {
            Err(AbiError::UnsupportedInputs {
                method: method.to_string(),
                found: first
                    .inputs
                    .iter()
                    .map(|p| p.ty.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            })
        }
    }

    /// The method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Canonical signature, e.g. `storeHash(string)`.
    pub fn signature(&self) -> String {
        format!("{}(string)", self.method)
    }

    /// The 4-byte function selector.
    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    /// ABI-encoded calldata for calling the method with `value`.
    pub fn encode_call(&self, value: &str) -> Vec<u8> {
        let data = value.as_bytes();
        let padded_len = data.len().div_ceil(32) * 32;
        let mut out = Vec::with_capacity(4 + 64 + padded_len);
        out.extend_from_slice(&self.selector);
        out.extend_from_slice(&u256_word(32));
        out.extend_from_slice(&u256_word(data.len() as u64));
        out.extend_from_slice(data);
        out.resize(4 + 64 + padded_len, 0);
        out
    }

    /// [`ContractInterface::encode_call`] as a `0x`-prefixed hex string,
    /// the form JSON-RPC expects in a transaction's `data` field.
    pub fn encode_call_hex(&self, value: &str) -> String {
        format!("0x{}", hex::encode(self.encode_call(value)))
    }
}

impl Default for ContractInterface {
    fn default() -> Self {
        Self::store_hash()
    }
}

/// Whether `name` is a Solidity identifier: `[A-Za-z_$][A-Za-z0-9_$]*`.
pub fn is_valid_method_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Keccak-256 as used by Ethereum (not NIST SHA3-256).
pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

fn u256_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}
