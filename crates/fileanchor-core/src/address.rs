//! # Content Address
//!
//! The identifier a content-addressed store hands back for a blob. The
//! value is opaque to fileanchor (an IPFS CID, a test digest, ...); only
//! its shape is checked so that a garbage response is never written to
//! the ledger.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest address accepted. CIDv1 strings with large multihashes stay
/// well below this.
pub const MAX_ADDRESS_LEN: usize = 256;

/// Reasons a string is not a usable content address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The address is empty.
    #[error("content address is empty")]
    Empty,

    /// The address exceeds [`MAX_ADDRESS_LEN`] bytes.
    #[error("content address is {len} bytes, maximum is {MAX_ADDRESS_LEN}")]
    TooLong {
        /// Actual length in bytes.
        len: usize,
    },

    /// The address contains whitespace or a control character.
    #[error("content address contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A content-derived identifier returned by a content-addressed store.
///
/// Two uploads of identical bytes to the same store yield equal
/// addresses. Construct through [`ContentAddress::new`], which rejects
/// empty, oversized, or whitespace-bearing values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentAddress(String);

impl ContentAddress {
    /// Validate and wrap a store-issued address.
    pub fn new(value: impl Into<String>) -> Result<Self, AddressError> {
        let value = value.into();
        if value.is_empty() {
            return Err(AddressError::Empty);
        }
        if value.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::TooLong { len: value.len() });
        }
        if let Some(c) = value
            .chars()
            .find(|c| c.is_whitespace() || c.is_control())
        {
            return Err(AddressError::InvalidCharacter(c));
        }
        Ok(Self(value))
    }

    /// Build an address from a raw digest: `prefix` followed by the
    /// lowercase hex of `digest`. Used by stores that derive addresses
    /// locally.
    pub fn from_digest(prefix: char, digest: &[u8]) -> Self {
        Self(format!("{prefix}{}", hex::encode(digest)))
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContentAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentAddress> for String {
    fn from(address: ContentAddress) -> Self {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_cid_v0_and_v1() {
        assert!(ContentAddress::new("QmT78zSuBmuS4z925WZfrqQ1qHaJ56DQaTfyMUF7F8ff5o").is_ok());
        assert!(ContentAddress::new(
            "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi"
        )
        .is_ok());
        assert!(ContentAddress::new("Qm123").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(ContentAddress::new(""), Err(AddressError::Empty));
    }

    #[test]
    fn rejects_whitespace() {
        assert_eq!(
            ContentAddress::new("Qm 123"),
            Err(AddressError::InvalidCharacter(' '))
        );
        assert_eq!(
            ContentAddress::new("Qm123\n"),
            Err(AddressError::InvalidCharacter('\n'))
        );
    }

    #[test]
    fn rejects_oversized() {
        let long = "a".repeat(MAX_ADDRESS_LEN + 1);
        assert_eq!(
            ContentAddress::new(long),
            Err(AddressError::TooLong {
                len: MAX_ADDRESS_LEN + 1
            })
        );
    }

    #[test]
    fn from_digest_renders_hex() {
        let addr = ContentAddress::from_digest('b', &[0xab, 0x01]);
        assert_eq!(addr.as_str(), "bab01");
        assert_eq!(ContentAddress::new(addr.as_str()), Ok(addr));
    }

    #[test]
    fn serde_rejects_invalid_address() {
        let ok: ContentAddress = serde_json::from_str("\"Qm123\"").unwrap();
        assert_eq!(ok.as_str(), "Qm123");
        assert!(serde_json::from_str::<ContentAddress>("\"\"").is_err());
    }
}
