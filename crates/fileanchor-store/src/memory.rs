//! In-memory content store.
//!
//! Addresses are `b` followed by the lowercase hex SHA-256 of the content,
//! so the content-addressing invariant holds by construction. Useful for
//! dry runs and as a test double with fault injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use fileanchor_core::{ContentAddress, FileHandle};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::client::ContentStoreClient;
use crate::error::StoreError;

/// A content store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<ContentAddress, Vec<u8>>>,
    injected: Mutex<Option<StoreError>>,
    puts: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The address this store assigns to `bytes`.
    pub fn address_of(bytes: &[u8]) -> ContentAddress {
        ContentAddress::from_digest('b', &Sha256::digest(bytes))
    }

    /// Make the next `put` fail with `err`. The failing call does not
    /// store anything.
    pub fn fail_next_with(&self, err: StoreError) {
        *self.injected.lock() = Some(err);
    }

    /// Number of `put` calls received, failed ones included.
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::SeqCst)
    }

    /// Stored content for `address`.
    pub fn get(&self, address: &ContentAddress) -> Option<Vec<u8>> {
        self.objects.lock().get(address).cloned()
    }

    /// Number of distinct objects held.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentStoreClient for MemoryStore {
    async fn put(&self, file: &FileHandle) -> Result<ContentAddress, StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.injected.lock().take() {
            return Err(err);
        }
        let address = Self::address_of(file.bytes());
        self.objects
            .lock()
            .entry(address.clone())
            .or_insert_with(|| file.bytes().to_vec());
        Ok(address)
    }

    async fn contains(&self, address: &ContentAddress) -> Result<bool, StoreError> {
        Ok(self.objects.lock().contains_key(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn identical_bytes_share_an_address() {
        let store = MemoryStore::new();
        let a = store.put(&FileHandle::new("a.txt", b"same".to_vec())).await.unwrap();
        let b = store.put(&FileHandle::new("b.txt", b"same".to_vec())).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        assert_eq!(store.put_count(), 2);
        assert!(store.contains(&a).await.unwrap());
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let store = MemoryStore::new();
        store.fail_next_with(StoreError::Unavailable {
            endpoint: "memory".into(),
            reason: "offline".into(),
        });
        let file = FileHandle::new("a.txt", b"x".to_vec());
        assert!(store.put(&file).await.is_err());
        assert!(store.is_empty());
        assert!(store.put(&file).await.is_ok());
    }

    #[test]
    fn address_has_expected_shape() {
        let addr = MemoryStore::address_of(b"hello-world");
        assert!(addr.as_str().starts_with('b'));
        assert_eq!(addr.as_str().len(), 65);
    }

    proptest! {
        #[test]
        fn address_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 1..512)) {
            prop_assert_eq!(MemoryStore::address_of(&bytes), MemoryStore::address_of(&bytes));
        }

        #[test]
        fn distinct_content_yields_distinct_address(
            a in proptest::collection::vec(any::<u8>(), 1..64),
            b in proptest::collection::vec(any::<u8>(), 1..64),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(MemoryStore::address_of(&a), MemoryStore::address_of(&b));
        }
    }
}
