//! The content store client seam.

use async_trait::async_trait;
use fileanchor_core::{ContentAddress, FileHandle};

use crate::error::StoreError;

/// A client for a content-addressed store.
///
/// ## Contract
///
/// - `put` transmits the full file content and returns the address the
///   store derived from it. Identical bytes yield identical addresses for
///   as long as the store keeps its hashing scheme.
/// - Implementations do not retry.
#[async_trait]
pub trait ContentStoreClient: Send + Sync {
    /// Upload `file` and return its content address.
    async fn put(&self, file: &FileHandle) -> Result<ContentAddress, StoreError>;

    /// Whether the store currently holds the object at `address`.
    async fn contains(&self, address: &ContentAddress) -> Result<bool, StoreError>;
}

#[async_trait]
impl<T> ContentStoreClient for std::sync::Arc<T>
where
    T: ContentStoreClient + ?Sized,
{
    async fn put(&self, file: &FileHandle) -> Result<ContentAddress, StoreError> {
        (**self).put(file).await
    }

    async fn contains(&self, address: &ContentAddress) -> Result<bool, StoreError> {
        (**self).contains(address).await
    }
}
