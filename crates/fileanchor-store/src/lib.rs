//! # fileanchor-store — Content-Addressed Store Clients
//!
//! The [`ContentStoreClient`] trait is the pipeline's only path to a
//! content-addressed store. Two implementations ship here:
//!
//! - [`IpfsHttpStore`] talks to an IPFS node (or a hosted gateway such as
//!   Infura) through the `/api/v0` HTTP API.
//! - [`MemoryStore`] hashes content locally; used in tests and dry runs.
//!
//! Chunking, DAG layout, and pinning policy belong to the store. Retries are
//! NOT built into the clients.

pub mod client;
pub mod config;
pub mod error;
pub mod ipfs;
pub mod memory;

pub use client::ContentStoreClient;
pub use config::{ConfigError, StoreConfig};
pub use error::StoreError;
pub use ipfs::IpfsHttpStore;
pub use memory::MemoryStore;
