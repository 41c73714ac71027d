//! # fileanchor-core — Foundational Types
//!
//! Shared vocabulary for every fileanchor crate:
//!
//! - [`FileHandle`] — a file's path and bytes, loaded once.
//! - [`ContentAddress`] — the identifier a content-addressed store returns.
//! - [`SenderIdentity`] — the ledger account a record is submitted from.
//! - [`LedgerReceipt`] — the ledger's confirmation of a recorded address.
//! - [`SubmissionError`] and [`Stage`] — the failure taxonomy.
//! - [`LifecycleEvent`] and [`LifecycleBus`] — progress notifications
//!   delivered to pluggable observers such as [`LogSubscriber`].
//!
//! ## Crate Policy
//!
//! This crate performs no network I/O. Store and ledger adapters live in
//! `fileanchor-store` and `fileanchor-ledger`; orchestration lives in
//! `fileanchor-pipeline`.

pub mod address;
pub mod bus;
pub mod error;
pub mod event;
pub mod file;
pub mod identity;
pub mod log;
pub mod receipt;

pub use address::{AddressError, ContentAddress};
pub use bus::{HandlerError, LifecycleBus, LifecycleHandler, SubscriptionId};
pub use error::{Stage, SubmissionError};
pub use event::{EventKind, LifecycleEvent};
pub use file::FileHandle;
pub use identity::{SenderIdentity, SubmissionId};
pub use log::LogSubscriber;
pub use receipt::{LedgerReceipt, TxStatus};
