//! # Submission Pipeline
//!
//! Orchestrates read → store → record for one file at a time. The store
//! and ledger clients are generic so tests can substitute recording or
//! fault-injecting doubles.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use fileanchor_core::{
    ContentAddress, FileHandle, LedgerReceipt, LifecycleBus, LifecycleEvent, SenderIdentity,
    Stage, SubmissionError, SubmissionId,
};
use fileanchor_ledger::LedgerClient;
use fileanchor_store::ContentStoreClient;
use tracing::Instrument;

use crate::options::PipelineOptions;
use crate::state::PipelineState;

/// Drives files through a content store and onto a ledger.
///
/// `submit` takes `&self`; independent submissions may run concurrently.
/// The pipeline keeps no state between calls: a retry re-reads and
/// re-uploads the file.
#[derive(Debug)]
pub struct SubmissionPipeline<S, L> {
    store: S,
    ledger: L,
    bus: Arc<LifecycleBus>,
    options: PipelineOptions,
}

/// Per-call state tracker.
struct Run {
    id: SubmissionId,
    state: PipelineState,
}

impl Run {
    fn new() -> Self {
        Self {
            id: SubmissionId::new(),
            state: PipelineState::Idle,
        }
    }

    /// An illegal edge is logged and leaves the state unchanged.
    fn advance(&mut self, next: PipelineState) {
        match self.state.transition(next) {
            Ok(state) => {
                tracing::trace!(from = %self.state, to = %state, "pipeline transition");
                self.state = state;
            }
            Err(e) => tracing::error!(submission = %self.id, error = %e, "state not advanced"),
        }
    }
}

impl<S, L> SubmissionPipeline<S, L>
where
    S: ContentStoreClient,
    L: LedgerClient,
{
    /// Build a pipeline publishing on `bus` with default options.
    pub fn new(store: S, ledger: L, bus: Arc<LifecycleBus>) -> Self {
        Self {
            store,
            ledger,
            bus,
            options: PipelineOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// The bus events are published on.
    pub fn bus(&self) -> &Arc<LifecycleBus> {
        &self.bus
    }

    /// The content store client.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The ledger client.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The active options.
    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Read the file at `path`, upload it, and record its content address
    /// on the ledger on behalf of `sender`.
    ///
    /// Publishes `ReadComplete`, `StoreComplete` and `LedgerComplete` as
    /// each step succeeds. On failure publishes a single `Failed` event
    /// and returns the same error.
    ///
    /// # Errors
    ///
    /// - [`SubmissionError::InvalidInput`] for an empty path or sender;
    ///   nothing is read or sent.
    /// - [`SubmissionError::FileUnreadable`] if the file cannot be read.
    /// - `StoreUnavailable` / `StoreRejected` if the upload fails; the
    ///   ledger is not called.
    /// - `LedgerUnavailable` / `LedgerRejected` / `Timeout` if recording
    ///   fails; the `Failed` event carries the stored address.
    pub async fn submit(
        &self,
        path: impl AsRef<Path>,
        sender: &str,
    ) -> Result<LedgerReceipt, SubmissionError> {
        let run = Run::new();
        let span = tracing::info_span!("submission", submission_id = %run.id);
        let started = Instant::now();

        let result = self.run(run, path.as_ref(), sender).instrument(span).await;

        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!("fileanchor_submissions_total", "outcome" => outcome).increment(1);
        metrics::histogram!("fileanchor_submission_duration_seconds", "outcome" => outcome)
            .record(started.elapsed().as_secs_f64());
        result
    }

    async fn run(
        &self,
        mut run: Run,
        path: &Path,
        sender: &str,
    ) -> Result<LedgerReceipt, SubmissionError> {
        if path.as_os_str().is_empty() {
            let err = SubmissionError::InvalidInput("file path is empty".into());
            return Err(self.fail(&mut run, Stage::Idle, err, None));
        }
        let Some(sender) = SenderIdentity::new(sender) else {
            let err = SubmissionError::InvalidInput("sender identity is empty".into());
            return Err(self.fail(&mut run, Stage::Idle, err, None));
        };

        run.advance(PipelineState::Reading);
        let file = match FileHandle::load(path).await {
            Ok(file) => file,
            Err(e) => {
                let err = SubmissionError::file_unreadable(path, &e);
                return Err(self.fail(&mut run, Stage::Reading, err, None));
            }
        };
        tracing::debug!(path = %path.display(), size = file.size(), "file loaded");
        self.bus.publish(&LifecycleEvent::ReadComplete {
            path: file.path().to_path_buf(),
            size: file.size(),
        });

        run.advance(PipelineState::Storing);
        let address = match self.store.put(&file).await {
            Ok(address) => address,
            Err(e) => return Err(self.fail(&mut run, Stage::Storing, e.into(), None)),
        };
        drop(file);
        if self.options.verify_stored {
            self.verify_stored(&mut run, &address).await?;
        }
        self.bus.publish(&LifecycleEvent::StoreComplete {
            address: address.clone(),
        });

        run.advance(PipelineState::Recording);
        let receipt = match self.ledger.submit(&address, &sender).await {
            Ok(receipt) => receipt,
            Err(e) => {
                return Err(self.fail(&mut run, Stage::Recording, e.into(), Some(address)));
            }
        };
        if !receipt.status.is_success() {
            let err = SubmissionError::LedgerRejected(format!(
                "transaction {} reverted",
                receipt.tx_id
            ));
            return Err(self.fail(&mut run, Stage::Recording, err, Some(address)));
        }
        self.bus.publish(&LifecycleEvent::LedgerComplete {
            receipt: receipt.clone(),
        });

        run.advance(PipelineState::Done);
        Ok(receipt)
    }

    async fn verify_stored(
        &self,
        run: &mut Run,
        address: &ContentAddress,
    ) -> Result<(), SubmissionError> {
        match self.store.contains(address).await {
            Ok(true) => {
                tracing::debug!(%address, "store confirmed address");
                Ok(())
            }
            Ok(false) => {
                let err = SubmissionError::StoreRejected(format!(
                    "store does not hold {address} after upload"
                ));
                Err(self.fail(run, Stage::Storing, err, Some(address.clone())))
            }
            Err(e) => Err(self.fail(run, Stage::Storing, e.into(), Some(address.clone()))),
        }
    }

    /// Move to `Failed(stage)`, publish the failure, and hand the error back
    /// for returning.
    fn fail(
        &self,
        run: &mut Run,
        stage: Stage,
        error: SubmissionError,
        address: Option<ContentAddress>,
    ) -> SubmissionError {
        run.advance(PipelineState::Failed(stage));
        metrics::counter!("fileanchor_submission_failures_total", "stage" => stage.as_str())
            .increment(1);
        self.bus.publish(&LifecycleEvent::Failed {
            stage,
            error: error.clone(),
            address,
        });
        error
    }
}
