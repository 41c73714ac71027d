//! # fileanchor-pipeline — Submission Pipeline
//!
//! [`SubmissionPipeline`] drives one file through three sequential steps:
//!
//! ```text
//! Idle ─▶ Reading ─▶ Storing ─▶ Recording ─▶ Done
//!   │        │          │           │
//!   └────────┴──────────┴───────────┴─▶ Failed(stage)
//! ```
//!
//! Each step has its own failure, so a caller can always tell "never
//! stored" from "stored but not recorded". Progress and failures are
//! published on a [`fileanchor_core::LifecycleBus`] and every failure is
//! also returned to the caller.
//!
//! ## Metrics
//!
//! Recorded through the `metrics` facade; a no-op unless the host
//! installs a recorder.
//!
//! | Name | Kind | Labels |
//! |------|------|--------|
//! | `fileanchor_submissions_total` | counter | `outcome`: `success`, `failure` |
//! | `fileanchor_submission_failures_total` | counter | `stage` |
//! | `fileanchor_submission_duration_seconds` | histogram | `outcome` |

pub mod options;
pub mod pipeline;
pub mod state;

pub use options::{ConfigError, PipelineOptions};
pub use pipeline::SubmissionPipeline;
pub use state::{PipelineState, TransitionError};
