//! # Pipeline State Machine
//!
//! The five forward states and the terminal failure state of a single
//! submission. [`PipelineState::can_transition_to`] is the single source of
//! truth for legal edges.

use fileanchor_core::Stage;
use thiserror::Error;

/// A move between two states that are not joined by an edge.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("illegal pipeline transition {from} -> {to}")]
pub struct TransitionError {
    /// State the move started from.
    pub from: PipelineState,
    /// Requested state.
    pub to: PipelineState,
}

/// The state of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Validating input; no I/O yet.
    Idle,
    /// Loading the file.
    Reading,
    /// Uploading to the content store.
    Storing,
    /// Recording the address on the ledger.
    Recording,
    /// The ledger confirmed the record (terminal).
    Done,
    /// The submission failed in the given stage (terminal).
    Failed(Stage),
}

impl PipelineState {
    /// Whether this state is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    /// The stage a failure in this state is attributed to.
    ///
    /// `None` for terminal states.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Idle => Some(Stage::Idle),
            Self::Reading => Some(Stage::Reading),
            Self::Storing => Some(Stage::Storing),
            Self::Recording => Some(Stage::Recording),
            Self::Done | Self::Failed(_) => None,
        }
    }

    /// Whether `next` directly follows this state.
    ///
    /// Forward edges advance exactly one step. `Failed(stage)` is reachable
    /// from the non-terminal state matching `stage`.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        match (*self, next) {
            (Self::Idle, Self::Reading)
            | (Self::Reading, Self::Storing)
            | (Self::Storing, Self::Recording)
            | (Self::Recording, Self::Done) => true,
            (from, Self::Failed(stage)) => from.stage() == Some(stage),
            _ => false,
        }
    }

    /// The state after moving to `next`, if that edge exists.
    pub fn transition(self, next: PipelineState) -> Result<PipelineState, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Reading => f.write_str("reading"),
            Self::Storing => f.write_str("storing"),
            Self::Recording => f.write_str("recording"),
            Self::Done => f.write_str("done"),
            Self::Failed(stage) => write!(f, "failed({stage})"),
        }
    }
}
