//! # fileanchor-cli — Library Surface
//!
//! Configuration loading, pipeline assembly, exit-code mapping, and output
//! rendering for the `fileanchor` binary. Kept in a library so the pieces
//! can be tested without spawning a process.

pub mod config;
pub mod exit;
pub mod submit;

pub use config::AppConfig;
pub use exit::exit_code;
pub use submit::{build_pipeline, render_receipt, HttpPipeline};
