//! Pipeline options.

/// Behavioural switches for [`crate::SubmissionPipeline`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Ask the content store whether it holds the returned address before
    /// writing it to the ledger.
    pub verify_stored: bool,
}

impl PipelineOptions {
    /// Load options from environment variables.
    ///
    /// Variables:
    /// - `FILEANCHOR_VERIFY_STORED` (default: `false`; accepts
    ///   `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PipelineOptions::from_env`] with a caller-supplied
    /// variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let verify_stored = match lookup("FILEANCHOR_VERIFY_STORED") {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| ConfigError::InvalidFlag("FILEANCHOR_VERIFY_STORED".into(), raw))?,
            None => false,
        };
        Ok(Self { verify_stored })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be a boolean flag, got {1:?}")]
    InvalidFlag(String, String),
}
