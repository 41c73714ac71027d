//! Content store client configuration.
//!
//! Built from the `IPFS_*` environment variables at startup. Defaults
//! point at the Infura IPFS API.

use url::Url;

/// Default API host.
pub const DEFAULT_HOST: &str = "ipfs.infura.io";
/// Default API port.
pub const DEFAULT_PORT: u16 = 5001;
/// Default transport scheme.
pub const DEFAULT_PROTOCOL: &str = "https";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to an IPFS HTTP API.
///
/// Custom `Debug` implementation redacts `project_secret`.
#[derive(Clone)]
pub struct StoreConfig {
    /// Base URL of the API, e.g. `https://ipfs.infura.io:5001`.
    pub api_url: Url,
    /// Basic-auth user (Infura project id), if the API requires it.
    pub project_id: Option<String>,
    /// Basic-auth password (Infura project secret).
    pub project_secret: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_url", &self.api_url)
            .field("project_id", &self.project_id)
            .field(
                "project_secret",
                &self.project_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl StoreConfig {
    /// Point at an API base URL with no authentication and the default
    /// timeout.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            project_id: None,
            project_secret: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Parse a base URL string; convenient for tests against a mock server.
    pub fn from_url(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;
        Ok(Self::new(url))
    }

    /// Attach basic-auth credentials.
    pub fn with_credentials(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self.project_secret = Some(secret.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `IPFS_HOST` (default: `ipfs.infura.io`)
    /// - `IPFS_PORT` (default: `5001`)
    /// - `IPFS_PROTOCOL` (default: `https`; `http` or `https`)
    /// - `IPFS_PROJECT_ID` / `IPFS_PROJECT_SECRET` (optional, both or neither)
    /// - `IPFS_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with a caller-supplied variable
    /// source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("IPFS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let protocol = lookup("IPFS_PROTOCOL").unwrap_or_else(|| DEFAULT_PROTOCOL.to_string());
        if protocol != "http" && protocol != "https" {
            return Err(ConfigError::UnsupportedProtocol(protocol));
        }
        let port = match lookup("IPFS_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber("IPFS_PORT".into(), raw))?,
            None => DEFAULT_PORT,
        };
        let timeout_secs = match lookup("IPFS_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber("IPFS_TIMEOUT_SECS".into(), raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let raw = format!("{protocol}://{host}:{port}");
        let api_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl("IPFS_HOST".into(), e.to_string()))?;

        let (project_id, project_secret) =
            match (lookup("IPFS_PROJECT_ID"), lookup("IPFS_PROJECT_SECRET")) {
                (Some(id), Some(secret)) => (Some(id), Some(secret)),
                (None, None) => (None, None),
                _ => return Err(ConfigError::PartialCredentials),
            };

        Ok(Self {
            api_url,
            project_id,
            project_secret,
            timeout_secs,
        })
    }

    /// Full URL of an `/api/v0` endpoint.
    pub(crate) fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/api/v0/{name}",
            self.api_url.as_str().trim_end_matches('/')
        )
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("unsupported IPFS_PROTOCOL {0:?}: expected \"http\" or \"https\"")]
    UnsupportedProtocol(String),
    #[error("{0} must be a non-negative integer, got {1:?}")]
    InvalidNumber(String, String),
    #[error("IPFS_PROJECT_ID and IPFS_PROJECT_SECRET must be set together")]
    PartialCredentials,
}
