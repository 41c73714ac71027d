//! # IPFS HTTP API Client
//!
//! Uploads files through the `/api/v0/add` endpoint of an IPFS node or a
//! hosted API (Infura, a local Kubo daemon, ...).
//!
//! ## Endpoints
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/v0/add?pin=true` | Upload a multipart `file` part, returns `{Name, Hash, Size}` |
//! | POST   | `/api/v0/block/stat?arg=<cid>` | Check whether the node holds the block |
//!
//! ## Error Mapping
//!
//! - transport failure, timeout, or a 5xx without an IPFS error body ⇒
//!   [`StoreError::Unavailable`]
//! - an IPFS error body (`{"Message": ..}`), any 4xx, or a malformed
//!   success body ⇒ [`StoreError::Rejected`]
//!
//! `block/stat` answers `false` only for an IPFS error saying the block is
//! missing or the CID does not parse. Auth failures and other errors are
//! returned as errors.

use std::time::Duration;

use async_trait::async_trait;
use fileanchor_core::{ContentAddress, FileHandle};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::client::ContentStoreClient;
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Successful `/api/v0/add` response.
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "Size", default)]
    size: Option<String>,
}

/// Error body IPFS returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct IpfsErrorBody {
    #[serde(rename = "Message")]
    message: String,
}

/// Content store client for the IPFS HTTP API.
#[derive(Debug, Clone)]
pub struct IpfsHttpStore {
    client: reqwest::Client,
    config: StoreConfig,
}

impl IpfsHttpStore {
    /// Create a client from configuration.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                StoreError::unavailable("client_init", format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client, config })
    }

    /// The configured API base URL.
    pub fn api_url(&self) -> &Url {
        &self.config.api_url
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match (&self.config.project_id, &self.config.project_secret) {
            (Some(id), Some(secret)) => request.basic_auth(id, Some(secret)),
            _ => request,
        }
    }

    fn endpoint_url(&self, name: &str, query: &[(&str, &str)]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.config.endpoint(name))
            .map_err(|e| StoreError::rejected(name, format!("invalid endpoint URL: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Send a request with credentials attached, mapping only transport
    /// failures.
    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<reqwest::Response, StoreError> {
        self.with_auth(request).send().await.map_err(|e| {
            if e.is_timeout() {
                let reason = format!("request timed out after {}s", self.config.timeout_secs);
                StoreError::unavailable(operation, reason)
            } else {
                StoreError::unavailable(operation, e.to_string())
            }
        })
    }

    /// Send a request and split the outcome into a success body or a
    /// mapped error.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<reqwest::Response, StoreError> {
        let resp = self.dispatch(request, operation).await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(error_for_status(operation, status, &body))
    }
}

fn error_for_status(operation: &str, status: reqwest::StatusCode, body: &str) -> StoreError {
    if let Ok(err) = serde_json::from_str::<IpfsErrorBody>(body) {
        return StoreError::rejected(operation, format!("HTTP {status}: {}", err.message));
    }
    if status.is_client_error() {
        StoreError::rejected(operation, format!("HTTP {status}: {body}"))
    } else {
        StoreError::unavailable(operation, format!("HTTP {status}: {body}"))
    }
}

/// Whether an IPFS command error means the block is not there.
fn is_missing_block(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["not found", "could not find", "invalid cid", "invalid path"]
        .iter()
        .any(|needle| message.contains(needle))
}

#[async_trait]
impl ContentStoreClient for IpfsHttpStore {
    async fn put(&self, file: &FileHandle) -> Result<ContentAddress, StoreError> {
        let url = self.endpoint_url("add", &[("pin", "true")])?;
        let part =
            reqwest::multipart::Part::bytes(file.bytes().to_vec()).file_name(file.file_name());
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self.send(self.client.post(url).multipart(form), "add").await?;
        let body = resp
            .text()
            .await
            .map_err(|e| StoreError::unavailable("add", format!("failed to read response: {e}")))?;

        // IPFS streams one JSON object per added entry; with a single file
        // and no wrapping directory the last line is the file itself.
        let line = body
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| StoreError::rejected("add", "empty response body"))?;
        let added: AddResponse = serde_json::from_str(line)
            .map_err(|e| StoreError::rejected("add", format!("malformed response: {e}")))?;

        let address = ContentAddress::new(added.hash)
            .map_err(|e| StoreError::rejected("add", format!("invalid content address: {e}")))?;

        debug!(
            name = %added.name,
            size = ?added.size,
            %address,
            "IPFS add complete"
        );
        Ok(address)
    }

    async fn contains(&self, address: &ContentAddress) -> Result<bool, StoreError> {
        const OP: &str = "block/stat";
        let url = self.endpoint_url(OP, &[("arg", address.as_str())])?;
        let resp = self.dispatch(self.client.post(url), OP).await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }

        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<IpfsErrorBody>(&body) {
            Ok(err) if status.is_server_error() && is_missing_block(&err.message) => {
                debug!(%address, reason = %err.message, "block not held by store");
                Ok(false)
            }
            _ => Err(error_for_status(OP, status, &body)),
        }
    }
}
