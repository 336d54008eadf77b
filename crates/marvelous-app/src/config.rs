//! Connection settings for the remote task store.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use marvelous_store_http::HttpTaskStore;
use serde::{Deserialize, Serialize};

/// Base URL used when neither the command line nor the config file names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// `[remote]` block of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Root of the REST store; endpoints live under `{base_url}/tasks/`.
    pub base_url: String,
    /// Per-request timeout in seconds. Absent means requests wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: None,
        }
    }
}

impl RemoteConfig {
    /// Request timeout derived from `timeout_secs`.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Replace the base URL when an override (flag or environment) is present.
    #[must_use]
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        self
    }

    /// Reject settings that can never produce a working client.
    ///
    /// # Errors
    /// Fails when the base URL is blank or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("remote.base_url must not be empty");
        }
        if self.timeout_secs == Some(0) {
            bail!("remote.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Build the HTTP store these settings describe.
    ///
    /// # Errors
    /// Fails when validation fails or the base URL cannot address the task endpoints.
    pub fn connect(&self) -> Result<HttpTaskStore> {
        self.validate()?;
        HttpTaskStore::new(self.base_url.trim(), self.timeout())
            .with_context(|| format!("failed to set up task store at {}", self.base_url))
    }
}
