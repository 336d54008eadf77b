//! Error types for HTTP store operations.

use thiserror::Error;

/// Errors that can occur during `HttpTaskStore` operations.
#[derive(Error, Debug)]
pub enum HttpStoreError {
    /// The configured base URL cannot address the task endpoints.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request never produced a response (connection refused, timeout, reset).
    #[error("Request to {url} failed: {source}")]
    Network {
        /// Endpoint that was being called.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body is not the JSON shape the endpoint promises.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        /// Endpoint that was being called.
        url: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The store refused the write because it conflicts with its current state.
    #[error("Conflict reported by {url}: {body}")]
    Conflict {
        /// Endpoint that was being called.
        url: String,
        /// Response body, if any.
        body: String,
    },

    /// Any other non-success status.
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        /// Endpoint that was being called.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },
}
