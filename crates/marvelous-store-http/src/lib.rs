//! HTTP-backed task storage for marvelous.
//!
//! Wraps the REST endpoints of the remote task store:
//! `GET /tasks/{status}`, `POST /tasks/`, `PUT /tasks/{id}` and `DELETE /tasks/`.

mod error;

pub use error::HttpStoreError;

use std::time::Duration;

use marvelous_core::{Task, TaskId, TaskStatus};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use time::OffsetDateTime;
use tracing::debug;

const TASKS_SEGMENT: &str = "tasks";

/// Body of `POST /tasks/`.
#[derive(Debug, Serialize)]
struct NewTaskBody<'a> {
    content: &'a str,
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
    status: TaskStatus,
}

/// Minimal acknowledgement returned by `POST /tasks/`.
#[derive(Debug, Deserialize)]
struct InsertAck {
    #[serde(rename = "insertedId")]
    inserted_id: TaskId,
}

/// Body of `PUT /tasks/{id}`.
#[derive(Debug, Serialize)]
struct StatusBody {
    status: TaskStatus,
}

/// Client for the remote task store.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: Client,
    base_url: Url,
}

impl HttpTaskStore {
    /// Build a store client rooted at `base_url`.
    ///
    /// `timeout` bounds each request; `None` waits indefinitely.
    ///
    /// # Errors
    /// Returns [`HttpStoreError::InvalidBaseUrl`] when the URL does not parse or cannot
    /// carry a path, and [`HttpStoreError::Network`] when the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, HttpStoreError> {
        let parsed = Url::parse(base_url).map_err(|err| HttpStoreError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(HttpStoreError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot carry a path".into(),
            });
        }
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HttpStoreError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| HttpStoreError::Network {
            url: base_url.to_owned(),
            source,
        })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch every task filed under `status`.
    ///
    /// # Errors
    /// Fails on transport errors, non-success statuses, or a body that is not a task array.
    pub async fn fetch_tasks(&self, status: TaskStatus) -> Result<Vec<Task>, HttpStoreError> {
        let url = self.endpoint(&[TASKS_SEGMENT, status.as_str()]);
        let response = self.send(self.client.get(url.clone()), &url).await?;
        decode(response, &url).await
    }

    /// Create a task in the doing list with the current time as its date.
    ///
    /// The returned task combines the identifier assigned by the store with the fields
    /// that were sent. Empty content is passed through unchecked.
    ///
    /// # Errors
    /// Fails on transport errors, non-success statuses, or a response without `insertedId`.
    pub async fn insert_task(&self, content: &str) -> Result<Task, HttpStoreError> {
        let url = self.endpoint(&[TASKS_SEGMENT, ""]);
        let date = OffsetDateTime::now_utc();
        let body = NewTaskBody {
            content,
            date,
            status: TaskStatus::Doing,
        };
        let response = self
            .send(self.client.post(url.clone()).json(&body), &url)
            .await?;
        let ack: InsertAck = decode(response, &url).await?;
        Ok(Task::new(
            ack.inserted_id,
            content.to_owned(),
            date,
            TaskStatus::Doing,
        ))
    }

    /// Move a task to another list. The response body is ignored.
    ///
    /// # Errors
    /// Fails on transport errors or non-success statuses.
    pub async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<(), HttpStoreError> {
        let url = self.endpoint(&[TASKS_SEGMENT, id.as_str()]);
        self.send(self.client.put(url.clone()).json(&StatusBody { status }), &url)
            .await
            .map(drop)
    }

    /// Delete every task regardless of status. The response body is ignored.
    ///
    /// # Errors
    /// Fails on transport errors or non-success statuses.
    pub async fn remove_all(&self) -> Result<(), HttpStoreError> {
        let url = self.endpoint(&[TASKS_SEGMENT, ""]);
        self.send(
            self.client
                .request(Method::DELETE, url.clone())
                .header(reqwest::header::CONTENT_TYPE, "application/json"),
            &url,
        )
        .await
        .map(drop)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<Response, HttpStoreError> {
        let response = request.send().await.map_err(|source| HttpStoreError::Network {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "task store responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT {
            Err(HttpStoreError::Conflict {
                url: url.to_string(),
                body,
            })
        } else {
            Err(HttpStoreError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, HttpStoreError> {
    let bytes = response.bytes().await.map_err(|source| HttpStoreError::Network {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| HttpStoreError::Decode {
        url: url.to_string(),
        source,
    })
}
