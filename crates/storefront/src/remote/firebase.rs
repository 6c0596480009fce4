//! Firebase Realtime Database client.
//!
//! Uses the REST API: `GET`/`PUT` on `{base}/{path}.json` for point access,
//! and the same `GET` with `Accept: text/event-stream` for live updates.
//! The streaming endpoint sends `put` and `patch` events relative to the
//! subscribed path; they are applied to a local copy of the value so every
//! stream item is the complete value of the path.

use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use futures::future::BoxFuture;
use reqwest::header::{ACCEPT, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::{Instrument, debug, debug_span, warn};
use url::Url;

use crate::config::FirebaseConfig;

use super::error::{ApiErrorResponse, StoreError};
use super::{DocumentStore, ValueStream, tree};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Firebase Realtime Database REST client.
#[derive(Clone)]
pub struct FirebaseStore {
    inner: Arc<FirebaseStoreInner>,
}

struct FirebaseStoreInner {
    client: reqwest::Client,
    base_url: Url,
    auth_token: Option<SecretString>,
}

impl FirebaseStore {
    /// Create a new client for the configured database.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &FirebaseConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(FirebaseStoreInner {
                client,
                base_url: config.database_url.clone(),
                auth_token: config.auth_token.clone(),
            }),
        })
    }

    /// Build the REST URL for a database path.
    fn url_for(&self, path: &str) -> Result<Url, StoreError> {
        let keys = tree::segments(path)?;
        let mut url = self.inner.base_url.clone();

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| StoreError::InvalidPath(self.inner.base_url.to_string()))?;
            segments.pop_if_empty();
            match keys.split_last() {
                Some((last, parents)) => {
                    segments.extend(parents);
                    segments.push(&format!("{last}.json"));
                }
                None => {
                    segments.push(".json");
                }
            }
        }

        if let Some(token) = &self.inner.auth_token {
            url.query_pairs_mut()
                .append_pair("auth", token.expose_secret());
        }
        Ok(url)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl std::fmt::Debug for FirebaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseStore")
            .field("base_url", &self.inner.base_url.as_str())
            .field(
                "auth_token",
                &self.inner.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl DocumentStore for FirebaseStore {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Value>, StoreError>> {
        Box::pin(async move {
            let url = self.url_for(path)?;
            let response = self.inner.client.get(url).send().await?;
            let response = Self::check_status(response).await?;

            let value: Value = response
                .json()
                .await
                .map_err(|e| StoreError::Parse(e.to_string()))?;
            Ok(tree::is_present(&value).then_some(value))
        }
        .instrument(debug_span!("firebase_get", path)))
    }

    fn set<'a>(&'a self, path: &'a str, value: &'a Value) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            let url = self.url_for(path)?;
            let response = self.inner.client.put(url).json(value).send().await?;
            Self::check_status(response).await?;
            Ok(())
        }
        .instrument(debug_span!("firebase_set", path)))
    }

    fn subscribe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<ValueStream, StoreError>> {
        Box::pin(async move {
            let url = self.url_for(path)?;
            let response = self
                .inner
                .client
                .get(url)
                .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
                .send()
                .await?;
            let response = Self::check_status(response).await?;

            let values: ValueStream = Box::pin(stream! {
                use futures::StreamExt;

                let mut decoder = SseDecoder::default();
                let mut current = Value::Null;
                let mut byte_stream = std::pin::pin!(response.bytes_stream());

                while let Some(chunk_result) = byte_stream.next().await {
                    let chunk = match chunk_result {
                        Ok(chunk) => chunk,
                        Err(e) => {
                            yield Err(StoreError::Stream(e.to_string()));
                            break;
                        }
                    };
                    decoder.push(&chunk);

                    while let Some(raw) = decoder.next_event() {
                        let raw = match raw {
                            Ok(raw) => raw,
                            Err(e) => {
                                warn!(error = %e, "Skipping undecodable event");
                                continue;
                            }
                        };
                        let Some(event) = parse_sse_event(&raw) else {
                            continue;
                        };
                        match apply_event(&mut current, event) {
                            Ok(EventOutcome::Changed) => {
                                yield Ok(tree::is_present(&current).then(|| current.clone()));
                            }
                            Ok(EventOutcome::Ignored) => {}
                            Err(e) => {
                                yield Err(e);
                                return;
                            }
                        }
                    }
                }

                debug!("event stream ended");
            });
            Ok(values)
        }
        .instrument(debug_span!("firebase_subscribe", path)))
    }
}

/// A raw server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SseEvent {
    event: String,
    data: String,
}

/// Payload of `put` and `patch` events.
#[derive(Debug, Deserialize)]
struct ChangePayload {
    path: String,
    data: Value,
}

#[derive(Debug, PartialEq, Eq)]
enum EventOutcome {
    Changed,
    Ignored,
}

/// Incremental splitter for a `text/event-stream` body.
///
/// Bytes are buffered until a blank line ends the event, so a multi-byte
/// character split across network chunks is decoded whole.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Append a chunk. Carriage returns are dropped so `\r\n` framing reads as `\n`.
    fn push(&mut self, chunk: &[u8]) {
        self.buffer
            .extend(chunk.iter().copied().filter(|&byte| byte != b'\r'));
    }

    /// Remove and decode the next complete event, if one has fully arrived.
    fn next_event(&mut self) -> Option<Result<String, StoreError>> {
        let idx = self.buffer.windows(2).position(|pair| pair == b"\n\n")?;
        let mut raw: Vec<u8> = self.buffer.drain(..idx + 2).collect();
        raw.truncate(idx);
        Some(
            String::from_utf8(raw)
                .map_err(|e| StoreError::Parse(format!("Invalid UTF-8: {e}"))),
        )
    }
}

/// Parse an SSE event string into its event name and data.
fn parse_sse_event(event: &str) -> Option<SseEvent> {
    if event.trim().is_empty() {
        return None;
    }

    let mut name = None;
    let mut data = Vec::new();
    for line in event.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            name = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push(value.trim_start());
        }
    }

    Some(SseEvent {
        event: name?,
        data: data.join("\n"),
    })
}

/// Apply one event to the local copy of the subscribed value.
fn apply_event(current: &mut Value, event: SseEvent) -> Result<EventOutcome, StoreError> {
    match event.event.as_str() {
        "put" | "patch" => {
            let payload: ChangePayload = serde_json::from_str(&event.data)
                .map_err(|e| StoreError::Parse(format!("Failed to parse {} event: {e}", event.event)))?;
            let keys = tree::segments(&payload.path)?;

            if event.event == "put" {
                tree::set(current, &keys, payload.data);
            } else if let Value::Object(children) = payload.data {
                tree::merge(current, &keys, children);
            } else {
                return Err(StoreError::Parse("patch data must be an object".to_string()));
            }
            Ok(EventOutcome::Changed)
        }
        "keep-alive" => Ok(EventOutcome::Ignored),
        "cancel" => Err(StoreError::Stream(
            "subscription cancelled by security rules".to_string(),
        )),
        "auth_revoked" => Err(StoreError::Stream("auth token revoked".to_string())),
        other => {
            warn!(event = other, "ignoring unknown event type");
            Ok(EventOutcome::Ignored)
        }
    }
}
