//! Miniflux REST client: unread listing and best-effort mark-read.
use std::time::Duration;

use digest_core::Entry;
use engine_logging::{engine_debug, engine_info};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

pub const DEFAULT_FEED_BASE: &str = "http://localhost:8080";
const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(String),
    #[error("feed returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("feed payload is invalid: {0}")]
    InvalidPayload(String),
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn list_unread(&self) -> Result<Vec<Entry>, FeedError>;

    async fn mark_read(&self, entry_id: u64) -> Result<(), FeedError>;
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub base_url: String,
    pub token: String,
    pub request_timeout: Duration,
}

impl FeedSettings {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// One request shape accepted by some Miniflux version for marking an entry read.
struct MarkReadVariant {
    method: Method,
    path: String,
    body: Value,
}

fn mark_read_variants(entry_id: u64) -> [MarkReadVariant; 4] {
    [
        MarkReadVariant {
            method: Method::PUT,
            path: "/v1/entries?status=read".to_string(),
            body: json!({ "entry_ids": [entry_id] }),
        },
        MarkReadVariant {
            method: Method::PUT,
            path: "/v1/entries".to_string(),
            body: json!({ "entry_ids": [entry_id], "status": "read" }),
        },
        MarkReadVariant {
            method: Method::POST,
            path: "/v1/entries?status=read".to_string(),
            body: json!({ "entry_ids": [entry_id] }),
        },
        MarkReadVariant {
            method: Method::PUT,
            path: format!("/v1/entries/{entry_id}"),
            body: json!({ "status": "read" }),
        },
    ]
}

#[derive(Debug, Clone)]
pub struct MinifluxClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl MinifluxClient {
    pub fn new(settings: FeedSettings) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FeedError::Request(err.to_string()))?;
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, FeedError> {
        let mut request = self
            .client
            .request(method, self.endpoint(path))
            .header(AUTH_HEADER, &self.token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|err| FeedError::Request(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(FeedError::HttpStatus {
            status: status.as_u16(),
            message: message.trim().to_string(),
        })
    }

    async fn try_mark_read(
        &self,
        entry_id: u64,
        variant: &MarkReadVariant,
    ) -> Result<(), FeedError> {
        self.send(variant.method.clone(), &variant.path, Some(&variant.body))
            .await?;
        engine_debug!(
            "Feed: marked {} read via {} {}",
            entry_id,
            variant.method,
            variant.path
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl FeedSource for MinifluxClient {
    async fn list_unread(&self) -> Result<Vec<Entry>, FeedError> {
        let response = self
            .send(Method::GET, "/v1/entries?status=unread", None)
            .await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|err| FeedError::InvalidPayload(err.to_string()))?;
        let entries = parse_entries(payload)?;
        engine_info!("Feed: {} unread entries", entries.len());
        Ok(entries)
    }

    async fn mark_read(&self, entry_id: u64) -> Result<(), FeedError> {
        let [earlier @ .., last] = mark_read_variants(entry_id);
        for variant in &earlier {
            match self.try_mark_read(entry_id, variant).await {
                Err(FeedError::HttpStatus { status, .. }) if is_variant_rejection(status) => {
                    engine_debug!(
                        "Feed: {} {} rejected with {}, trying next shape",
                        variant.method,
                        variant.path,
                        status
                    );
                }
                result => return result,
            }
        }
        self.try_mark_read(entry_id, &last).await
    }
}

fn is_variant_rejection(status: u16) -> bool {
    status == StatusCode::BAD_REQUEST.as_u16() || status == StatusCode::NOT_FOUND.as_u16()
}

/// `entries` may be absent (no unread items); anything but a list is an error.
fn parse_entries(payload: Value) -> Result<Vec<Entry>, FeedError> {
    let entries = match payload {
        Value::Object(mut map) => map.remove("entries").unwrap_or(Value::Null),
        other => {
            return Err(FeedError::InvalidPayload(format!(
                "expected an object, got {other}"
            )))
        }
    };
    match entries {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => serde_json::from_value(entries)
            .map_err(|err| FeedError::InvalidPayload(err.to_string())),
        other => Err(FeedError::InvalidPayload(format!(
            "entries is not a list: {other}"
        ))),
    }
}
