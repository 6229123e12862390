use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use reqwest::header::CONTENT_TYPE;

use crate::chain::ContentStrategy;
use crate::decode::decode_text;
use crate::types::map_reqwest_error;
use crate::{FailureKind, FetchError};

pub const DEFAULT_READER_BASE: &str = "https://r.jina.ai";

#[derive(Debug, Clone)]
pub struct ReaderSettings {
    /// The target URL is appended verbatim: `{base_url}/{url}`.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Total attempts, including the first one.
    pub attempts: u32,
    pub retry_delay: Duration,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_READER_BASE.to_string(),
            request_timeout: Duration::from_secs(15),
            attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Primary article source: a text-extraction service fronting the raw URL.
#[derive(Debug, Clone)]
pub struct ReaderStrategy {
    settings: ReaderSettings,
    client: reqwest::Client,
}

impl ReaderStrategy {
    pub fn new(settings: ReaderSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn request_url(&self, url: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), url)
    }

    async fn attempt(&self, request_url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let decoded = decode_text(&bytes, content_type.as_deref());

        if decoded.text.trim().is_empty() {
            return Err(FetchError::new(
                FailureKind::EmptyContent,
                "reader returned an empty body",
            ));
        }
        Ok(decoded.text)
    }
}

#[async_trait::async_trait]
impl ContentStrategy for ReaderStrategy {
    fn name(&self) -> &'static str {
        "reader"
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        engine_info!("Reader: start {}", url);
        let request_url = self.request_url(url);
        let attempts = self.settings.attempts.max(1);

        for attempt in 1..attempts {
            match self.attempt(&request_url).await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    engine_warn!("Reader: attempt {}/{} failed: {}", attempt, attempts, err);
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
            }
        }

        self.attempt(&request_url).await.map_err(|last| {
            engine_warn!("Reader: attempt {}/{} failed: {}", attempts, attempts, last);
            FetchError::new(
                last.kind,
                format!(
                    "article fetch failed after {attempts} attempts: {}",
                    last.message
                ),
            )
        })
    }
}
