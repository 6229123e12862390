use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use tokio::process::Command;

use crate::chain::ContentStrategy;
use crate::decode::decode_text;
use crate::page::{extract_page_text, ConsentOutcome};
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub chromium_bin: String,
    pub navigation_timeout: Duration,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            chromium_bin: "chromium".to_string(),
            navigation_timeout: Duration::from_secs(20),
        }
    }
}

/// Fallback article source: renders the page in headless Chromium and reads its visible text.
#[derive(Debug, Clone)]
pub struct BrowserStrategy {
    settings: RenderSettings,
}

impl BrowserStrategy {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    async fn render_dom(&self, url: &str) -> Result<String, FetchError> {
        let timeout = self.settings.navigation_timeout;
        let mut command = Command::new(&self.settings.chromium_bin);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-first-run")
            .arg("--hide-scrollbars")
            .arg(format!("--timeout={}", timeout.as_millis()))
            .arg("--dump-dom")
            .arg(url)
            .kill_on_drop(true);

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| {
                FetchError::new(
                    FailureKind::Timeout,
                    format!("navigation did not finish within {timeout:?}"),
                )
            })?
            .map_err(|err| {
                FetchError::new(
                    FailureKind::RenderFailed,
                    format!("could not launch {}: {err}", self.settings.chromium_bin),
                )
            })?;

        if !output.status.success() {
            return Err(FetchError::new(
                FailureKind::RenderFailed,
                format!(
                    "{} exited with {}: {}",
                    self.settings.chromium_bin,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        Ok(decode_text(&output.stdout, None).text)
    }
}

#[async_trait::async_trait]
impl ContentStrategy for BrowserStrategy {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        url::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        engine_info!("Browser: start {}", url);
        let dom = self.render_dom(url).await?;
        let page = extract_page_text(&dom);
        match page.consent {
            ConsentOutcome::Dismissed => engine_info!("Browser: cookie consent dismissed"),
            ConsentOutcome::NotFound => engine_debug!("Browser: no cookie consent found"),
        }

        if page.text.trim().is_empty() {
            engine_info!("Browser: failed (empty content)");
            return Err(FetchError::new(
                FailureKind::EmptyContent,
                "rendered page has no visible text",
            ));
        }
        engine_info!("Browser: success ({} chars)", page.text.chars().count());
        Ok(page.text)
    }
}
