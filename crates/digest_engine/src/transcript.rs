use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::engine_info;
use serde::Deserialize;
use tokio::process::Command;

use crate::types::map_reqwest_error;
use crate::{FailureKind, FetchError};

pub const DEFAULT_TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const SUBTITLE_EXTENSION: &str = "json3";

#[derive(Debug, Clone)]
pub struct TranscriptSettings {
    pub language: String,
    pub ytdlp_program: String,
    pub timedtext_url: String,
    pub timeout: Duration,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            ytdlp_program: "yt-dlp".to_string(),
            timedtext_url: DEFAULT_TIMEDTEXT_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// One timed fragment of a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptItem {
    pub text: String,
}

impl TranscriptItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait::async_trait]
pub trait TranscriptBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_items(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptItem>, FetchError>;
}

/// Subtitles via the `yt-dlp` executable, written as json3 into a scratch directory.
#[derive(Debug, Clone)]
pub struct YtDlpBackend {
    program: String,
    timeout: Duration,
}

impl YtDlpBackend {
    pub fn new(settings: &TranscriptSettings) -> Self {
        Self {
            program: settings.ytdlp_program.clone(),
            timeout: settings.timeout,
        }
    }
}

#[async_trait::async_trait]
impl TranscriptBackend for YtDlpBackend {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch_items(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptItem>, FetchError> {
        let workdir = tempfile::tempdir().map_err(|err| {
            FetchError::new(FailureKind::TranscriptUnavailable, err.to_string())
        })?;
        let template = workdir.path().join("%(id)s.%(ext)s");

        let mut command = Command::new(&self.program);
        command
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs")
            .arg(language)
            .arg("--sub-format")
            .arg(SUBTITLE_EXTENSION)
            .arg("--no-warnings")
            .arg("-o")
            .arg(&template)
            .arg(format!("{WATCH_URL}{video_id}"))
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                FetchError::new(
                    FailureKind::Timeout,
                    format!("{} did not finish within {:?}", self.program, self.timeout),
                )
            })?
            .map_err(|err| {
                FetchError::new(
                    FailureKind::TranscriptUnavailable,
                    format!("could not launch {}: {err}", self.program),
                )
            })?;

        if !output.status.success() {
            return Err(FetchError::new(
                FailureKind::TranscriptUnavailable,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let path = find_subtitle_file(workdir.path()).ok_or_else(|| {
            FetchError::new(
                FailureKind::TranscriptUnavailable,
                format!("no {language} subtitles for {video_id}"),
            )
        })?;
        let body = tokio::fs::read_to_string(&path).await.map_err(|err| {
            FetchError::new(FailureKind::TranscriptUnavailable, err.to_string())
        })?;
        parse_json3(&body)
    }
}

fn find_subtitle_file(dir: &Path) -> Option<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(SUBTITLE_EXTENSION))
        .collect();
    files.sort();
    files.into_iter().next()
}

/// Subtitles via the public timed-text endpoint, requested as json3.
#[derive(Debug, Clone)]
pub struct TimedTextBackend {
    endpoint: String,
    client: reqwest::Client,
}

impl TimedTextBackend {
    pub fn new(settings: &TranscriptSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            endpoint: settings.timedtext_url.clone(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl TranscriptBackend for TimedTextBackend {
    fn name(&self) -> &'static str {
        "timedtext"
    }

    async fn fetch_items(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptItem>, FetchError> {
        let url = url::Url::parse_with_params(
            &self.endpoint,
            &[("v", video_id), ("lang", language), ("fmt", SUBTITLE_EXTENSION)],
        )
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(url)
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

        let body = response.text().await.map_err(map_reqwest_error)?;
        // The endpoint answers 200 with an empty body when no track exists.
        if body.trim().is_empty() {
            return Err(FetchError::new(
                FailureKind::TranscriptUnavailable,
                format!("no {language} transcript for {video_id}"),
            ));
        }
        parse_json3(&body)
    }
}

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Segment>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// One item per caption event, segments concatenated in order.
pub fn parse_json3(body: &str) -> Result<Vec<TranscriptItem>, FetchError> {
    let parsed: Json3 = serde_json::from_str(body).map_err(|err| {
        FetchError::new(
            FailureKind::TranscriptUnavailable,
            format!("malformed transcript: {err}"),
        )
    })?;
    Ok(parsed
        .events
        .into_iter()
        .map(|event| TranscriptItem {
            text: event.segs.into_iter().map(|seg| seg.utf8).collect(),
        })
        .collect())
}

/// Non-blank fragments, trimmed, joined by single spaces.
pub fn join_fragments(items: &[TranscriptItem]) -> String {
    items
        .iter()
        .map(|item| item.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pick the transcript backend once for the process: `yt-dlp` when it runs, timed text otherwise.
pub async fn detect_backend(
    settings: &TranscriptSettings,
) -> Result<Box<dyn TranscriptBackend>, FetchError> {
    let version_check = Command::new(&settings.ytdlp_program)
        .arg("--version")
        .kill_on_drop(true)
        .output()
        .await;

    match version_check {
        Ok(output) if output.status.success() => {
            engine_info!(
                "Transcripts: yt-dlp {}",
                String::from_utf8_lossy(&output.stdout).trim()
            );
            Ok(Box::new(YtDlpBackend::new(settings)))
        }
        _ => {
            engine_info!(
                "Transcripts: {} not available, using timed-text endpoint",
                settings.ytdlp_program
            );
            Ok(Box::new(TimedTextBackend::new(settings)?))
        }
    }
}

/// Transcript text for a video in the preferred language, via the pinned backend.
pub struct TranscriptFetcher {
    backend: Box<dyn TranscriptBackend>,
    language: String,
}

impl TranscriptFetcher {
    pub fn new(backend: Box<dyn TranscriptBackend>, language: impl Into<String>) -> Self {
        Self {
            backend,
            language: language.into(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn fetch_transcript(&self, video_id: &str) -> Result<String, FetchError> {
        engine_info!("Transcript ({}): {}", self.backend.name(), video_id);
        let items = self.backend.fetch_items(video_id, &self.language).await?;
        let text = join_fragments(&items);
        if text.is_empty() {
            return Err(FetchError::new(
                FailureKind::EmptyContent,
                format!("empty transcript for {video_id}"),
            ));
        }
        Ok(text)
    }
}
