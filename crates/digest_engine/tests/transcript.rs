use std::time::Duration;

use digest_engine::{
    detect_backend, join_fragments, parse_json3, FailureKind, FetchError, TimedTextBackend,
    TranscriptBackend, TranscriptFetcher, TranscriptItem, TranscriptSettings,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;

struct FixedBackend(Vec<TranscriptItem>);

#[async_trait::async_trait]
impl TranscriptBackend for FixedBackend {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn fetch_items(
        &self,
        _video_id: &str,
        _language: &str,
    ) -> Result<Vec<TranscriptItem>, FetchError> {
        Ok(self.0.clone())
    }
}

fn settings_for(server: &MockServer) -> TranscriptSettings {
    TranscriptSettings {
        timedtext_url: format!("{}/api/timedtext", server.uri()),
        timeout: Duration::from_secs(2),
        ..TranscriptSettings::default()
    }
}

#[test]
fn fragments_are_trimmed_and_blank_ones_dropped() {
    let items = vec![
        TranscriptItem::new(" Hello "),
        TranscriptItem::new("\n"),
        TranscriptItem::new("world"),
        TranscriptItem::new(""),
        TranscriptItem::new("again\n"),
    ];
    assert_eq!(join_fragments(&items), "Hello world again");
}

#[test]
fn json3_events_become_items() {
    let body = json!({
        "wireMagic": "pb3",
        "events": [
            { "tStartMs": 0, "segs": [{ "utf8": "Hello" }, { "utf8": " there" }] },
            { "tStartMs": 900 },
            { "tStartMs": 1200, "segs": [{ "utf8": "\n" }] },
            { "tStartMs": 1500, "segs": [{ "utf8": "friend" }] }
        ]
    })
    .to_string();

    let items = parse_json3(&body).expect("parse");

    assert_eq!(items.len(), 4);
    assert_eq!(items[0].text, "Hello there");
    assert_eq!(join_fragments(&items), "Hello there friend");
}

#[test]
fn malformed_json3_is_unavailable() {
    let err = parse_json3("<transcript/>").expect_err("not json");
    assert_eq!(err.kind, FailureKind::TranscriptUnavailable);
}

#[tokio::test]
async fn timed_text_backend_requests_language_and_format() {
    support::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("v", "abc123"))
        .and(query_param("lang", "pl"))
        .and(query_param("fmt", "json3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [{ "segs": [{ "utf8": "Dzien" }] }, { "segs": [{ "utf8": "dobry" }] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = TimedTextBackend::new(&settings_for(&server)).expect("client");
    let fetcher = TranscriptFetcher::new(Box::new(backend), "pl");

    assert_eq!(fetcher.backend_name(), "timedtext");
    assert_eq!(
        fetcher.fetch_transcript("abc123").await,
        Ok("Dzien dobry".to_string())
    );
}

#[tokio::test]
async fn empty_timed_text_body_means_no_transcript() {
    support::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let backend = TimedTextBackend::new(&settings_for(&server)).expect("client");
    let err = backend.fetch_items("abc123", "en").await.expect_err("empty");

    assert_eq!(err.kind, FailureKind::TranscriptUnavailable);
}

#[tokio::test]
async fn blank_transcript_is_a_failure() {
    support::init_logging();
    let fetcher = TranscriptFetcher::new(
        Box::new(FixedBackend(vec![
            TranscriptItem::new("  "),
            TranscriptItem::new("\n"),
        ])),
        "en",
    );

    let err = fetcher.fetch_transcript("abc123").await.expect_err("blank");

    assert_eq!(err.kind, FailureKind::EmptyContent);
}

#[tokio::test]
async fn missing_ytdlp_selects_timed_text() {
    support::init_logging();
    let settings = TranscriptSettings {
        ytdlp_program: "feed-digest-no-such-ytdlp".to_string(),
        ..TranscriptSettings::default()
    };

    let backend = detect_backend(&settings).await.expect("backend");

    assert_eq!(backend.name(), "timedtext");
}
