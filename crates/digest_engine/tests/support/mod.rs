#![allow(dead_code)]
use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, Once};

use digest_core::Entry;
use digest_engine::{
    Clipboard, ConfirmSignal, ContentFetcher, DeliveryError, FailureKind, FeedError, FeedSource,
    FetchError,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Feed with a fixed entry list that records mark-read calls.
#[derive(Default)]
pub struct FakeFeed {
    pub entries: Vec<Entry>,
    pub list_error: Option<FeedError>,
    pub reject_mark: bool,
    pub marked: Mutex<Vec<u64>>,
}

impl FakeFeed {
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn marked(&self) -> Vec<u64> {
        self.marked.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl FeedSource for FakeFeed {
    async fn list_unread(&self) -> Result<Vec<Entry>, FeedError> {
        match &self.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.entries.clone()),
        }
    }

    async fn mark_read(&self, entry_id: u64) -> Result<(), FeedError> {
        if self.reject_mark {
            return Err(FeedError::HttpStatus {
                status: 500,
                message: "boom".to_string(),
            });
        }
        self.marked.lock().unwrap().push(entry_id);
        Ok(())
    }
}

/// Content keyed by article URL or video id; anything unknown fails.
#[derive(Default)]
pub struct FakeContent {
    pub articles: HashMap<String, String>,
    pub transcripts: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeContent {
    pub fn article(mut self, url: &str, text: &str) -> Self {
        self.articles.insert(url.to_string(), text.to_string());
        self
    }

    pub fn transcript(mut self, video_id: &str, text: &str) -> Self {
        self.transcripts.insert(video_id.to_string(), text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ContentFetcher for FakeContent {
    async fn fetch_article(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(format!("article:{url}"));
        self.articles
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::new(FailureKind::HttpStatus(500), "unavailable"))
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(format!("transcript:{video_id}"));
        self.transcripts
            .get(video_id)
            .cloned()
            .ok_or_else(|| FetchError::new(FailureKind::TranscriptUnavailable, "no captions"))
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub copies: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingClipboard {
    pub fn copies(&self) -> Vec<String> {
        self.copies.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Clipboard for RecordingClipboard {
    async fn copy(&self, text: &str) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Clipboard("no clipboard".to_string()));
        }
        self.copies.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingConfirm {
    pub waits: usize,
}

impl ConfirmSignal for CountingConfirm {
    fn wait(&mut self) -> io::Result<()> {
        self.waits += 1;
        Ok(())
    }
}
